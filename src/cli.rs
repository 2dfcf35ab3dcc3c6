use crate::config::load_config;
use crate::layout_dump::write_render_dump;
use crate::parser::parse_widget;
use crate::render::write_output_svg;
use crate::widgets::WidgetRenderer;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "wsvg", version, about = "Render widget parameter files to SVG")]
pub struct Args {
    /// Widget parameter file (JSON or JSON5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config file with theme and layout overrides
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Override the widget's chart width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f64>,

    /// Override the widget's chart height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f64>,

    /// Write the resolved geometry as JSON to this path
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let input = read_input(args.input.as_deref())?;
    let mut widget = parse_widget(&input)?;
    if args.width.is_some() || args.height.is_some() {
        let (width, height) = widget.size();
        widget.set_size(args.width.unwrap_or(width), args.height.unwrap_or(height));
    }

    let renderer = WidgetRenderer::new(config);
    let rendered = renderer.render(&widget)?;
    if let Some(path) = args.dump_layout.as_deref() {
        write_render_dump(path, &widget, &rendered)
            .with_context(|| format!("writing layout dump {}", path.display()))?;
    }

    match args.output_format {
        OutputFormat::Svg => write_output_svg(&rendered.svg, args.output.as_deref())?,
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_png(&rendered.svg, &output, &renderer.config().theme.font_family)?;
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, font_family: &str) -> Result<()> {
    crate::render::write_output_png(svg, output, font_family)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _font_family: &str) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
