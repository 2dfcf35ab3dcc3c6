pub mod canvas;
pub mod extents;
pub mod path;

pub use canvas::{
    Canvas, ClipId, FinalizedMarkup, LegendEntry, LegendStyle, LegendSwatch, MarkerId, PaintId,
    ShapeStyle, TextAnchor, TextBaseline, TextStyle, Transform,
};
pub use extents::Extents;
pub use path::PathBuilder;

use anyhow::{Context, Result};
use std::path::Path;

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg).with_context(|| format!("writing {}", path.display()))?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, font_family: &str) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = font_family
        .split(',')
        .next()
        .map(|f| f.trim().trim_matches('"').to_string())
        .unwrap_or_else(|| "sans-serif".to_string());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
