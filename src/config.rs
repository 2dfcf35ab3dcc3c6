use crate::theme::Theme;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which text measurement strategy layout uses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextMetricsKind {
    #[default]
    Heuristic,
    Font,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub tick_length: f64,
    pub tick_label_padding: f64,
    pub axis_title_padding: f64,
    pub title_gap: f64,
    pub title_wrap_chars: usize,
    pub label_min_gap: f64,
    pub char_width_ratio: f64,
    pub label_line_height: f64,
    pub axis_stroke_width: f64,
    pub grid_stroke_width: f64,
    pub overlay_stroke_width: f64,
    pub point_radius: f64,
    pub point_label_offset: f64,
    pub legend_swatch_size: f64,
    pub legend_spacing: f64,
    pub legend_padding: f64,
    pub legend_gap: f64,
    pub curve_samples: usize,
    pub stick_width: f64,
    pub stick_cap_radius: f64,
    pub bar_width_ratio: f64,
    pub finalize_padding: f64,
    pub text_metrics: TextMetricsKind,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            tick_length: 6.0,
            tick_label_padding: 4.0,
            axis_title_padding: 10.0,
            title_gap: 12.0,
            title_wrap_chars: 40,
            label_min_gap: 8.0,
            char_width_ratio: 0.6,
            label_line_height: 1.2,
            axis_stroke_width: 1.5,
            grid_stroke_width: 1.0,
            overlay_stroke_width: 2.0,
            point_radius: 4.5,
            point_label_offset: 6.0,
            legend_swatch_size: 12.0,
            legend_spacing: 6.0,
            legend_padding: 8.0,
            legend_gap: 16.0,
            curve_samples: 100,
            stick_width: 3.0,
            stick_cap_radius: 5.0,
            bar_width_ratio: 0.6,
            finalize_padding: 10.0,
            text_metrics: TextMetricsKind::Heuristic,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f64>,
    title_font_size: Option<f64>,
    axis_title_font_size: Option<f64>,
    tick_label_font_size: Option<f64>,
    text_color: Option<String>,
    axis_color: Option<String>,
    grid_color: Option<String>,
    point_color: Option<String>,
    point_stroke: Option<String>,
    legend_background: Option<String>,
    legend_border: Option<String>,
    background: Option<String>,
    palette: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    tick_length: Option<f64>,
    tick_label_padding: Option<f64>,
    axis_title_padding: Option<f64>,
    title_gap: Option<f64>,
    title_wrap_chars: Option<usize>,
    label_min_gap: Option<f64>,
    char_width_ratio: Option<f64>,
    label_line_height: Option<f64>,
    axis_stroke_width: Option<f64>,
    grid_stroke_width: Option<f64>,
    overlay_stroke_width: Option<f64>,
    point_radius: Option<f64>,
    point_label_offset: Option<f64>,
    legend_swatch_size: Option<f64>,
    legend_spacing: Option<f64>,
    legend_padding: Option<f64>,
    legend_gap: Option<f64>,
    curve_samples: Option<usize>,
    stick_width: Option<f64>,
    stick_cap_radius: Option<f64>,
    bar_width_ratio: Option<f64>,
    finalize_padding: Option<f64>,
    text_metrics: Option<TextMetricsKind>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("parsing config file {}", path.display()))
}

/// Parse a JSON or JSON5 config document and merge it over the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "classic" | "default" | "base" => config.theme = Theme::classic(),
            other => anyhow::bail!("unknown theme preset \"{other}\""),
        }
        config.render.background = config.theme.background.clone();
    }

    if let Some(vars) = parsed.theme_variables {
        apply_theme_variables(&mut config, vars);
    }
    if let Some(layout) = parsed.layout {
        apply_layout_overrides(&mut config.layout, layout);
    }
    Ok(config)
}

fn apply_theme_variables(config: &mut Config, vars: ThemeVariables) {
    let theme = &mut config.theme;
    if let Some(v) = vars.font_family {
        theme.font_family = v;
    }
    if let Some(v) = vars.font_size {
        theme.font_size = v;
    }
    if let Some(v) = vars.title_font_size {
        theme.title_font_size = v;
    }
    if let Some(v) = vars.axis_title_font_size {
        theme.axis_title_font_size = v;
    }
    if let Some(v) = vars.tick_label_font_size {
        theme.tick_label_font_size = v;
    }
    if let Some(v) = vars.text_color {
        theme.text_color = v;
    }
    if let Some(v) = vars.axis_color {
        theme.axis_color = v;
    }
    if let Some(v) = vars.grid_color {
        theme.grid_color = v;
    }
    if let Some(v) = vars.point_color {
        theme.point_color = v;
    }
    if let Some(v) = vars.point_stroke {
        theme.point_stroke = v;
    }
    if let Some(v) = vars.legend_background {
        theme.legend_background = v;
    }
    if let Some(v) = vars.legend_border {
        theme.legend_border = v;
    }
    if let Some(v) = vars.background {
        config.render.background = v.clone();
        theme.background = v;
    }
    if let Some(v) = vars.palette {
        theme.palette = v;
    }
}

fn apply_layout_overrides(layout: &mut LayoutConfig, file: LayoutConfigFile) {
    macro_rules! merge {
        ($($field:ident),* $(,)?) => {
            $(
                if let Some(v) = file.$field {
                    layout.$field = v;
                }
            )*
        };
    }

    merge! {
        tick_length,
        tick_label_padding,
        axis_title_padding,
        title_gap,
        title_wrap_chars,
        label_min_gap,
        char_width_ratio,
        label_line_height,
        axis_stroke_width,
        grid_stroke_width,
        overlay_stroke_width,
        point_radius,
        point_label_offset,
        legend_swatch_size,
        legend_spacing,
        legend_padding,
        legend_gap,
        curve_samples,
        stick_width,
        stick_cap_radius,
        bar_width_ratio,
        finalize_padding,
        text_metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.curve_samples, 100);
        assert_eq!(config.theme.font_size, Theme::classic().font_size);
    }

    #[test]
    fn theme_preset_and_variables_merge() {
        let config = parse_config(
            r##"{
                // json5 comments are allowed
                theme: "modern",
                themeVariables: { titleFontSize: 22, background: "#000000" },
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.font_family, Theme::modern().font_family);
        assert_eq!(config.theme.title_font_size, 22.0);
        assert_eq!(config.render.background, "#000000");
    }

    #[test]
    fn layout_overrides_merge() {
        let config =
            parse_config(r#"{"layout": {"tickLength": 9, "textMetrics": "font"}}"#).unwrap();
        assert_eq!(config.layout.tick_length, 9.0);
        assert_eq!(config.layout.text_metrics, TextMetricsKind::Font);
        assert_eq!(config.layout.label_min_gap, LayoutConfig::default().label_min_gap);
    }

    #[test]
    fn unknown_theme_is_rejected() {
        assert!(parse_config(r#"{"theme": "neon"}"#).is_err());
    }
}
