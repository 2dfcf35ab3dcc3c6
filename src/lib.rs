#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod log;
pub mod parser;
pub mod regression;
pub mod render;
pub mod text_metrics;
pub mod theme;
pub mod widgets;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, TextMetricsKind};
pub use error::{RenderError, RenderResult};
pub use ir::Widget;
pub use parser::parse_widget;
pub use theme::Theme;
pub use widgets::{RenderedWidget, WidgetRenderer, generate_widget, render_widget};

/// Theme and layout knobs for one-call rendering.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

impl RenderOptions {
    pub fn classic() -> Self {
        Self::default()
    }

    pub fn modern() -> Self {
        Self {
            theme: Theme::modern(),
            layout: LayoutConfig::default(),
        }
    }

    pub fn into_config(self) -> Config {
        let render = RenderConfig {
            background: self.theme.background.clone(),
        };
        Config {
            theme: self.theme,
            layout: self.layout,
            render,
        }
    }
}

/// Parse widget parameters (JSON or JSON5) and render them to SVG.
pub fn render_with_options(input: &str, options: RenderOptions) -> RenderResult<String> {
    let widget = parse_widget(input)?;
    generate_widget(&widget, &options.into_config())
}

pub fn render(input: &str) -> RenderResult<String> {
    render_with_options(input, RenderOptions::default())
}
