use serde::Deserialize;
use wasm_bindgen::prelude::*;
use widget_svg_renderer::{RenderOptions, render_with_options};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WidgetRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f64>,
    background: Option<String>,
}

fn build_render_options(options: WidgetRenderOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("modern") {
        RenderOptions::modern()
    } else {
        RenderOptions::classic()
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
    }
    if let Some(background) = options.background {
        render_options.theme.background = background;
    }

    render_options
}

#[wasm_bindgen]
pub fn render_widget_svg(params_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<WidgetRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        WidgetRenderOptions::default()
    };

    let render_options = build_render_options(options);
    render_with_options(params_json, render_options)
        .map_err(|error| JsValue::from_str(&error.to_string()))
}
