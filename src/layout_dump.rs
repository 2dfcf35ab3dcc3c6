use crate::ir::Widget;
use crate::layout::{ChartArea, Frame, Margins};
use crate::widgets::RenderedWidget;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderDump {
    pub kind: String,
    pub frame: Frame,
    pub chart_area: ChartArea,
    pub view_box: ViewBoxDump,
    pub margins: Margins,
    pub x_band_width: Option<f64>,
    pub y_band_width: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewBoxDump {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl RenderDump {
    pub fn from_rendered(widget: &Widget, rendered: &RenderedWidget) -> Self {
        let plane = &rendered.plane;
        let markup = &rendered.markup;
        RenderDump {
            kind: widget.kind_name().to_string(),
            frame: plane.frame,
            chart_area: plane.chart_area,
            view_box: ViewBoxDump {
                min_x: markup.vb_min_x,
                min_y: markup.vb_min_y,
                width: markup.width,
                height: markup.height,
            },
            margins: plane.margins,
            x_band_width: plane.x_band_width,
            y_band_width: plane.y_band_width,
        }
    }
}

pub fn write_render_dump(path: &Path, widget: &Widget, rendered: &RenderedWidget) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = RenderDump::from_rendered(widget, rendered);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
