//! Widget generators: validate, lay out a coordinate plane, draw the data,
//! and serialize the finalized canvas.

mod bar;
mod conceptual;
mod scatter;
mod stick;

pub use bar::render_bar_chart;
pub use conceptual::render_conceptual_graph;
pub use scatter::{clip_line_to_domain, render_scatter_plot};
pub use stick::render_stick_plot;

use crate::config::Config;
use crate::error::{RenderError, RenderResult};
use crate::ir::{LabeledPoint, LineStyle, NumericAxis, Widget};
use crate::layout::CoordinatePlane;
use crate::log::debug;
use crate::render::{
    Canvas, FinalizedMarkup, LegendEntry, LegendStyle, ShapeStyle, TextAnchor, TextStyle,
};
use crate::text_metrics::{TextMetrics, metrics_for};

/// Output of one render call, kept together for layout dumps.
#[derive(Debug, Clone)]
pub struct RenderedWidget {
    pub svg: String,
    pub markup: FinalizedMarkup,
    pub plane: CoordinatePlane,
}

/// One-shot render. With `TextMetricsKind::Font` this loads the system font
/// database on every call; use [`WidgetRenderer`] to render several widgets.
pub fn render_widget(widget: &Widget, config: &Config) -> RenderResult<RenderedWidget> {
    let metrics = metrics_for(config);
    render_widget_with(widget, config, metrics.as_ref())
}

/// A config paired with its measurement strategy, built once and reused
/// for every widget rendered through it.
pub struct WidgetRenderer {
    config: Config,
    metrics: Box<dyn TextMetrics>,
}

impl WidgetRenderer {
    pub fn new(config: Config) -> Self {
        let metrics = metrics_for(&config);
        Self { config, metrics }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn render(&self, widget: &Widget) -> RenderResult<RenderedWidget> {
        render_widget_with(widget, &self.config, self.metrics.as_ref())
    }
}

/// Render with a caller-owned measurement strategy.
pub fn render_widget_with(
    widget: &Widget,
    config: &Config,
    metrics: &dyn TextMetrics,
) -> RenderResult<RenderedWidget> {
    debug!(kind = widget.kind_name(), "rendering widget");
    match widget {
        Widget::ScatterPlot(params) => render_scatter_plot(params, config, metrics),
        Widget::StickPlot(params) => render_stick_plot(params, config, metrics),
        Widget::ConceptualGraph(params) => render_conceptual_graph(params, config, metrics),
        Widget::BarChart(params) => render_bar_chart(params, config, metrics),
    }
}

pub fn generate_widget(widget: &Widget, config: &Config) -> RenderResult<String> {
    render_widget(widget, config).map(|rendered| rendered.svg)
}

fn finish(canvas: Canvas<'_>, plane: CoordinatePlane, config: &Config) -> RenderedWidget {
    let markup = canvas.finalize(config.layout.finalize_padding);
    let svg = markup.to_svg(Some(&config.render.background));
    RenderedWidget { svg, markup, plane }
}

pub(crate) fn check_points_in_domain(
    what: &str,
    points: &[LabeledPoint],
    x_axis: &NumericAxis,
    y_axis: &NumericAxis,
) -> RenderResult<()> {
    for (idx, point) in points.iter().enumerate() {
        if !x_axis.contains(point.x) || !y_axis.contains(point.y) {
            return Err(RenderError::PointOutOfDomain {
                what: format!("{what} {idx}"),
                x: point.x,
                y: point.y,
                x_min: x_axis.min,
                x_max: x_axis.max,
                y_min: y_axis.min,
                y_max: y_axis.max,
            });
        }
    }
    Ok(())
}

pub(crate) fn check_value_in_domain(what: String, value: f64, axis: &NumericAxis) -> RenderResult<()> {
    if axis.contains(value) {
        Ok(())
    } else {
        Err(RenderError::ValueOutOfDomain {
            what,
            value,
            min: axis.min,
            max: axis.max,
        })
    }
}

/// Stroke for an overlay, falling back to the palette slot `index`.
pub(crate) fn overlay_stroke(style: &LineStyle, index: usize, config: &Config) -> ShapeStyle {
    let color = overlay_color(style, index, config);
    let width = style
        .stroke_width
        .unwrap_or(config.layout.overlay_stroke_width);
    let stroke = ShapeStyle::stroke(color, width);
    if style.dashed {
        stroke.with_dash("6 4")
    } else {
        stroke
    }
}

pub(crate) fn overlay_color(style: &LineStyle, index: usize, config: &Config) -> String {
    style
        .color
        .clone()
        .unwrap_or_else(|| config.theme.palette_color(index).to_string())
}

/// Pixel x of each of `count` marks sharing one band.
pub(crate) fn band_slots(center: f64, band_width: f64, ratio: f64, count: usize) -> Vec<f64> {
    let count = count.max(1);
    let span = band_width * ratio;
    let slot = span / count as f64;
    (0..count)
        .map(|j| center - span / 2.0 + (j as f64 + 0.5) * slot)
        .collect()
}

pub(crate) fn draw_points(
    canvas: &mut Canvas<'_>,
    plane: &CoordinatePlane,
    points: &[LabeledPoint],
    config: &Config,
) {
    let theme = &config.theme;
    let layout = &config.layout;
    let marker = ShapeStyle::fill(theme.point_color.clone()).with_stroke(theme.point_stroke.clone(), 1.0);
    let label_style = TextStyle::new(theme.font_size, theme.text_color.clone()).anchor(TextAnchor::Start);
    for point in points {
        let (px, py) = plane.to_svg(point.point());
        canvas.circle(px, py, layout.point_radius, &marker);
        if let Some(label) = point.label.as_deref().filter(|l| !l.is_empty()) {
            let offset = layout.point_radius + layout.point_label_offset;
            canvas.text(px + offset, py - offset / 2.0, label, &label_style);
        }
    }
}

/// Legend to the right of the chart rectangle; nothing when `entries` is empty.
pub(crate) fn draw_legend(
    canvas: &mut Canvas<'_>,
    plane: &CoordinatePlane,
    entries: &[LegendEntry],
    config: &Config,
) {
    if entries.is_empty() {
        return;
    }
    let theme = &config.theme;
    let layout = &config.layout;
    let style = LegendStyle {
        font_size: theme.font_size,
        text_color: theme.text_color.clone(),
        background: theme.legend_background.clone(),
        border: theme.legend_border.clone(),
        swatch_size: layout.legend_swatch_size,
        spacing: layout.legend_spacing,
        padding: layout.legend_padding,
    };
    let area = plane.chart_area;
    // Clear of anything already drawn right of the chart (e.g. an arrow title).
    let x = canvas.extents().max_x.max(area.right()) + layout.legend_gap;
    canvas.legend(x, area.top, entries, &style);
}
