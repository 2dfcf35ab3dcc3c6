//! Coordinate-plane setup: title, both axes, quadrant labels, and the clip
//! region, laid out around a fixed chart rectangle.

use serde::Serialize;

use crate::config::Config;
use crate::error::{AxisName, RenderError, RenderResult};
use crate::ir::{AxisSpec, Point};
use crate::log::debug;
use crate::render::{Canvas, ClipId, TextAnchor, TextBaseline, TextStyle};

use super::axis::{
    AxisPlacement, AxisRender, AxisRequest, axis_scale, compute_and_render_axis, validate_axis,
};
use super::{ChartArea, Scale};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Frame {
    /// Origin at the chart's bottom-left; axes along the rectangle edges.
    SingleQuadrant,
    /// Axes cross at data zero, clamped into the chart rectangle.
    FourQuadrant,
}

impl Frame {
    pub fn name(self) -> &'static str {
        match self {
            Frame::SingleQuadrant => "single-quadrant",
            Frame::FourQuadrant => "four-quadrant",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlaneRequest<'a> {
    pub frame: Frame,
    pub title: Option<&'a str>,
    pub x_axis: &'a AxisSpec,
    pub y_axis: &'a AxisSpec,
    pub area: ChartArea,
    pub show_quadrant_labels: bool,
}

/// Space used around the chart rectangle, per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatePlane {
    pub frame: Frame,
    pub chart_area: ChartArea,
    pub x: Scale,
    pub y: Scale,
    pub x_band_width: Option<f64>,
    pub y_band_width: Option<f64>,
    pub clip: ClipId,
    pub margins: Margins,
}

impl CoordinatePlane {
    pub fn to_svg_x(&self, x: f64) -> f64 {
        self.x.map(x)
    }

    pub fn to_svg_y(&self, y: f64) -> f64 {
        self.y.map(y)
    }

    pub fn to_svg(&self, point: Point) -> (f64, f64) {
        (self.to_svg_x(point.x), self.to_svg_y(point.y))
    }

    pub fn from_svg_x(&self, px: f64) -> f64 {
        self.x.invert(px)
    }

    pub fn from_svg_y(&self, py: f64) -> f64 {
        self.y.invert(py)
    }
}

/// The chart rectangle for a widget of the given nominal size.
pub fn chart_area_for(width: f64, height: f64) -> RenderResult<ChartArea> {
    if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }
    Ok(ChartArea::new(0.0, 0.0, width, height))
}

pub fn setup_coordinate_plane(
    request: PlaneRequest<'_>,
    canvas: &mut Canvas<'_>,
    config: &Config,
) -> RenderResult<CoordinatePlane> {
    validate_axis(AxisName::X, request.x_axis)?;
    validate_axis(AxisName::Y, request.y_axis)?;
    let area = request.area;

    let (x_axis, y_axis) = match request.frame {
        Frame::SingleQuadrant => {
            let x = compute_and_render_axis(
                AxisRequest { name: AxisName::X, spec: request.x_axis },
                &AxisPlacement::edge(area.bottom()),
                &area,
                canvas,
                config,
            )?;
            let y = compute_and_render_axis(
                AxisRequest { name: AxisName::Y, spec: request.y_axis },
                &AxisPlacement::edge(area.left),
                &area,
                canvas,
                config,
            )?;
            (x, y)
        }
        Frame::FourQuadrant => four_quadrant_axes(&request, canvas, config)?,
    };

    let title_top = match request.title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => Some(draw_title(title, &area, canvas, config)),
        None => None,
    };
    let clip = canvas.register_clip_rect(&area);

    let margins = Margins {
        top: title_top.map_or(0.0, |top| area.top - top),
        bottom: x_axis.margin,
        left: y_axis.margin,
    };
    debug!(
        frame = request.frame.name(),
        left = margins.left,
        bottom = margins.bottom,
        top = margins.top,
        "coordinate plane ready"
    );

    Ok(CoordinatePlane {
        frame: request.frame,
        chart_area: area,
        x: x_axis.scale,
        y: y_axis.scale,
        x_band_width: x_axis.band_width,
        y_band_width: y_axis.band_width,
        clip,
        margins,
    })
}

fn four_quadrant_axes(
    request: &PlaneRequest<'_>,
    canvas: &mut Canvas<'_>,
    config: &Config,
) -> RenderResult<(AxisRender, AxisRender)> {
    let (Some(x_spec), Some(y_spec)) = (request.x_axis.as_numeric(), request.y_axis.as_numeric())
    else {
        return Err(RenderError::UnsupportedFrame {
            frame: Frame::FourQuadrant.name(),
        });
    };
    let area = request.area;
    let x_scale = axis_scale(AxisName::X, request.x_axis, &area);
    let y_scale = axis_scale(AxisName::Y, request.y_axis, &area);
    let cross_x = x_scale.map_clamped(0.0);
    let cross_y = y_scale.map_clamped(0.0);

    if request.show_quadrant_labels {
        draw_quadrant_labels(
            (x_spec.min, x_spec.max),
            (y_spec.min, y_spec.max),
            (cross_x, cross_y),
            &area,
            canvas,
            config,
        );
    }

    let arrow = canvas.arrow_marker(&config.theme.axis_color);
    // A zero label would sit on the perpendicular axis line.
    let x = compute_and_render_axis(
        AxisRequest { name: AxisName::X, spec: request.x_axis },
        &AxisPlacement {
            cross: cross_y,
            arrows: Some(arrow.clone()),
            skip_zero_label: x_spec.contains(0.0),
        },
        &area,
        canvas,
        config,
    )?;
    let y = compute_and_render_axis(
        AxisRequest { name: AxisName::Y, spec: request.y_axis },
        &AxisPlacement {
            cross: cross_x,
            arrows: Some(arrow),
            skip_zero_label: y_spec.contains(0.0),
        },
        &area,
        canvas,
        config,
    )?;
    Ok((x, y))
}

/// Roman numeral labels for the quadrants the domain actually reaches.
fn draw_quadrant_labels(
    x_domain: (f64, f64),
    y_domain: (f64, f64),
    cross: (f64, f64),
    area: &ChartArea,
    canvas: &mut Canvas<'_>,
    config: &Config,
) {
    let (cross_x, cross_y) = cross;
    let style = TextStyle::new(config.theme.title_font_size, config.theme.grid_color.clone())
        .anchor(TextAnchor::Middle)
        .baseline(TextBaseline::Middle)
        .bold();
    let right = (cross_x + area.right()) / 2.0;
    let left = (area.left + cross_x) / 2.0;
    let upper = (area.top + cross_y) / 2.0;
    let lower = (cross_y + area.bottom()) / 2.0;
    let quadrants = [
        ("I", x_domain.1 > 0.0 && y_domain.1 > 0.0, right, upper),
        ("II", x_domain.0 < 0.0 && y_domain.1 > 0.0, left, upper),
        ("III", x_domain.0 < 0.0 && y_domain.0 < 0.0, left, lower),
        ("IV", x_domain.1 > 0.0 && y_domain.0 < 0.0, right, lower),
    ];
    for (numeral, spanned, x, y) in quadrants {
        if spanned {
            canvas.text(x, y, numeral, &style);
        }
    }
}

/// Draw the title fully above everything drawn so far and return its top.
fn draw_title(title: &str, area: &ChartArea, canvas: &mut Canvas<'_>, config: &Config) -> f64 {
    let font_size = config.theme.title_font_size;
    let metrics = canvas.metrics();
    let block = metrics.measure(title, area.width, font_size);
    let thickness =
        (block.line_count().saturating_sub(1)) as f64 * metrics.line_height(font_size) + font_size;
    let occupied_top = canvas.extents().min_y.min(area.top);
    let top = occupied_top - config.layout.title_gap - thickness;
    let style = TextStyle::new(font_size, config.theme.text_color.clone())
        .anchor(TextAnchor::Middle)
        .baseline(TextBaseline::Hanging)
        .bold();
    canvas.text_lines(area.center_x(), top, &block, &style);
    top
}
