use crate::config::Config;
use crate::error::{AxisName, RenderError, RenderResult};
use crate::ir::{AxisSpec, LineOverlay, NumericAxis, Point, RegressionMethod, ScatterPlotParams};
use crate::layout::axis::validate_numeric_axis;
use crate::layout::{CoordinatePlane, Frame, PlaneRequest, chart_area_for, setup_coordinate_plane};
use crate::log::{debug, warn};
use crate::regression::{RegressionResult, fit};
use crate::render::{Canvas, LegendEntry, LegendSwatch, PathBuilder, ShapeStyle};
use crate::text_metrics::TextMetrics;

use super::{RenderedWidget, check_points_in_domain, draw_legend, draw_points, finish, overlay_color, overlay_stroke};

fn validate(params: &ScatterPlotParams) -> RenderResult<()> {
    chart_area_for(params.width, params.height)?;
    validate_numeric_axis(AxisName::X, &params.x_axis)?;
    validate_numeric_axis(AxisName::Y, &params.y_axis)?;
    check_points_in_domain("point", &params.points, &params.x_axis, &params.y_axis)?;

    for overlay in &params.lines {
        match overlay {
            LineOverlay::TwoPoints { a, b, .. } => {
                if a == b {
                    return Err(RenderError::IdenticalEndpoints { x: a.x, y: a.y });
                }
            }
            LineOverlay::BestFit { method, .. } => {
                let required = method.min_points();
                if params.points.len() < required {
                    return Err(RenderError::InsufficientPoints {
                        method: method.name(),
                        required,
                        actual: params.points.len(),
                    });
                }
                if *method == RegressionMethod::Exponential
                    && let Some(bad) = params.points.iter().find(|p| p.y <= 0.0)
                {
                    return Err(RenderError::NonPositiveValue { x: bad.x, y: bad.y });
                }
            }
        }
    }
    Ok(())
}

/// The part of the infinite line through `a` and `b` inside the axis domain,
/// or `None` when the line misses it.
pub fn clip_line_to_domain(
    a: Point,
    b: Point,
    x_axis: &NumericAxis,
    y_axis: &NumericAxis,
) -> Option<(Point, Point)> {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let mut lo = f64::NEG_INFINITY;
    let mut hi = f64::INFINITY;
    for (start, delta, min, max) in [
        (a.x, dx, x_axis.min, x_axis.max),
        (a.y, dy, y_axis.min, y_axis.max),
    ] {
        if delta == 0.0 {
            if start < min || start > max {
                return None;
            }
            continue;
        }
        let t0 = (min - start) / delta;
        let t1 = (max - start) / delta;
        lo = lo.max(t0.min(t1));
        hi = hi.min(t0.max(t1));
    }
    if !(lo < hi) {
        return None;
    }
    let at = |t: f64| {
        Point::new(
            (a.x + t * dx).clamp(x_axis.min, x_axis.max),
            (a.y + t * dy).clamp(y_axis.min, y_axis.max),
        )
    };
    Some((at(lo), at(hi)))
}

pub fn render_scatter_plot(
    params: &ScatterPlotParams,
    config: &Config,
    metrics: &dyn TextMetrics,
) -> RenderResult<RenderedWidget> {
    validate(params)?;
    debug!(points = params.points.len(), overlays = params.lines.len(), "scatter plot validated");

    let area = chart_area_for(params.width, params.height)?;
    let x_spec = AxisSpec::Numeric(params.x_axis.clone());
    let y_spec = AxisSpec::Numeric(params.y_axis.clone());
    let mut canvas = Canvas::new(&area, metrics, &config.theme.font_family);
    let plane = setup_coordinate_plane(
        PlaneRequest {
            frame: Frame::SingleQuadrant,
            title: params.title.as_deref(),
            x_axis: &x_spec,
            y_axis: &y_spec,
            area,
            show_quadrant_labels: false,
        },
        &mut canvas,
        config,
    )?;

    let data: Vec<Point> = params.points.iter().map(|p| p.point()).collect();
    let mut legend = Vec::new();
    for (idx, overlay) in params.lines.iter().enumerate() {
        let stroke = overlay_stroke(overlay.style(), idx, config);
        let drawn = match overlay {
            LineOverlay::TwoPoints { a, b, .. } => {
                draw_two_point_line(&mut canvas, &plane, *a, *b, params, &stroke)
            }
            LineOverlay::BestFit { method, .. } => match fit(*method, &data) {
                Some(result) => {
                    draw_best_fit(&mut canvas, &plane, &result, params, &stroke, config);
                    true
                }
                None => {
                    warn!(method = method.name(), "best-fit overlay has no fit; omitted");
                    false
                }
            },
        };
        if drawn && let Some(label) = overlay.style().label.as_deref().filter(|l| !l.is_empty()) {
            legend.push(LegendEntry {
                label: label.to_string(),
                color: overlay_color(overlay.style(), idx, config),
                swatch: LegendSwatch::Line {
                    dashed: overlay.style().dashed,
                },
            });
        }
    }

    draw_points(&mut canvas, &plane, &params.points, config);
    draw_legend(&mut canvas, &plane, &legend, config);
    Ok(finish(canvas, plane, config))
}

/// Straight lines already end on the domain edges, so they skip the clip.
fn draw_two_point_line(
    canvas: &mut Canvas<'_>,
    plane: &CoordinatePlane,
    a: Point,
    b: Point,
    params: &ScatterPlotParams,
    stroke: &ShapeStyle,
) -> bool {
    let Some((start, end)) = clip_line_to_domain(a, b, &params.x_axis, &params.y_axis) else {
        warn!(?a, ?b, "two-point line misses the axis domain; omitted");
        return false;
    };
    let (x1, y1) = plane.to_svg(start);
    let (x2, y2) = plane.to_svg(end);
    canvas.line(x1, y1, x2, y2, stroke);
    true
}

fn draw_best_fit(
    canvas: &mut Canvas<'_>,
    plane: &CoordinatePlane,
    result: &RegressionResult,
    params: &ScatterPlotParams,
    stroke: &ShapeStyle,
    config: &Config,
) {
    let (x_min, x_max) = (params.x_axis.min, params.x_axis.max);
    if result.is_straight() {
        let y_axis = &params.y_axis;
        let tolerance = 1e-9 * (y_axis.max - y_axis.min);
        let inside = |y: f64| y >= y_axis.min - tolerance && y <= y_axis.max + tolerance;
        let (y0, y1) = (result.evaluate(x_min), result.evaluate(x_max));
        if inside(y0) && inside(y1) {
            let clamp = |y: f64| y.clamp(y_axis.min, y_axis.max);
            let (px0, py0) = plane.to_svg(Point::new(x_min, clamp(y0)));
            let (px1, py1) = plane.to_svg(Point::new(x_max, clamp(y1)));
            canvas.line(px0, py0, px1, py1, stroke);
        } else {
            let (px0, py0) = plane.to_svg(Point::new(x_min, y0));
            let (px1, py1) = plane.to_svg(Point::new(x_max, y1));
            let clip = plane.clip.clone();
            canvas.draw_in_clipped_region(&clip, |inner| inner.line(px0, py0, px1, py1, stroke));
        }
        return;
    }

    let samples = config.layout.curve_samples.max(2);
    let area = plane.chart_area;
    // Far-off samples only need to leave the clip rectangle, not reach infinity.
    let (lo, hi) = (area.top - area.height, area.bottom() + area.height);
    let points: Vec<(f64, f64)> = (0..=samples)
        .filter_map(|i| {
            let x = x_min + (x_max - x_min) * i as f64 / samples as f64;
            let y = result.evaluate(x);
            if !y.is_finite() {
                return None;
            }
            Some((plane.to_svg_x(x), plane.to_svg_y(y).clamp(lo, hi)))
        })
        .collect();
    if points.len() < 2 {
        return;
    }
    let path = PathBuilder::polyline(&points);
    let clip = plane.clip.clone();
    canvas.draw_in_clipped_region(&clip, |inner| inner.path(&path, stroke));
}
