use crate::config::Config;
use crate::error::{AxisName, RenderError, RenderResult};
use crate::ir::{AxisSpec, ConceptualGraphParams};
use crate::layout::axis::validate_numeric_axis;
use crate::layout::{Frame, PlaneRequest, chart_area_for, setup_coordinate_plane};
use crate::log::debug;
use crate::render::{Canvas, LegendEntry, LegendSwatch, PathBuilder};
use crate::text_metrics::TextMetrics;

use super::{
    RenderedWidget, check_points_in_domain, draw_legend, draw_points, finish, overlay_color,
    overlay_stroke,
};

fn validate(params: &ConceptualGraphParams) -> RenderResult<()> {
    chart_area_for(params.width, params.height)?;
    validate_numeric_axis(AxisName::X, &params.x_axis)?;
    validate_numeric_axis(AxisName::Y, &params.y_axis)?;
    for (index, curve) in params.curves.iter().enumerate() {
        if curve.points.len() < 2 {
            return Err(RenderError::InvalidCurve {
                index,
                reason: format!("needs at least 2 points, got {}", curve.points.len()),
            });
        }
        if let Some(bad) = curve.points.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(RenderError::InvalidCurve {
                index,
                reason: format!("non-finite point ({}, {})", bad.x, bad.y),
            });
        }
    }
    // Curves may leave the domain (they are clipped); marked points may not.
    check_points_in_domain("point", &params.points, &params.x_axis, &params.y_axis)
}

pub fn render_conceptual_graph(
    params: &ConceptualGraphParams,
    config: &Config,
    metrics: &dyn TextMetrics,
) -> RenderResult<RenderedWidget> {
    validate(params)?;
    debug!(curves = params.curves.len(), points = params.points.len(), "conceptual graph validated");

    let area = chart_area_for(params.width, params.height)?;
    let x_spec = AxisSpec::Numeric(params.x_axis.clone());
    let y_spec = AxisSpec::Numeric(params.y_axis.clone());
    let mut canvas = Canvas::new(&area, metrics, &config.theme.font_family);
    let plane = setup_coordinate_plane(
        PlaneRequest {
            frame: Frame::FourQuadrant,
            title: params.title.as_deref(),
            x_axis: &x_spec,
            y_axis: &y_spec,
            area,
            show_quadrant_labels: params.show_quadrant_labels,
        },
        &mut canvas,
        config,
    )?;

    let mut legend = Vec::new();
    let clip = plane.clip.clone();
    canvas.draw_in_clipped_region(&clip, |inner| {
        for (idx, curve) in params.curves.iter().enumerate() {
            let pixels: Vec<(f64, f64)> = curve.points.iter().map(|p| plane.to_svg(*p)).collect();
            let path = if curve.smooth {
                PathBuilder::smooth(&pixels)
            } else {
                PathBuilder::polyline(&pixels)
            };
            inner.path(&path, &overlay_stroke(&curve.style, idx, config));
            if let Some(label) = curve.style.label.as_deref().filter(|l| !l.is_empty()) {
                legend.push(LegendEntry {
                    label: label.to_string(),
                    color: overlay_color(&curve.style, idx, config),
                    swatch: LegendSwatch::Line {
                        dashed: curve.style.dashed,
                    },
                });
            }
        }
    });

    draw_points(&mut canvas, &plane, &params.points, config);
    draw_legend(&mut canvas, &plane, &legend, config);
    Ok(finish(canvas, plane, config))
}
