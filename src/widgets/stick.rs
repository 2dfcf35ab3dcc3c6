use std::collections::BTreeMap;

use crate::config::Config;
use crate::error::{AxisName, RenderError, RenderResult};
use crate::ir::{AxisSpec, StickPlotParams};
use crate::layout::axis::{validate_categorical_axis, validate_numeric_axis};
use crate::layout::{Frame, PlaneRequest, chart_area_for, setup_coordinate_plane};
use crate::log::debug;
use crate::render::{Canvas, LegendEntry, LegendSwatch, ShapeStyle, TextAnchor, TextStyle};
use crate::text_metrics::TextMetrics;

use super::{
    RenderedWidget, band_slots, check_value_in_domain, draw_legend, finish, overlay_color,
    overlay_stroke,
};

/// Category index of every stick, in input order.
fn validate(params: &StickPlotParams) -> RenderResult<Vec<usize>> {
    chart_area_for(params.width, params.height)?;
    validate_categorical_axis(AxisName::X, &params.x_axis)?;
    validate_numeric_axis(AxisName::Y, &params.y_axis)?;

    let mut indices = Vec::with_capacity(params.sticks.len());
    for (idx, stick) in params.sticks.iter().enumerate() {
        let Some(category) = params.x_axis.index_of(&stick.category) else {
            return Err(RenderError::UnknownCategory {
                what: format!("stick {idx}"),
                category: stick.category.clone(),
            });
        };
        check_value_in_domain(format!("stick {idx}"), stick.value, &params.y_axis)?;
        indices.push(category);
    }
    for (idx, reference) in params.references.iter().enumerate() {
        check_value_in_domain(format!("reference line {idx}"), reference.value, &params.y_axis)?;
    }
    Ok(indices)
}

pub fn render_stick_plot(
    params: &StickPlotParams,
    config: &Config,
    metrics: &dyn TextMetrics,
) -> RenderResult<RenderedWidget> {
    let categories = validate(params)?;
    debug!(sticks = params.sticks.len(), references = params.references.len(), "stick plot validated");

    let area = chart_area_for(params.width, params.height)?;
    let x_spec = AxisSpec::Categorical(params.x_axis.clone());
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

    let theme = &config.theme;
    let layout = &config.layout;
    let mut legend = Vec::new();
    for (idx, reference) in params.references.iter().enumerate() {
        let y = plane.to_svg_y(reference.value);
        canvas.line(area.left, y, area.right(), y, &overlay_stroke(&reference.style, idx, config));
        if let Some(label) = reference.style.label.as_deref().filter(|l| !l.is_empty()) {
            legend.push(LegendEntry {
                label: label.to_string(),
                color: overlay_color(&reference.style, idx, config),
                swatch: LegendSwatch::Line {
                    dashed: reference.style.dashed,
                },
            });
        }
    }

    let mut per_category: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (stick, category) in categories.iter().enumerate() {
        per_category.entry(*category).or_default().push(stick);
    }
    let band_width = plane.x_band_width.unwrap_or(area.width);
    let y_axis = &params.y_axis;
    let baseline = plane.to_svg_y(0.0_f64.clamp(y_axis.min, y_axis.max));
    let label_style = TextStyle::new(theme.tick_label_font_size, theme.text_color.clone())
        .anchor(TextAnchor::Middle);

    for (category, sticks) in &per_category {
        let center = plane.to_svg_x(*category as f64);
        let slots = band_slots(center, band_width, layout.bar_width_ratio, sticks.len());
        for (&stick_idx, x) in sticks.iter().zip(slots) {
            let stick = &params.sticks[stick_idx];
            let color = stick
                .color
                .clone()
                .unwrap_or_else(|| theme.point_color.clone());
            let top = plane.to_svg_y(stick.value);
            canvas.line(x, baseline, x, top, &ShapeStyle::stroke(color.clone(), layout.stick_width));
            canvas.circle(
                x,
                top,
                layout.stick_cap_radius,
                &ShapeStyle::fill(color).with_stroke(theme.point_stroke.clone(), 1.0),
            );
            if let Some(label) = stick.label.as_deref().filter(|l| !l.is_empty()) {
                // Labels go on the side of the cap away from the baseline.
                let offset = layout.stick_cap_radius + layout.point_label_offset;
                let y = if top <= baseline { top - offset } else { top + offset + theme.tick_label_font_size };
                canvas.text(x, y, label, &label_style);
            }
        }
    }

    draw_legend(&mut canvas, &plane, &legend, config);
    Ok(finish(canvas, plane, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{CategoricalAxis, LineStyle, NumericAxis, ReferenceLine, Stick};
    use crate::text_metrics::HeuristicMetrics;

    fn params(sticks: Vec<Stick>) -> StickPlotParams {
        StickPlotParams {
            width: 500.0,
            height: 300.0,
            title: Some("Daily Rainfall".into()),
            x_axis: CategoricalAxis::new(["Mon", "Tue", "Wed", "Thu", "Fri"]).with_label("Day"),
            y_axis: NumericAxis::new(0.0, 50.0, 10.0).with_label("Rainfall (mm)"),
            sticks,
            references: Vec::new(),
        }
    }

    fn stick(category: &str, value: f64) -> Stick {
        Stick {
            category: category.into(),
            value,
            color: None,
            label: None,
        }
    }

    fn render(params: &StickPlotParams) -> RenderResult<RenderedWidget> {
        render_stick_plot(params, &Config::default(), &HeuristicMetrics::default())
    }

    #[test]
    fn empty_stick_plot_renders_axes_labels_and_title() {
        let rendered = render(&params(Vec::new())).unwrap();
        for day in ["Mon", "Tue", "Wed", "Thu", "Fri"] {
            assert!(rendered.svg.contains(&format!(">{day}</text>")), "missing {day}");
        }
        assert!(rendered.svg.contains(">Daily Rainfall</tspan>"));
        assert!(!rendered.svg.contains("<circle"));
        assert_eq!(rendered.plane.x_band_width, Some(100.0));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = render(&params(vec![stick("Sat", 10.0)])).unwrap_err();
        assert_eq!(
            err,
            RenderError::UnknownCategory {
                what: "stick 0".into(),
                category: "Sat".into()
            }
        );
    }

    #[test]
    fn out_of_domain_value_is_rejected() {
        let err = render(&params(vec![stick("Mon", 10.0), stick("Tue", 60.0)])).unwrap_err();
        assert!(matches!(err, RenderError::ValueOutOfDomain { value, .. } if value == 60.0));
    }

    #[test]
    fn sticks_rise_from_the_baseline_at_band_centers() {
        let rendered = render(&params(vec![stick("Wed", 25.0)])).unwrap();
        // Band 2 of 5 across 500px is centered at 250; 25 of 50 sits at y = 150.
        assert!(rendered.svg.contains("x1=\"250.00\" y1=\"300.00\" x2=\"250.00\" y2=\"150.00\""));
        assert!(rendered.svg.contains("<circle cx=\"250.00\" cy=\"150.00\""));
    }

    #[test]
    fn shared_category_spreads_sticks() {
        let rendered = render(&params(vec![stick("Mon", 10.0), stick("Mon", 20.0)])).unwrap();
        // Band 0 centered at 50, 60px of it shared by two sticks.
        assert!(rendered.svg.contains("<circle cx=\"35.00\""));
        assert!(rendered.svg.contains("<circle cx=\"65.00\""));
    }

    #[test]
    fn labeled_reference_line_is_listed_in_legend() {
        let mut params = params(vec![stick("Mon", 10.0)]);
        params.references.push(ReferenceLine {
            value: 30.0,
            style: LineStyle {
                dashed: true,
                label: Some("Weekly mean".into()),
                ..LineStyle::default()
            },
        });
        let rendered = render(&params).unwrap();
        assert!(rendered.svg.contains("x1=\"0.00\" y1=\"120.00\" x2=\"500.00\" y2=\"120.00\""));
        assert!(rendered.svg.contains(">Weekly mean</text>"));
    }
}
