use std::collections::BTreeMap;

use crate::config::Config;
use crate::error::{AxisName, RenderError, RenderResult};
use crate::ir::{AxisSpec, BarChartParams, BarFill};
use crate::layout::axis::{validate_categorical_axis, validate_numeric_axis};
use crate::layout::ticks::decimals_for;
use crate::layout::{Frame, PlaneRequest, chart_area_for, format_tick, setup_coordinate_plane};
use crate::log::debug;
use crate::render::{Canvas, ShapeStyle, TextAnchor, TextBaseline, TextStyle};
use crate::text_metrics::TextMetrics;

use super::{RenderedWidget, band_slots, check_value_in_domain, finish};

const HATCH_SPACING: f64 = 6.0;

fn validate(params: &BarChartParams) -> RenderResult<Vec<usize>> {
    chart_area_for(params.width, params.height)?;
    validate_categorical_axis(AxisName::X, &params.x_axis)?;
    validate_numeric_axis(AxisName::Y, &params.y_axis)?;
    params
        .bars
        .iter()
        .enumerate()
        .map(|(idx, bar)| {
            let category = params.x_axis.index_of(&bar.category).ok_or_else(|| {
                RenderError::UnknownCategory {
                    what: format!("bar {idx}"),
                    category: bar.category.clone(),
                }
            })?;
            check_value_in_domain(format!("bar {idx}"), bar.value, &params.y_axis)?;
            Ok(category)
        })
        .collect()
}

pub fn render_bar_chart(
    params: &BarChartParams,
    config: &Config,
    metrics: &dyn TextMetrics,
) -> RenderResult<RenderedWidget> {
    let categories = validate(params)?;
    debug!(bars = params.bars.len(), "bar chart validated");

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
    let y_axis = &params.y_axis;
    let base_value = 0.0_f64.clamp(y_axis.min, y_axis.max);
    let baseline = plane.to_svg_y(base_value);
    let band_width = plane.x_band_width.unwrap_or(area.width);

    let mut per_category: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (bar, category) in categories.iter().enumerate() {
        per_category.entry(*category).or_default().push(bar);
    }

    let value_style = TextStyle::new(theme.tick_label_font_size, theme.text_color.clone())
        .anchor(TextAnchor::Middle);
    for (category, bars) in &per_category {
        let center = plane.to_svg_x(*category as f64);
        let slots = band_slots(center, band_width, layout.bar_width_ratio, bars.len());
        let width = band_width * layout.bar_width_ratio / bars.len() as f64;
        for (&bar_idx, x) in bars.iter().zip(slots) {
            let bar = &params.bars[bar_idx];
            let color = bar
                .color
                .clone()
                .unwrap_or_else(|| theme.palette_color(*category).to_string());
            let top = plane.to_svg_y(bar.value);
            let rising = bar.value >= base_value;
            let fill = match bar.fill {
                BarFill::Solid => color.clone(),
                BarFill::Gradient => {
                    // Full color at the value end, fading toward the baseline.
                    let stops = if rising {
                        [(0.0, color.as_str()), (1.0, "#FFFFFF")]
                    } else {
                        [(0.0, "#FFFFFF"), (1.0, color.as_str())]
                    };
                    canvas.linear_gradient(&stops, true).fill_ref()
                }
                BarFill::Hatched => canvas.hatch_pattern(&color, HATCH_SPACING).fill_ref(),
            };
            let style = ShapeStyle::fill(fill).with_stroke(color, 1.0);
            canvas.rect(
                x - width / 2.0,
                top.min(baseline),
                width,
                (top - baseline).abs(),
                &style,
            );

            if params.show_values {
                let text = format_tick(bar.value, decimals_for(bar.value).min(4));
                let gap = layout.tick_label_padding;
                let (y, style) = if rising {
                    (top - gap, value_style.clone())
                } else {
                    (top + gap, value_style.clone().baseline(TextBaseline::Hanging))
                };
                canvas.text(x, y, &text, &style);
            }
        }
    }

    Ok(finish(canvas, plane, config))
}
