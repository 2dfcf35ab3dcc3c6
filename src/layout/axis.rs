//! Per-axis layout: validation, scale, margin, and drawing.

use std::collections::BTreeSet;

use crate::config::Config;
use crate::error::{AxisName, RenderError, RenderResult};
use crate::ir::{AxisSpec, CategoricalAxis, NumericAxis};
use crate::log::debug;
use crate::render::{Canvas, MarkerId, ShapeStyle, TextAnchor, TextBaseline, TextStyle};

use super::label_placement::{LabelSelectionRequest, select_axis_labels};
use super::ticks::{MAX_TICKS, build_category_ticks, build_ticks, tick_count};
use super::{AxisOrientation, ChartArea, Scale, TickSet};

/// Rotation applied to crowded horizontal category labels.
const CROWDED_LABEL_ROTATION: f64 = -45.0;
/// Gap between an axis arrowhead and the title written past it.
const ARROW_TITLE_GAP: f64 = 8.0;

pub fn validate_numeric_axis(name: AxisName, axis: &NumericAxis) -> RenderResult<()> {
    if !axis.min.is_finite() || !axis.max.is_finite() || axis.min >= axis.max {
        return Err(RenderError::InvalidAxisDomain {
            axis: name,
            min: axis.min,
            max: axis.max,
        });
    }
    if !axis.tick_interval.is_finite() || axis.tick_interval <= 0.0 {
        return Err(RenderError::InvalidTickInterval {
            axis: name,
            interval: axis.tick_interval,
        });
    }
    if tick_count(axis.min, axis.max, axis.tick_interval) > MAX_TICKS {
        return Err(RenderError::InvalidTickInterval {
            axis: name,
            interval: axis.tick_interval,
        });
    }
    Ok(())
}

pub fn validate_categorical_axis(name: AxisName, axis: &CategoricalAxis) -> RenderResult<()> {
    if axis.categories.is_empty() {
        return Err(RenderError::EmptyCategories { axis: name });
    }
    Ok(())
}

pub fn validate_axis(name: AxisName, spec: &AxisSpec) -> RenderResult<()> {
    match spec {
        AxisSpec::Numeric(axis) => validate_numeric_axis(name, axis),
        AxisSpec::Categorical(axis) => validate_categorical_axis(name, axis),
    }
}

/// Where the axis line sits and how its ends are decorated.
#[derive(Debug, Clone)]
pub struct AxisPlacement {
    /// Pixel coordinate of the axis line across its own direction: a y for
    /// the horizontal axis, an x for the vertical one.
    pub cross: f64,
    /// Arrowheads on both ends; the title then goes past the positive end.
    pub arrows: Option<MarkerId>,
    /// Leave out the label at value zero (where two centered axes cross).
    pub skip_zero_label: bool,
}

impl AxisPlacement {
    pub fn edge(cross: f64) -> Self {
        Self {
            cross,
            arrows: None,
            skip_zero_label: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AxisRequest<'a> {
    pub name: AxisName,
    pub spec: &'a AxisSpec,
}

impl AxisRequest<'_> {
    fn orientation(&self) -> AxisOrientation {
        match self.name {
            AxisName::X => AxisOrientation::Horizontal,
            AxisName::Y => AxisOrientation::Vertical,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisRender {
    pub scale: Scale,
    pub band_width: Option<f64>,
    /// Space consumed outside the chart rectangle on the axis' side.
    pub margin: f64,
    pub ticks: TickSet,
    pub selected_labels: BTreeSet<usize>,
}

pub fn axis_scale(name: AxisName, spec: &AxisSpec, area: &ChartArea) -> Scale {
    match (name, spec) {
        (AxisName::X, AxisSpec::Numeric(axis)) => {
            Scale::linear((axis.min, axis.max), (area.left, area.right()))
        }
        (AxisName::Y, AxisSpec::Numeric(axis)) => {
            Scale::linear((axis.min, axis.max), (area.bottom(), area.top))
        }
        (AxisName::X, AxisSpec::Categorical(axis)) => {
            Scale::band(axis.categories.len(), (area.left, area.right()))
        }
        (AxisName::Y, AxisSpec::Categorical(axis)) => {
            Scale::band(axis.categories.len(), (area.top, area.bottom()))
        }
    }
}

fn axis_ticks(spec: &AxisSpec) -> TickSet {
    match spec {
        AxisSpec::Numeric(axis) => build_ticks(axis.min, axis.max, axis.tick_interval),
        AxisSpec::Categorical(axis) => build_category_ticks(&axis.categories),
    }
}

fn shows_tick_labels(spec: &AxisSpec) -> bool {
    match spec {
        AxisSpec::Numeric(axis) => axis.show_tick_labels,
        AxisSpec::Categorical(_) => true,
    }
}

/// Lay out one axis against the fixed chart rectangle and draw it.
///
/// The returned scale maps domain values (category indices for categorical
/// axes) to pixels along the axis.
pub fn compute_and_render_axis(
    request: AxisRequest<'_>,
    placement: &AxisPlacement,
    area: &ChartArea,
    canvas: &mut Canvas<'_>,
    config: &Config,
) -> RenderResult<AxisRender> {
    validate_axis(request.name, request.spec)?;
    let theme = &config.theme;
    let layout = &config.layout;
    let metrics = canvas.metrics();
    let orientation = request.orientation();

    let scale = axis_scale(request.name, request.spec, area);
    let ticks = axis_ticks(request.spec);
    let positions: Vec<f64> = ticks.values.iter().map(|v| scale.map(*v)).collect();

    // Labels that will never be drawn are blanked before selection.
    let display: Vec<String> = ticks
        .labels
        .iter()
        .zip(&ticks.values)
        .map(|(label, value)| {
            let hidden = !shows_tick_labels(request.spec)
                || (placement.skip_zero_label && value.abs() < f64::EPSILON);
            if hidden { String::new() } else { label.clone() }
        })
        .collect();

    let font_size = theme.tick_label_font_size;
    let axis_length = match orientation {
        AxisOrientation::Horizontal => area.width,
        AxisOrientation::Vertical => area.height,
    };
    let selection = LabelSelectionRequest {
        labels: &display,
        positions: &positions,
        axis_length,
        orientation,
        font_size,
        min_gap: layout.label_min_gap,
    };
    let mut selected = select_axis_labels(&selection, metrics)?;
    let non_empty = display.iter().filter(|l| !l.is_empty()).count();

    // Categories are never thinned while rotation can still fit them.
    let mut rotate = None;
    if orientation == AxisOrientation::Horizontal
        && matches!(request.spec, AxisSpec::Categorical(_))
        && selected.len() < non_empty
    {
        rotate = Some(CROWDED_LABEL_ROTATION);
        let rotated = LabelSelectionRequest {
            orientation: AxisOrientation::Vertical,
            ..selection
        };
        selected = select_axis_labels(&rotated, metrics)?;
    }
    debug!(
        axis = %request.name,
        ticks = ticks.len(),
        selected = selected.len(),
        rotated = rotate.is_some(),
        "axis labels selected"
    );

    let axis_style = ShapeStyle::stroke(theme.axis_color.clone(), layout.axis_stroke_width)
        .with_markers(placement.arrows.as_ref(), placement.arrows.as_ref());
    let tick_style = ShapeStyle::stroke(theme.axis_color.clone(), layout.axis_stroke_width);
    let grid_style = ShapeStyle::stroke(theme.grid_color.clone(), layout.grid_stroke_width);
    let cross = placement.cross;

    // Grid first so the axis line paints over it.
    if request.spec.show_grid_lines() {
        for &pos in &positions {
            match orientation {
                AxisOrientation::Horizontal => {
                    canvas.line(pos, area.top, pos, area.bottom(), &grid_style)
                }
                AxisOrientation::Vertical => {
                    canvas.line(area.left, pos, area.right(), pos, &grid_style)
                }
            }
        }
    }

    match orientation {
        AxisOrientation::Horizontal => canvas.line(area.left, cross, area.right(), cross, &axis_style),
        AxisOrientation::Vertical => canvas.line(cross, area.top, cross, area.bottom(), &axis_style),
    }
    for &pos in &positions {
        match orientation {
            AxisOrientation::Horizontal => {
                canvas.line(pos, cross, pos, cross + layout.tick_length, &tick_style)
            }
            AxisOrientation::Vertical => {
                canvas.line(cross - layout.tick_length, pos, cross, pos, &tick_style)
            }
        }
    }

    let label_offset = layout.tick_length + layout.tick_label_padding;
    let mut label_style = TextStyle::new(font_size, theme.text_color.clone());
    let mut label_extent: f64 = 0.0;
    for &idx in &selected {
        let text = &display[idx];
        let pos = positions[idx];
        let width = metrics.text_width(text, font_size);
        match (orientation, rotate) {
            (AxisOrientation::Horizontal, Some(deg)) => {
                label_style = label_style
                    .anchor(TextAnchor::End)
                    .baseline(TextBaseline::Middle)
                    .rotate(deg);
                let (sin, cos) = deg.abs().to_radians().sin_cos();
                label_extent = label_extent.max(width * sin + font_size * cos / 2.0);
                canvas.text(pos, cross + label_offset, text, &label_style);
            }
            (AxisOrientation::Horizontal, None) => {
                label_style = label_style
                    .anchor(TextAnchor::Middle)
                    .baseline(TextBaseline::Hanging);
                label_extent = label_extent.max(font_size);
                canvas.text(pos, cross + label_offset, text, &label_style);
            }
            (AxisOrientation::Vertical, _) => {
                label_style = label_style
                    .anchor(TextAnchor::End)
                    .baseline(TextBaseline::Middle);
                label_extent = label_extent.max(width);
                canvas.text(cross - label_offset, pos, text, &label_style);
            }
        }
    }
    let labels_reach = if selected.is_empty() {
        layout.tick_length
    } else {
        label_offset + label_extent
    };

    let title_reach = draw_axis_title(request, placement, area, labels_reach, canvas, config);
    let margin = labels_reach + title_reach;
    debug!(axis = %request.name, margin, "axis margin");

    Ok(AxisRender {
        band_width: scale.band_width(),
        scale,
        margin,
        ticks,
        selected_labels: selected,
    })
}

/// Draw the axis title and return how far it reaches beyond the labels.
fn draw_axis_title(
    request: AxisRequest<'_>,
    placement: &AxisPlacement,
    area: &ChartArea,
    labels_reach: f64,
    canvas: &mut Canvas<'_>,
    config: &Config,
) -> f64 {
    let title = request.spec.label().trim();
    if title.is_empty() {
        return 0.0;
    }
    let theme = &config.theme;
    let layout = &config.layout;
    let font_size = theme.axis_title_font_size;
    let style = TextStyle::new(font_size, theme.text_color.clone()).bold();
    let cross = placement.cross;

    if placement.arrows.is_some() {
        // Centered axes: the title sits just past the arrowhead.
        match request.name {
            AxisName::X => {
                let style = style.anchor(TextAnchor::Start).baseline(TextBaseline::Middle);
                canvas.wrapped_text(area.right() + ARROW_TITLE_GAP, cross, title, area.width / 2.0, &style);
            }
            AxisName::Y => {
                let style = style.anchor(TextAnchor::Middle);
                let block = canvas.metrics().measure(title, area.width / 2.0, font_size);
                let line_height = canvas.metrics().line_height(font_size);
                let first_baseline =
                    area.top - ARROW_TITLE_GAP - (block.line_count().saturating_sub(1)) as f64 * line_height;
                canvas.text_lines(cross, first_baseline - font_size * 0.2, &block, &style);
            }
        }
        return 0.0;
    }

    let offset = labels_reach + layout.axis_title_padding;
    match request.name {
        AxisName::X => {
            let style = style.anchor(TextAnchor::Middle).baseline(TextBaseline::Hanging);
            let block = canvas.wrapped_text(area.center_x(), cross + offset, title, area.width, &style);
            layout.axis_title_padding + block.height
        }
        AxisName::Y => {
            let block = canvas.metrics().measure(title, area.height, font_size);
            let line_height = canvas.metrics().line_height(font_size);
            let thickness = (block.line_count().saturating_sub(1)) as f64 * line_height + font_size;
            let style = style
                .anchor(TextAnchor::Middle)
                .baseline(TextBaseline::Hanging)
                .rotate(-90.0);
            canvas.text_lines(cross - offset - thickness, area.center_y(), &block, &style);
            layout.axis_title_padding + thickness
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_metrics::{HeuristicMetrics, TextMetrics};

    fn area() -> ChartArea {
        ChartArea::new(0.0, 0.0, 600.0, 400.0)
    }

    fn numeric(min: f64, max: f64, interval: f64) -> AxisSpec {
        AxisSpec::Numeric(NumericAxis::new(min, max, interval))
    }

    #[test]
    fn numeric_validation_rejects_inverted_domain() {
        let err = validate_numeric_axis(AxisName::X, &NumericAxis::new(5.0, 5.0, 1.0)).unwrap_err();
        assert!(matches!(err, RenderError::InvalidAxisDomain { axis: AxisName::X, .. }));
        assert!(validate_numeric_axis(AxisName::X, &NumericAxis::new(f64::NAN, 5.0, 1.0)).is_err());
    }

    #[test]
    fn numeric_validation_rejects_bad_interval() {
        for interval in [0.0, -1.0, f64::INFINITY, 1e-9] {
            let err = validate_numeric_axis(AxisName::Y, &NumericAxis::new(0.0, 10.0, interval)).unwrap_err();
            assert!(matches!(err, RenderError::InvalidTickInterval { axis: AxisName::Y, .. }));
        }
    }

    #[test]
    fn categorical_validation_requires_categories() {
        let empty = CategoricalAxis::new(Vec::<String>::new());
        assert_eq!(
            validate_categorical_axis(AxisName::X, &empty),
            Err(RenderError::EmptyCategories { axis: AxisName::X })
        );
    }

    #[test]
    fn numeric_x_axis_maps_domain_to_chart_edges() {
        let metrics = HeuristicMetrics::default();
        let config = Config::default();
        let area = area();
        let mut canvas = Canvas::new(&area, &metrics, "sans-serif");
        let spec = numeric(140.0, 200.0, 10.0);
        let axis = compute_and_render_axis(
            AxisRequest { name: AxisName::X, spec: &spec },
            &AxisPlacement::edge(area.bottom()),
            &area,
            &mut canvas,
            &config,
        )
        .unwrap();
        assert_eq!(axis.scale.map(140.0), 0.0);
        assert_eq!(axis.scale.map(200.0), 600.0);
        assert_eq!(axis.band_width, None);
        assert_eq!(axis.ticks.len(), 7);
        assert_eq!(axis.selected_labels.len(), 7);
    }

    #[test]
    fn margin_grows_with_title() {
        let metrics = HeuristicMetrics::default();
        let config = Config::default();
        let area = area();
        let bare = numeric(0.0, 100.0, 20.0);
        let titled = AxisSpec::Numeric(NumericAxis::new(0.0, 100.0, 20.0).with_label("Height (cm)"));

        let mut canvas = Canvas::new(&area, &metrics, "sans-serif");
        let placement = AxisPlacement::edge(area.left);
        let without = compute_and_render_axis(
            AxisRequest { name: AxisName::Y, spec: &bare },
            &placement,
            &area,
            &mut canvas,
            &config,
        )
        .unwrap();
        let with = compute_and_render_axis(
            AxisRequest { name: AxisName::Y, spec: &titled },
            &placement,
            &area,
            &mut canvas,
            &config,
        )
        .unwrap();

        let layout = &config.layout;
        let widest = metrics.text_width("100", config.theme.tick_label_font_size);
        let expected = layout.tick_length + layout.tick_label_padding + widest;
        assert!((without.margin - expected).abs() < 1e-9);
        let title_thickness = config.theme.axis_title_font_size;
        assert!((with.margin - (expected + layout.axis_title_padding + title_thickness)).abs() < 1e-9);
        // The rotated title stays entirely left of the tick labels.
        assert!(canvas.extents().min_x <= area.left - with.margin + 1e-6);
    }

    #[test]
    fn categorical_axis_reports_band_width() {
        let metrics = HeuristicMetrics::default();
        let config = Config::default();
        let area = area();
        let mut canvas = Canvas::new(&area, &metrics, "sans-serif");
        let spec = AxisSpec::Categorical(CategoricalAxis::new(["A", "B", "C", "D"]));
        let axis = compute_and_render_axis(
            AxisRequest { name: AxisName::X, spec: &spec },
            &AxisPlacement::edge(area.bottom()),
            &area,
            &mut canvas,
            &config,
        )
        .unwrap();
        assert_eq!(axis.band_width, Some(150.0));
        assert_eq!(axis.scale.map(0.0), 75.0);
        assert_eq!(axis.selected_labels.len(), 4);
    }

    #[test]
    fn crowded_categories_rotate_instead_of_dropping() {
        let metrics = HeuristicMetrics::default();
        let config = Config::default();
        let area = ChartArea::new(0.0, 0.0, 300.0, 200.0);
        let mut canvas = Canvas::new(&area, &metrics, "sans-serif");
        let names: Vec<String> = (0..12).map(|i| format!("Category {i}")).collect();
        let spec = AxisSpec::Categorical(CategoricalAxis::new(names));
        let axis = compute_and_render_axis(
            AxisRequest { name: AxisName::X, spec: &spec },
            &AxisPlacement::edge(area.bottom()),
            &area,
            &mut canvas,
            &config,
        )
        .unwrap();
        assert_eq!(axis.selected_labels.len(), 12);
        let markup = canvas.finalize(0.0);
        assert!(markup.body.contains("rotate(-45.00"));
    }

    #[test]
    fn zero_label_can_be_skipped() {
        let metrics = HeuristicMetrics::default();
        let config = Config::default();
        let area = area();
        let mut canvas = Canvas::new(&area, &metrics, "sans-serif");
        let spec = numeric(-10.0, 10.0, 5.0);
        let placement = AxisPlacement {
            cross: area.center_y(),
            arrows: None,
            skip_zero_label: true,
        };
        let axis = compute_and_render_axis(
            AxisRequest { name: AxisName::X, spec: &spec },
            &placement,
            &area,
            &mut canvas,
            &config,
        )
        .unwrap();
        assert!(!axis.selected_labels.contains(&2));
        assert_eq!(axis.selected_labels.len(), 4);
    }
}
