//! Thinning of tick labels so neighbours never overlap.
//!
//! Selection favours uniform spacing over packing: every `step`-th
//! non-empty label is kept, starting with the first.

use std::collections::BTreeSet;

use crate::error::{RenderError, RenderResult};
use crate::text_metrics::TextMetrics;

use super::AxisOrientation;

#[derive(Debug, Clone, Copy)]
pub struct LabelSelectionRequest<'a> {
    pub labels: &'a [String],
    pub positions: &'a [f64],
    pub axis_length: f64,
    pub orientation: AxisOrientation,
    pub font_size: f64,
    pub min_gap: f64,
}

impl LabelSelectionRequest<'_> {
    /// Space one label occupies along the axis.
    fn footprint(&self, label: &str, metrics: &dyn TextMetrics) -> f64 {
        match self.orientation {
            AxisOrientation::Horizontal => {
                label.chars().count() as f64 * metrics.average_char_width(self.font_size)
            }
            AxisOrientation::Vertical => self.font_size,
        }
    }

    /// How many average-sized labels fit along the axis; never below one.
    pub fn max_labels_that_fit(&self, metrics: &dyn TextMetrics) -> usize {
        let non_empty: Vec<&String> = self.labels.iter().filter(|l| !l.is_empty()).collect();
        if non_empty.is_empty() {
            return 0;
        }
        let average = non_empty
            .iter()
            .map(|label| self.footprint(label, metrics))
            .sum::<f64>()
            / non_empty.len() as f64;
        let slot = average + self.min_gap;
        if slot <= 0.0 {
            return non_empty.len();
        }
        ((self.axis_length / slot).floor().max(1.0)) as usize
    }
}

pub fn select_axis_labels(
    request: &LabelSelectionRequest<'_>,
    metrics: &dyn TextMetrics,
) -> RenderResult<BTreeSet<usize>> {
    if request.labels.len() != request.positions.len() {
        return Err(RenderError::MismatchedLabels {
            labels: request.labels.len(),
            positions: request.positions.len(),
        });
    }

    let candidates: Vec<usize> = request
        .labels
        .iter()
        .enumerate()
        .filter(|(_, label)| !label.is_empty())
        .map(|(idx, _)| idx)
        .collect();
    if candidates.is_empty() {
        return Ok(BTreeSet::new());
    }

    let fit = request.max_labels_that_fit(metrics);
    if candidates.len() <= fit {
        return Ok(candidates.into_iter().collect());
    }
    let step = candidates.len().div_ceil(fit);
    Ok(candidates.into_iter().step_by(step).collect())
}
