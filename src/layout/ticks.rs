use super::TickSet;

/// Upper bound on ticks per axis; tighter intervals are rejected at validation.
pub const MAX_TICKS: usize = 1000;

const MAX_DECIMALS: usize = 10;

/// Ticks from `min` every `interval`, stopping at or before `max`.
///
/// Callers validate `min < max` and `interval > 0` beforehand; degenerate
/// input yields an empty set.
pub fn build_ticks(min: f64, max: f64, interval: f64) -> TickSet {
    if !(interval > 0.0) || !(min < max) || !min.is_finite() || !max.is_finite() {
        return TickSet::default();
    }
    let count = (((max - min) / interval) + 1e-9).floor() as usize + 1;
    let count = count.min(MAX_TICKS);
    let decimals = decimals_for(interval).max(decimals_for(min));

    let mut ticks = TickSet::default();
    for i in 0..count {
        let value = round_to(min + i as f64 * interval, decimals);
        ticks.labels.push(format_tick(value, decimals));
        ticks.values.push(value);
    }
    ticks
}

/// Categories map to their zero-based index; labels pass through verbatim.
pub fn build_category_ticks(categories: &[String]) -> TickSet {
    TickSet {
        values: (0..categories.len()).map(|i| i as f64).collect(),
        labels: categories.to_vec(),
    }
}

/// Number of tick marks an interval produces over a domain.
pub fn tick_count(min: f64, max: f64, interval: f64) -> usize {
    if !(interval > 0.0) || !(min < max) {
        return 0;
    }
    let raw = ((max - min) / interval + 1e-9).floor();
    if raw.is_finite() && raw < usize::MAX as f64 {
        raw as usize + 1
    } else {
        usize::MAX
    }
}

/// Fewest decimal digits that represent `value` exactly (up to 1e-9).
pub fn decimals_for(value: f64) -> usize {
    if !value.is_finite() {
        return 0;
    }
    let mut scaled = value.abs();
    for decimals in 0..MAX_DECIMALS {
        if (scaled - scaled.round()).abs() < 1e-9 * scaled.max(1.0) {
            return decimals;
        }
        scaled *= 10.0;
    }
    MAX_DECIMALS
}

pub fn format_tick(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    // "-0", "-0.0" and friends
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}

fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
