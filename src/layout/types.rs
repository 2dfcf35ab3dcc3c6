use serde::Serialize;

/// Logical rectangle reserved for plotted content. Fixed for one render;
/// axes, titles and legends are laid out around it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ChartArea {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisOrientation {
    Horizontal,
    Vertical,
}

/// Parallel tick values and display labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickSet {
    pub values: Vec<f64>,
    pub labels: Vec<String>,
}

impl TickSet {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Domain-to-pixel mapping along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// `domain_min` maps to `range_start`, `domain_max` to `range_end`.
    Linear {
        domain_min: f64,
        domain_max: f64,
        range_start: f64,
        range_end: f64,
    },
    /// `count` equal bands between `range_start` and `range_end`, in
    /// category order; a category index maps to its band center.
    Band {
        count: usize,
        range_start: f64,
        range_end: f64,
    },
}

impl Scale {
    pub fn linear(domain: (f64, f64), range: (f64, f64)) -> Self {
        Scale::Linear {
            domain_min: domain.0,
            domain_max: domain.1,
            range_start: range.0,
            range_end: range.1,
        }
    }

    pub fn band(count: usize, range: (f64, f64)) -> Self {
        Scale::Band {
            count: count.max(1),
            range_start: range.0,
            range_end: range.1,
        }
    }

    pub fn map(&self, value: f64) -> f64 {
        match *self {
            Scale::Linear {
                domain_min,
                domain_max,
                range_start,
                range_end,
            } => {
                let t = (value - domain_min) / (domain_max - domain_min);
                range_start + t * (range_end - range_start)
            }
            Scale::Band {
                count,
                range_start,
                range_end,
            } => {
                let step = (range_end - range_start) / count as f64;
                range_start + (value + 0.5) * step
            }
        }
    }

    /// Inverse of [`Scale::map`]; for bands this yields the fractional index.
    pub fn invert(&self, pixel: f64) -> f64 {
        match *self {
            Scale::Linear {
                domain_min,
                domain_max,
                range_start,
                range_end,
            } => {
                let t = (pixel - range_start) / (range_end - range_start);
                domain_min + t * (domain_max - domain_min)
            }
            Scale::Band {
                count,
                range_start,
                range_end,
            } => {
                let step = (range_end - range_start) / count as f64;
                (pixel - range_start) / step - 0.5
            }
        }
    }

    pub fn band_width(&self) -> Option<f64> {
        match *self {
            Scale::Band {
                count,
                range_start,
                range_end,
            } => Some((range_end - range_start).abs() / count as f64),
            Scale::Linear { .. } => None,
        }
    }

    /// Pixel interval the scale spans, lowest first.
    pub fn pixel_span(&self) -> (f64, f64) {
        let (a, b) = match *self {
            Scale::Linear {
                range_start,
                range_end,
                ..
            }
            | Scale::Band {
                range_start,
                range_end,
                ..
            } => (range_start, range_end),
        };
        (a.min(b), a.max(b))
    }

    /// Pixel position of `value` clamped into the domain.
    pub fn map_clamped(&self, value: f64) -> f64 {
        let (lo, hi) = self.pixel_span();
        self.map(value).clamp(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_scale_maps_domain_edges_to_range_edges() {
        let scale = Scale::linear((140.0, 200.0), (300.0, 0.0));
        assert_eq!(scale.map(140.0), 300.0);
        assert_eq!(scale.map(200.0), 0.0);
        assert_eq!(scale.map(170.0), 150.0);
        assert!((scale.invert(75.0) - 185.0).abs() < 1e-9);
    }

    #[test]
    fn band_scale_centers_categories() {
        let scale = Scale::band(4, (0.0, 400.0));
        assert_eq!(scale.band_width(), Some(100.0));
        assert_eq!(scale.map(0.0), 50.0);
        assert_eq!(scale.map(3.0), 350.0);
        assert!((scale.invert(250.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn clamped_mapping_stays_in_range() {
        let scale = Scale::linear((-5.0, 5.0), (0.0, 100.0));
        assert_eq!(scale.map_clamped(0.0), 50.0);
        assert_eq!(scale.map_clamped(50.0), 100.0);
        assert_eq!(scale.map_clamped(-50.0), 0.0);
    }

    #[test]
    fn chart_area_edges() {
        let area = ChartArea::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(area.right(), 110.0);
        assert_eq!(area.bottom(), 70.0);
        assert!(area.contains(10.0, 70.0));
        assert!(!area.contains(9.9, 30.0));
    }
}
