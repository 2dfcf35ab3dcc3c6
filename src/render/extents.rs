/// Running bounding box of everything a canvas has drawn. Only ever grows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Extents {
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        let mut extents = Self::empty();
        extents.include_rect(x, y, x + width, y + height);
        extents
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn include_point(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    /// Include the axis-aligned box spanned by two corners, in any order.
    pub fn include_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        self.include_point(x0, y0);
        self.include_point(x1, y1);
    }

    /// Include a point widened by `pad` on every side.
    pub fn include_padded(&mut self, x: f64, y: f64, pad: f64) {
        self.include_rect(x - pad, y - pad, x + pad, y + pad);
    }

    pub fn union(&mut self, other: &Extents) {
        if other.is_empty() {
            return;
        }
        self.include_rect(other.min_x, other.min_y, other.max_x, other.max_y);
    }

    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            (self.min_x, self.min_y),
            (self.max_x, self.min_y),
            (self.max_x, self.max_y),
            (self.min_x, self.max_y),
        ]
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max_x - self.min_x }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max_y - self.min_y }
    }

    pub fn contains_rect(&self, other: &Extents, tolerance: f64) -> bool {
        other.is_empty()
            || (other.min_x >= self.min_x - tolerance
                && other.max_x <= self.max_x + tolerance
                && other.min_y >= self.min_y - tolerance
                && other.max_y <= self.max_y + tolerance)
    }
}

impl Default for Extents {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_extents_have_no_size() {
        let extents = Extents::empty();
        assert!(extents.is_empty());
        assert_eq!(extents.width(), 0.0);
    }

    #[test]
    fn extents_never_shrink() {
        let mut extents = Extents::from_rect(0.0, 0.0, 100.0, 50.0);
        extents.include_point(10.0, 10.0);
        assert_eq!(extents, Extents::from_rect(0.0, 0.0, 100.0, 50.0));
        extents.include_padded(110.0, -5.0, 2.0);
        assert_eq!(extents.max_x, 112.0);
        assert_eq!(extents.min_y, -7.0);
    }

    #[test]
    fn non_finite_points_are_ignored() {
        let mut extents = Extents::from_rect(0.0, 0.0, 10.0, 10.0);
        extents.include_point(f64::NAN, 1e9);
        extents.include_point(f64::INFINITY, 0.0);
        assert_eq!(extents.max_x, 10.0);
    }

    #[test]
    fn union_ignores_empty() {
        let mut extents = Extents::from_rect(0.0, 0.0, 10.0, 10.0);
        extents.union(&Extents::empty());
        assert_eq!(extents.width(), 10.0);
        extents.union(&Extents::from_rect(-5.0, 0.0, 1.0, 1.0));
        assert_eq!(extents.min_x, -5.0);
    }
}
