use std::fmt::Write;

/// SVG path data that remembers every point it passed through, control
/// points included. A Bézier curve lies inside the hull of its control
/// points, so those points bound the rendered path.
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    d: String,
    points: Vec<(f64, f64)>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.push_cmd(format_args!("M {x:.2} {y:.2}"));
        self.points.push((x, y));
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.push_cmd(format_args!("L {x:.2} {y:.2}"));
        self.points.push((x, y));
        self
    }

    pub fn quad_to(mut self, cx: f64, cy: f64, x: f64, y: f64) -> Self {
        self.push_cmd(format_args!("Q {cx:.2} {cy:.2} {x:.2} {y:.2}"));
        self.points.extend([(cx, cy), (x, y)]);
        self
    }

    pub fn cubic_to(mut self, c1: (f64, f64), c2: (f64, f64), x: f64, y: f64) -> Self {
        self.push_cmd(format_args!(
            "C {:.2} {:.2} {:.2} {:.2} {x:.2} {y:.2}",
            c1.0, c1.1, c2.0, c2.1
        ));
        self.points.extend([c1, c2, (x, y)]);
        self
    }

    pub fn close(mut self) -> Self {
        self.push_cmd(format_args!("Z"));
        self
    }

    /// Straight segments through `points`.
    pub fn polyline(points: &[(f64, f64)]) -> Self {
        let mut builder = Self::new();
        for (idx, &(x, y)) in points.iter().enumerate() {
            builder = if idx == 0 { builder.move_to(x, y) } else { builder.line_to(x, y) };
        }
        builder
    }

    /// Catmull-Rom spline through `points`, emitted as cubic Béziers.
    pub fn smooth(points: &[(f64, f64)]) -> Self {
        if points.len() < 3 {
            return Self::polyline(points);
        }
        let mut builder = Self::new().move_to(points[0].0, points[0].1);
        for i in 0..points.len() - 1 {
            let p0 = points[i.saturating_sub(1)];
            let p1 = points[i];
            let p2 = points[i + 1];
            let p3 = points[(i + 2).min(points.len() - 1)];
            let c1 = (p1.0 + (p2.0 - p0.0) / 6.0, p1.1 + (p2.1 - p0.1) / 6.0);
            let c2 = (p2.0 - (p3.0 - p1.0) / 6.0, p2.1 - (p3.1 - p1.1) / 6.0);
            builder = builder.cubic_to(c1, c2, p2.0, p2.1);
        }
        builder
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn data(&self) -> &str {
        &self.d
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    fn push_cmd(&mut self, args: std::fmt::Arguments<'_>) {
        if !self.d.is_empty() {
            self.d.push(' ');
        }
        let _ = self.d.write_fmt(args);
    }
}
