//! Least-squares curve fitting for trend overlays.
//!
//! Every fit is a pure function of the point slice. `None` means the data
//! admits no fit (too few points, or a singular system); it is not an error.

use serde::Serialize;

use crate::ir::{Point, RegressionMethod};

/// Determinants below this fraction of the system's scale count as zero.
const SINGULAR_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RegressionResult {
    Linear { slope: f64, intercept: f64 },
    Quadratic { a: f64, b: f64, c: f64 },
    /// `y = a * e^(b * x)`
    Exponential { a: f64, b: f64 },
}

impl RegressionResult {
    pub fn evaluate(&self, x: f64) -> f64 {
        match *self {
            RegressionResult::Linear { slope, intercept } => slope * x + intercept,
            RegressionResult::Quadratic { a, b, c } => (a * x + b) * x + c,
            RegressionResult::Exponential { a, b } => a * (b * x).exp(),
        }
    }

    pub fn method(&self) -> RegressionMethod {
        match self {
            RegressionResult::Linear { .. } => RegressionMethod::Linear,
            RegressionResult::Quadratic { .. } => RegressionMethod::Quadratic,
            RegressionResult::Exponential { .. } => RegressionMethod::Exponential,
        }
    }

    /// Straight fits can be drawn as a single segment.
    pub fn is_straight(&self) -> bool {
        matches!(self, RegressionResult::Linear { .. })
    }
}

pub fn fit(method: RegressionMethod, points: &[Point]) -> Option<RegressionResult> {
    match method {
        RegressionMethod::Linear => linear_regression(points),
        RegressionMethod::Quadratic => quadratic_regression(points),
        RegressionMethod::Exponential => exponential_regression(points),
    }
}

pub fn linear_regression(points: &[Point]) -> Option<RegressionResult> {
    let (slope, intercept) = least_squares_line(points.iter().map(|p| (p.x, p.y)))?;
    Some(RegressionResult::Linear { slope, intercept })
}

/// Fits `y = a*x^2 + b*x + c` by solving the 3x3 normal equations with
/// Cramer's rule. `x` is centered on its mean first to keep the system
/// well conditioned for domains far from zero.
pub fn quadratic_regression(points: &[Point]) -> Option<RegressionResult> {
    if points.len() < 3 {
        return None;
    }
    let n = points.len() as f64;
    let mean = points.iter().map(|p| p.x).sum::<f64>() / n;

    let (mut s1, mut s2, mut s3, mut s4) = (0.0, 0.0, 0.0, 0.0);
    let (mut sy, mut suy, mut su2y) = (0.0, 0.0, 0.0);
    for p in points {
        let u = p.x - mean;
        let u2 = u * u;
        s1 += u;
        s2 += u2;
        s3 += u2 * u;
        s4 += u2 * u2;
        sy += p.y;
        suy += u * p.y;
        su2y += u2 * p.y;
    }

    let m = [[s4, s3, s2], [s3, s2, s1], [s2, s1, n]];
    let rhs = [su2y, suy, sy];
    let det = det3(&m);
    let scale = s4 * s2 * n;
    if !det.is_finite() || det.abs() <= SINGULAR_TOLERANCE * scale.abs() || scale == 0.0 {
        return None;
    }

    let solve = |col: usize| {
        let mut replaced = m;
        for (row, value) in replaced.iter_mut().zip(rhs) {
            row[col] = value;
        }
        det3(&replaced) / det
    };
    let (qa, qb, qc) = (solve(0), solve(1), solve(2));

    // Undo the centering: a(x-m)^2 + b(x-m) + c.
    Some(RegressionResult::Quadratic {
        a: qa,
        b: qb - 2.0 * qa * mean,
        c: qa * mean * mean - qb * mean + qc,
    })
}

/// Fits `y = a*e^(b*x)` through a line on `(x, ln y)`. Points with `y <= 0`
/// are left out; callers that must not lose data reject them beforehand.
pub fn exponential_regression(points: &[Point]) -> Option<RegressionResult> {
    let usable = points.iter().filter(|p| p.y > 0.0).map(|p| (p.x, p.y.ln()));
    let (b, ln_a) = least_squares_line(usable)?;
    Some(RegressionResult::Exponential { a: ln_a.exp(), b })
}

fn least_squares_line(pairs: impl Iterator<Item = (f64, f64)>) -> Option<(f64, f64)> {
    let (mut n, mut sx, mut sy, mut sxx, mut sxy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (x, y) in pairs {
        n += 1.0;
        sx += x;
        sy += y;
        sxx += x * x;
        sxy += x * y;
    }
    if n < 2.0 {
        return None;
    }
    let det = n * sxx - sx * sx;
    if !det.is_finite() || det.abs() <= SINGULAR_TOLERANCE * (n * sxx).abs() {
        return None;
    }
    let slope = (n * sxy - sx * sy) / det;
    let intercept = (sy - slope * sx) / n;
    Some((slope, intercept))
}

fn det3(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}
