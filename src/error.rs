//! Input-contract violations raised before any drawing starts.

use thiserror::Error;

/// Which axis a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisName {
    X,
    Y,
}

impl std::fmt::Display for AxisName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AxisName::X => write!(f, "x"),
            AxisName::Y => write!(f, "y"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("invalid {axis}-axis domain: min ({min}) must be less than max ({max})")]
    InvalidAxisDomain { axis: AxisName, min: f64, max: f64 },

    #[error("invalid {axis}-axis tick interval {interval}: must be a positive number")]
    InvalidTickInterval { axis: AxisName, interval: f64 },

    #[error("{axis}-axis declares no categories")]
    EmptyCategories { axis: AxisName },

    #[error("{what} ({x}, {y}) lies outside the axis domain x:[{x_min}, {x_max}] y:[{y_min}, {y_max}]")]
    PointOutOfDomain {
        what: String,
        x: f64,
        y: f64,
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    },

    #[error("{what} references unknown category \"{category}\"")]
    UnknownCategory { what: String, category: String },

    #[error("{what} value {value} lies outside the y-axis domain [{min}, {max}]")]
    ValueOutOfDomain {
        what: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{method} best-fit needs at least {required} points, got {actual}")]
    InsufficientPoints {
        method: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("exponential best-fit requires every y-value to be positive, found y = {y} at x = {x}")]
    NonPositiveValue { x: f64, y: f64 },

    #[error("two-point line has identical endpoints ({x}, {y})")]
    IdenticalEndpoints { x: f64, y: f64 },

    #[error("label count ({labels}) does not match position count ({positions})")]
    MismatchedLabels { labels: usize, positions: usize },

    #[error("{frame} frame requires numeric axes on both x and y")]
    UnsupportedFrame { frame: &'static str },

    #[error("invalid widget dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("curve {index} is invalid: {reason}")]
    InvalidCurve { index: usize, reason: String },

    #[error("failed to parse widget parameters: {0}")]
    Parse(String),
}

impl From<json5::Error> for RenderError {
    fn from(err: json5::Error) -> Self {
        RenderError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::Parse(err.to_string())
    }
}

pub type RenderResult<T> = Result<T, RenderError>;
