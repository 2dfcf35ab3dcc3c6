//! Widget parameter model, as handed over by the upstream pipeline.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A data point with an optional caption drawn beside its marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub label: Option<String>,
}

impl LabeledPoint {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericAxis {
    pub min: f64,
    pub max: f64,
    pub tick_interval: f64,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_true")]
    pub show_grid_lines: bool,
    #[serde(default = "default_true")]
    pub show_tick_labels: bool,
}

impl NumericAxis {
    pub fn new(min: f64, max: f64, tick_interval: f64) -> Self {
        Self {
            min,
            max,
            tick_interval,
            label: String::new(),
            show_grid_lines: true,
            show_tick_labels: true,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoricalAxis {
    pub categories: Vec<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub show_grid_lines: bool,
}

impl CategoricalAxis {
    pub fn new<S: Into<String>>(categories: impl IntoIterator<Item = S>) -> Self {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            label: String::new(),
            show_grid_lines: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn index_of(&self, category: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == category)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AxisSpec {
    Numeric(NumericAxis),
    Categorical(CategoricalAxis),
}

impl AxisSpec {
    pub fn label(&self) -> &str {
        match self {
            AxisSpec::Numeric(axis) => &axis.label,
            AxisSpec::Categorical(axis) => &axis.label,
        }
    }

    pub fn show_grid_lines(&self) -> bool {
        match self {
            AxisSpec::Numeric(axis) => axis.show_grid_lines,
            AxisSpec::Categorical(axis) => axis.show_grid_lines,
        }
    }

    pub fn as_numeric(&self) -> Option<&NumericAxis> {
        match self {
            AxisSpec::Numeric(axis) => Some(axis),
            AxisSpec::Categorical(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegressionMethod {
    Linear,
    Quadratic,
    Exponential,
}

impl RegressionMethod {
    pub fn name(self) -> &'static str {
        match self {
            RegressionMethod::Linear => "linear",
            RegressionMethod::Quadratic => "quadratic",
            RegressionMethod::Exponential => "exponential",
        }
    }

    /// Points needed before a fit is worth attempting.
    pub fn min_points(self) -> usize {
        match self {
            RegressionMethod::Linear | RegressionMethod::Exponential => 2,
            RegressionMethod::Quadratic => 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStyle {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub dashed: bool,
    #[serde(default)]
    pub stroke_width: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LineOverlay {
    TwoPoints {
        a: Point,
        b: Point,
        #[serde(default)]
        style: LineStyle,
    },
    BestFit {
        method: RegressionMethod,
        #[serde(default)]
        style: LineStyle,
    },
}

impl LineOverlay {
    pub fn style(&self) -> &LineStyle {
        match self {
            LineOverlay::TwoPoints { style, .. } | LineOverlay::BestFit { style, .. } => style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterPlotParams {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub x_axis: NumericAxis,
    pub y_axis: NumericAxis,
    #[serde(default)]
    pub points: Vec<LabeledPoint>,
    #[serde(default)]
    pub lines: Vec<LineOverlay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stick {
    pub category: String,
    pub value: f64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceLine {
    pub value: f64,
    #[serde(default)]
    pub style: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickPlotParams {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub x_axis: CategoricalAxis,
    pub y_axis: NumericAxis,
    #[serde(default)]
    pub sticks: Vec<Stick>,
    #[serde(default)]
    pub references: Vec<ReferenceLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Curve {
    pub points: Vec<Point>,
    #[serde(default)]
    pub smooth: bool,
    #[serde(default)]
    pub style: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptualGraphParams {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub x_axis: NumericAxis,
    pub y_axis: NumericAxis,
    #[serde(default)]
    pub curves: Vec<Curve>,
    #[serde(default)]
    pub points: Vec<LabeledPoint>,
    #[serde(default)]
    pub show_quadrant_labels: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    pub category: String,
    pub value: f64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub fill: BarFill,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarFill {
    #[default]
    Solid,
    /// Fades from the bar color at the value end to white at the baseline.
    Gradient,
    Hatched,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarChartParams {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub x_axis: CategoricalAxis,
    pub y_axis: NumericAxis,
    #[serde(default)]
    pub bars: Vec<Bar>,
    #[serde(default)]
    pub show_values: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Widget {
    ScatterPlot(ScatterPlotParams),
    StickPlot(StickPlotParams),
    ConceptualGraph(ConceptualGraphParams),
    BarChart(BarChartParams),
}

impl Widget {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Widget::ScatterPlot(_) => "scatterPlot",
            Widget::StickPlot(_) => "stickPlot",
            Widget::ConceptualGraph(_) => "conceptualGraph",
            Widget::BarChart(_) => "barChart",
        }
    }

    /// Nominal chart rectangle size.
    pub fn size(&self) -> (f64, f64) {
        match self {
            Widget::ScatterPlot(p) => (p.width, p.height),
            Widget::StickPlot(p) => (p.width, p.height),
            Widget::ConceptualGraph(p) => (p.width, p.height),
            Widget::BarChart(p) => (p.width, p.height),
        }
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        let (w, h) = match self {
            Widget::ScatterPlot(p) => (&mut p.width, &mut p.height),
            Widget::StickPlot(p) => (&mut p.width, &mut p.height),
            Widget::ConceptualGraph(p) => (&mut p.width, &mut p.height),
            Widget::BarChart(p) => (&mut p.width, &mut p.height),
        };
        *w = width;
        *h = height;
    }
}
