pub mod axis;
pub mod label_placement;
pub mod plane;
pub mod ticks;
pub(crate) mod types;

pub use axis::{AxisPlacement, AxisRender, AxisRequest, compute_and_render_axis, validate_axis};
pub use label_placement::{LabelSelectionRequest, select_axis_labels};
pub use plane::{
    CoordinatePlane, Frame, Margins, PlaneRequest, chart_area_for, setup_coordinate_plane,
};
pub use ticks::{build_category_ticks, build_ticks, format_tick};
pub use types::*;
