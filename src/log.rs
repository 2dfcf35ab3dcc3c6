//! `debug!` and `warn!` for layout and render diagnostics.
//!
//! Call sites log validation results, axis margins, label selection and the
//! finalized view window. Build with `--features tracing` to route these
//! events to `tracing`; default builds compile every call away.

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, warn};
