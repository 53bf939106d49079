//! Logging facilities for Horizon Select.
//!
//! Horizon Select uses the `tracing` crate for instrumentation. Nothing is
//! printed unless the host installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_select=debug")
//!     .init();
//! ```
//!
//! Every subsystem logs under one of the [`targets`] so that, for example,
//! band geometry can be traced without drowning in signal emissions.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "horizon_select_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_select_core::signal";
    /// Timer system target.
    pub const TIMER: &str = "horizon_select_core::timer";
    /// Selection state mutations.
    pub const TRACKER: &str = "horizon_select::tracker";
    /// Grid geometry inference.
    pub const GRID: &str = "horizon_select::grid";
    /// Band (rubber-band) selection.
    pub const BAND: &str = "horizon_select::band";
    /// Touch paint selection.
    pub const GESTURE: &str = "horizon_select::gesture";
    /// Edge auto-scrolling.
    pub const AUTO_SCROLL: &str = "horizon_select::auto_scroll";
    /// Pointer event routing and recognition.
    pub const ROUTER: &str = "horizon_select::router";
    /// Content reload deferral.
    pub const CONTENT_LOCK: &str = "horizon_select::content_lock";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Useful for timing operations such as band geometry recomputation.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "horizon_select::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
