//! Core systems for Horizon Select.
//!
//! This crate provides the foundational pieces of the Horizon Select
//! selection engine:
//!
//! - **Geometry**: [`Point`], [`Size`] and [`Rect`] in logical pixels
//! - **Signal/Slot System**: observer registration with disposer guards
//! - **Timers**: one-shot and repeating timers pumped by the host event loop
//! - **Task Queue**: FIFO deferral of work while a gesture is active
//! - **Logging**: tracing targets and helpers
//!
//! # Signal Example
//!
//! ```
//! use horizon_select_core::Signal;
//!
//! let selection_changed = Signal::<()>::new();
//! let conn_id = selection_changed.connect(|_| println!("selection changed"));
//! selection_changed.emit(());
//! selection_changed.disconnect(conn_id);
//! ```
//!
//! # Timer Example
//!
//! ```
//! use horizon_select_core::SharedTimerManager;
//! use std::time::{Duration, Instant};
//!
//! let timers = SharedTimerManager::new();
//! let t0 = Instant::now();
//! let id = timers.start_repeating(t0, Duration::from_millis(16)).unwrap();
//!
//! let fired = timers.process_expired(t0 + Duration::from_millis(16));
//! assert_eq!(fired[0].id, id);
//! timers.stop(id).unwrap();
//! ```

mod error;
pub mod geometry;
pub mod logging;
pub mod signal;
mod task;
mod timer;

pub use error::{SignalError, TimerError};
pub use geometry::{Point, Rect, Size};
pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use task::{BoxedTask, TaskId, TaskQueue};
pub use timer::{SharedTimerManager, TimerEvent, TimerId, TimerKind, TimerManager};
