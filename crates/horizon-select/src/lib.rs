//! Horizon Select - multi-input selection for virtualized lists and grids.
//!
//! The engine interprets raw pointer events from fingers, styluses and mice
//! and turns them into changes of a keyed selection:
//!
//! - **Tracking**: [`SelectionTracker`] keeps the committed and provisional
//!   selection sets, gated by a [`SelectionPredicate`](model::SelectionPredicate)
//! - **Band selection**: a rubber band dragged from empty space selects every
//!   item it overlaps, including items scrolled out of view
//! - **Paint selection**: a long press followed by a drag selects the
//!   contiguous run of items under the finger
//! - **Taps and clicks**: activation, toggling and range extension through
//!   the touch and mouse handlers
//! - **Auto-scroll**: dragging near an edge scrolls the host
//!
//! The host view implements [`HostView`] and
//! [`ItemDetailsLookup`](model::ItemDetailsLookup), forwards pointer events
//! and pumps timers.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Instant;
//! use horizon_select::prelude::*;
//!
//! struct List;
//!
//! impl HostView for List {
//!     fn item_count(&self) -> usize { 10 }
//!     fn visible_item_rects(&self) -> Vec<(Position, Rect)> {
//!         (0..10).map(|p| (p, Rect::new(0.0, p as f32 * 40.0, 300.0, 40.0))).collect()
//!     }
//!     fn viewport(&self) -> Rect { Rect::new(0.0, 0.0, 300.0, 400.0) }
//!     fn scroll_offset(&self) -> Point { Point::ZERO }
//!     fn scroll_by(&mut self, _dx: f32, _dy: f32) {}
//!     fn invalidate(&mut self) {}
//! }
//!
//! impl ItemDetailsLookup<u32> for List {
//!     fn details_at(&self, point: Point) -> Option<ItemDetails<u32>> {
//!         let position = (point.y / 40.0) as usize;
//!         (point.y >= 0.0 && position < 10).then(|| ItemDetails::new(position, position as u32))
//!     }
//! }
//!
//! let provider = Arc::new(ListKeyProvider::new((0..10u32).collect()));
//! let mut engine = SelectionEngine::builder(provider).build().unwrap();
//! let mut list = List;
//!
//! let t0 = Instant::now();
//! let at = Point::new(20.0, 90.0);
//! engine.handle_pointer_event(&PointerEvent::down(ToolType::Mouse, at, t0), &mut list);
//! engine.handle_pointer_event(&PointerEvent::up(ToolType::Mouse, at, t0), &mut list);
//! assert!(engine.tracker().is_selected(&2));
//! ```

pub mod auto_scroll;
pub mod band;
pub mod config;
pub mod content_lock;
pub mod engine;
pub mod error;
pub mod gesture_selection;
pub mod host;
pub mod input;
pub mod model;
pub mod prelude;
pub mod tracker;

#[cfg(test)]
mod testing;

pub use config::{SelectionConfig, SelectionMode};
pub use content_lock::{ContentLock, ContentLockGuard};
pub use engine::{SelectionEngine, SelectionEngineBuilder};
pub use error::{Absorbed, ConfigError, SnapshotError};
pub use host::{HostView, SelectionHost};
pub use tracker::SelectionTracker;

pub use horizon_select_core::{Point, Rect, Size};
