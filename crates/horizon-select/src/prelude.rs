//! Prelude module for Horizon Select.
//!
//! ```ignore
//! use horizon_select::prelude::*;
//! ```
//!
//! This provides access to the engine and its builder, the host traits,
//! the selection model, pointer event types and geometry.

// ============================================================================
// Engine
// ============================================================================

pub use crate::config::{SelectionConfig, SelectionMode};
pub use crate::engine::{SelectionEngine, SelectionEngineBuilder};
pub use crate::tracker::SelectionTracker;

// ============================================================================
// Host Integration
// ============================================================================

pub use crate::content_lock::ContentLock;
pub use crate::host::{HostView, SelectionHost};
pub use crate::input::InputCallbacks;

// ============================================================================
// Selection Model
// ============================================================================

pub use crate::model::{
    ItemDetails, ItemDetailsLookup, ItemKey, ListKeyProvider, Polarity, Position,
    SelectionPredicate, SelectionSnapshot, StableIdProvider, select_anything,
    select_single_anything,
};

// ============================================================================
// Input Events
// ============================================================================

pub use crate::input::{KeyboardModifiers, PointerAction, PointerButtons, PointerEvent, ToolType};

// ============================================================================
// Geometry and Timers
// ============================================================================

pub use horizon_select_core::{Point, Rect, SharedTimerManager, Size, TimerEvent};
