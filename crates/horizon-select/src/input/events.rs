//! Raw pointer input as delivered by the host.
//!
//! The engine sees one pointer at a time. Hosts translate their native
//! touch, mouse and pen events into [`PointerEvent`]s in viewport
//! coordinates and forward them to
//! [`SelectionEngine::handle_pointer_event`](crate::SelectionEngine::handle_pointer_event).

use std::time::Instant;

use horizon_select_core::Point;
use serde::{Deserialize, Serialize};

/// The kind of device that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolType {
    Finger,
    Stylus,
    Mouse,
    Unknown,
}

impl ToolType {
    /// Every tool type, in table order.
    pub const ALL: [ToolType; 4] = [
        ToolType::Finger,
        ToolType::Stylus,
        ToolType::Mouse,
        ToolType::Unknown,
    ];

    /// Index into per-tool dispatch tables.
    pub const fn index(self) -> usize {
        match self {
            ToolType::Finger => 0,
            ToolType::Stylus => 1,
            ToolType::Mouse => 2,
            ToolType::Unknown => 3,
        }
    }

    /// Returns true for tools without a hover/button model (fingers).
    pub fn is_touch(self) -> bool {
        matches!(self, ToolType::Finger | ToolType::Unknown)
    }
}

/// What happened to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerAction {
    Down,
    Move,
    Up,
    /// The host or platform aborted the stream (e.g. parent intercepted it).
    Cancel,
}

/// Pointer buttons involved in an event.
///
/// For `Down` and `Up` this is the button that changed; for `Move` it is
/// the set of buttons held. Touch contacts report [`PointerButtons::PRIMARY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct PointerButtons {
    /// Primary button (left mouse button, finger contact, pen tip).
    pub primary: bool,
    /// Secondary button (right mouse button, pen barrel button).
    pub secondary: bool,
    /// Tertiary button (middle mouse button).
    pub tertiary: bool,
}

impl PointerButtons {
    /// No buttons.
    pub const NONE: Self = Self {
        primary: false,
        secondary: false,
        tertiary: false,
    };

    /// Primary button only.
    pub const PRIMARY: Self = Self {
        primary: true,
        secondary: false,
        tertiary: false,
    };

    /// Secondary button only.
    pub const SECONDARY: Self = Self {
        primary: false,
        secondary: true,
        tertiary: false,
    };

    /// Returns true if no button is involved.
    pub fn is_empty(&self) -> bool {
        !self.primary && !self.secondary && !self.tertiary
    }
}

/// Keyboard modifiers that may be held during input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held (Cmd on macOS).
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta/Super key is held.
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        meta: false,
    };

    /// Returns true if any modifier is held.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }

    /// Returns true if the toggle modifier (Ctrl or Meta) is held.
    pub fn toggle(&self) -> bool {
        self.control || self.meta
    }
}

/// A single pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub tool: ToolType,
    /// Position in viewport coordinates.
    pub position: Point,
    pub buttons: PointerButtons,
    pub modifiers: KeyboardModifiers,
    /// When the platform observed the event.
    pub timestamp: Instant,
}

impl PointerEvent {
    /// Creates an event with the primary button and no modifiers.
    pub fn new(action: PointerAction, tool: ToolType, position: Point, timestamp: Instant) -> Self {
        Self {
            action,
            tool,
            position,
            buttons: PointerButtons::PRIMARY,
            modifiers: KeyboardModifiers::NONE,
            timestamp,
        }
    }

    pub fn down(tool: ToolType, position: Point, timestamp: Instant) -> Self {
        Self::new(PointerAction::Down, tool, position, timestamp)
    }

    pub fn moved(tool: ToolType, position: Point, timestamp: Instant) -> Self {
        Self::new(PointerAction::Move, tool, position, timestamp)
    }

    pub fn up(tool: ToolType, position: Point, timestamp: Instant) -> Self {
        Self::new(PointerAction::Up, tool, position, timestamp)
    }

    pub fn cancel(tool: ToolType, position: Point, timestamp: Instant) -> Self {
        Self::new(PointerAction::Cancel, tool, position, timestamp)
    }

    /// Set the buttons involved.
    pub fn with_buttons(mut self, buttons: PointerButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Set the held keyboard modifiers.
    pub fn with_modifiers(mut self, modifiers: KeyboardModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Returns true if the primary button is involved.
    pub fn is_primary(&self) -> bool {
        self.buttons.primary
    }

    /// Returns true if the secondary button is involved.
    pub fn is_secondary(&self) -> bool {
        self.buttons.secondary
    }
}
