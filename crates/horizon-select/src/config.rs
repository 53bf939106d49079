//! Engine configuration.
//!
//! Every struct has a `Default` built from the `DEFAULT_*` constants and
//! can be loaded from a settings file through `serde`. Missing fields fall
//! back to their defaults. Call [`SelectionConfig::validate`] (the engine
//! builder does) before use.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::input::ToolType;

/// Default tap timeout in milliseconds.
///
/// A touch tap must complete within this duration to be recognized.
pub const DEFAULT_TAP_TIMEOUT_MS: u64 = 300;

/// Default double-tap timeout in milliseconds.
///
/// Two taps must occur within this duration to count as a double tap.
pub const DEFAULT_DOUBLE_TAP_TIMEOUT_MS: u64 = 300;

/// Default long-press timeout in milliseconds.
pub const DEFAULT_LONG_PRESS_TIMEOUT_MS: u64 = 500;

/// Default touch slop in pixels.
///
/// Movement beyond this threshold turns a press into a drag.
pub const DEFAULT_TOUCH_SLOP: f32 = 10.0;

/// Default minimum fling velocity in pixels per second.
pub const DEFAULT_FLING_MIN_VELOCITY: f32 = 300.0;

/// Default minimum fling distance in pixels.
pub const DEFAULT_FLING_MIN_DISTANCE: f32 = 50.0;

/// Default auto-scroll edge margin, as a fraction of the viewport height.
pub const DEFAULT_AUTO_SCROLL_MARGIN_FRACTION: f32 = 0.125;

/// Default lower bound of the auto-scroll edge margin in pixels.
pub const DEFAULT_AUTO_SCROLL_MIN_MARGIN: f32 = 16.0;

/// Default auto-scroll distance per tick in pixels.
pub const DEFAULT_AUTO_SCROLL_STEP: f32 = 20.0;

/// Default auto-scroll tick interval in milliseconds.
pub const DEFAULT_AUTO_SCROLL_TICK_MS: u64 = 16;

/// Whether one or many items may be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SelectionMode {
    Single,
    #[default]
    Multi,
}

impl SelectionMode {
    pub fn is_multi(self) -> bool {
        matches!(self, SelectionMode::Multi)
    }
}

/// Gesture recognition thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Maximum press duration for a touch tap.
    pub tap_timeout: Duration,
    /// Maximum gap between taps of a multi-tap.
    pub double_tap_timeout: Duration,
    /// Duration a press must be held for a long press.
    pub long_press_timeout: Duration,
    /// Maximum movement allowed for a tap or long press.
    pub touch_slop: f32,
    /// Minimum release velocity for a fling.
    pub fling_min_velocity: f32,
    /// Minimum travel for a fling.
    pub fling_min_distance: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_timeout: Duration::from_millis(DEFAULT_TAP_TIMEOUT_MS),
            double_tap_timeout: Duration::from_millis(DEFAULT_DOUBLE_TAP_TIMEOUT_MS),
            long_press_timeout: Duration::from_millis(DEFAULT_LONG_PRESS_TIMEOUT_MS),
            touch_slop: DEFAULT_TOUCH_SLOP,
            fling_min_velocity: DEFAULT_FLING_MIN_VELOCITY,
            fling_min_distance: DEFAULT_FLING_MIN_DISTANCE,
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("tap_timeout", self.tap_timeout),
            ("double_tap_timeout", self.double_tap_timeout),
            ("long_press_timeout", self.long_press_timeout),
        ] {
            if value.is_zero() {
                return Err(ConfigError::zero_duration(name));
            }
        }
        for (name, value) in [
            ("touch_slop", self.touch_slop),
            ("fling_min_velocity", self.fling_min_velocity),
            ("fling_min_distance", self.fling_min_distance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::negative(name, value));
            }
        }
        Ok(())
    }
}

/// Edge auto-scrolling during band and paint selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoScrollConfig {
    /// Edge margin as a fraction of the viewport height.
    pub margin_fraction: f32,
    /// Lower bound for the edge margin in pixels.
    ///
    /// The height of one visible row is also used as a floor.
    pub min_margin: f32,
    /// Pixels scrolled per tick at the margin's inner edge.
    ///
    /// The step grows linearly to twice this value at the viewport edge.
    pub step: f32,
    /// Interval between scroll ticks.
    pub tick_interval: Duration,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            margin_fraction: DEFAULT_AUTO_SCROLL_MARGIN_FRACTION,
            min_margin: DEFAULT_AUTO_SCROLL_MIN_MARGIN,
            step: DEFAULT_AUTO_SCROLL_STEP,
            tick_interval: Duration::from_millis(DEFAULT_AUTO_SCROLL_TICK_MS),
        }
    }
}

impl AutoScrollConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..0.5).contains(&self.margin_fraction) {
            return Err(ConfigError::MarginOutOfRange(self.margin_fraction));
        }
        if !self.min_margin.is_finite() || self.min_margin < 0.0 {
            return Err(ConfigError::negative("min_margin", self.min_margin));
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(ConfigError::not_positive("step", self.step));
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::zero_duration("tick_interval"));
        }
        Ok(())
    }
}

/// Which selection helper gets first refusal of a tool's raw events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlerKind {
    /// Rubber-band selection from empty space.
    Band,
    /// Long-press-then-drag paint selection.
    GesturePaint,
    /// No selection helper; events go straight to gesture recognition.
    None,
}

/// Which handler interprets recognized gestures (taps, long presses, drags).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceHandler {
    Touch,
    Mouse,
}

/// Per-tool dispatch tables.
///
/// ```
/// use horizon_select::config::{HandlerKind, ToolRouting};
/// use horizon_select::input::ToolType;
///
/// let mut routing = ToolRouting::default();
/// assert_eq!(routing.handler_for(ToolType::Finger), HandlerKind::GesturePaint);
///
/// routing.set_handler(ToolType::Stylus, HandlerKind::None);
/// assert_eq!(routing.handler_for(ToolType::Stylus), HandlerKind::None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolRouting {
    handlers: [HandlerKind; 4],
    devices: [DeviceHandler; 4],
}

impl Default for ToolRouting {
    fn default() -> Self {
        // Table order follows ToolType::ALL: finger, stylus, mouse, unknown.
        Self {
            handlers: [
                HandlerKind::GesturePaint,
                HandlerKind::Band,
                HandlerKind::Band,
                HandlerKind::GesturePaint,
            ],
            devices: [
                DeviceHandler::Touch,
                DeviceHandler::Mouse,
                DeviceHandler::Mouse,
                DeviceHandler::Touch,
            ],
        }
    }
}

impl ToolRouting {
    /// The selection helper that gets first refusal for `tool`.
    pub fn handler_for(&self, tool: ToolType) -> HandlerKind {
        self.handlers[tool.index()]
    }

    pub fn set_handler(&mut self, tool: ToolType, handler: HandlerKind) {
        self.handlers[tool.index()] = handler;
    }

    /// The handler that interprets recognized gestures from `tool`.
    pub fn device_for(&self, tool: ToolType) -> DeviceHandler {
        self.devices[tool.index()]
    }

    pub fn set_device(&mut self, tool: ToolType, device: DeviceHandler) {
        self.devices[tool.index()] = device;
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub mode: SelectionMode,
    pub gesture: GestureConfig,
    pub auto_scroll: AutoScrollConfig,
    pub routing: ToolRouting,
}

impl SelectionConfig {
    /// Check every value, reporting the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gesture.validate()?;
        self.auto_scroll.validate()
    }

    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
