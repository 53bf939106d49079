//! Gesture recognition from single-pointer events.
//!
//! This module provides a gesture recognizer that turns the raw pointer
//! stream into taps (with a tap count for double taps), long presses,
//! drags and flings. It is consulted only for events the selection helpers
//! decline.
//!
//! All timing comes from event timestamps, so recognition is deterministic.
//! A long press fires either from the one-shot timer the router schedules
//! at [`GestureRecognizer::long_press_deadline`] or, if the timer is late,
//! lazily on the next event.
//!
//! # Usage
//!
//! ```
//! use std::time::{Duration, Instant};
//! use horizon_select::input::{GestureRecognizer, PointerEvent, RecognizedGesture, ToolType};
//! use horizon_select_core::Point;
//!
//! let mut recognizer = GestureRecognizer::new();
//! let t0 = Instant::now();
//! let p = Point::new(10.0, 10.0);
//!
//! recognizer.process(&PointerEvent::down(ToolType::Finger, p, t0));
//! let gestures = recognizer.process(&PointerEvent::up(ToolType::Finger, p, t0 + Duration::from_millis(80)));
//! assert!(matches!(gestures[0], RecognizedGesture::Tap { tap_count: 1, .. }));
//! ```

use std::time::{Duration, Instant};

use horizon_select_core::Point;

use super::events::{PointerAction, PointerEvent, ToolType};
use crate::config::GestureConfig;

/// Lifecycle of a continuous gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Started,
    Updated,
    Ended,
    Cancelled,
}

/// Recognized gesture events.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognizedGesture {
    /// The pointer went down.
    Down { event: PointerEvent },
    /// A press and release without movement. `tap_count` is 2 for a
    /// double tap (or double click), and so on.
    Tap { event: PointerEvent, tap_count: u32 },
    /// The pointer was held still past the long-press timeout.
    LongPress { event: PointerEvent },
    /// The pointer moved past the touch slop.
    Drag {
        event: PointerEvent,
        origin: Point,
        state: GestureState,
    },
    /// A drag released at speed.
    Fling { event: PointerEvent, velocity: Point },
}

impl RecognizedGesture {
    /// The event that completed the gesture.
    pub fn event(&self) -> &PointerEvent {
        match self {
            Self::Down { event }
            | Self::Tap { event, .. }
            | Self::LongPress { event }
            | Self::Drag { event, .. }
            | Self::Fling { event, .. } => event,
        }
    }

    pub fn tool(&self) -> ToolType {
        self.event().tool
    }
}

/// Per-press tracking.
#[derive(Debug, Clone)]
struct PressState {
    start: PointerEvent,
    last: PointerEvent,
    previous: PointerEvent,
    moved_beyond_slop: bool,
    long_press_recognized: bool,
}

/// Last tap, for multi-tap counting.
#[derive(Debug, Clone, Copy)]
struct TapState {
    position: Point,
    time: Instant,
    tool: ToolType,
    tap_count: u32,
}

/// Gesture recognizer for one pointer.
#[derive(Debug)]
pub struct GestureRecognizer {
    config: GestureConfig,
    press: Option<PressState>,
    last_tap: Option<TapState>,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureRecognizer {
    /// Creates a new gesture recognizer with default configuration.
    pub fn new() -> Self {
        Self::with_config(GestureConfig::default())
    }

    /// Creates a new gesture recognizer with the given configuration.
    pub fn with_config(config: GestureConfig) -> Self {
        Self {
            config,
            press: None,
            last_tap: None,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Returns true while a press is being tracked.
    pub fn is_tracking(&self) -> bool {
        self.press.is_some()
    }

    /// When the current press becomes a long press, if it still can.
    pub fn long_press_deadline(&self) -> Option<Instant> {
        let press = self.press.as_ref()?;
        if !supports_long_press(press.start.tool) || press.moved_beyond_slop || press.long_press_recognized {
            return None;
        }
        Some(press.start.timestamp + self.config.long_press_timeout)
    }

    /// Processes a pointer event and returns any recognized gestures.
    pub fn process(&mut self, event: &PointerEvent) -> Vec<RecognizedGesture> {
        let mut gestures = Vec::new();
        match event.action {
            PointerAction::Down => self.handle_down(event, &mut gestures),
            PointerAction::Move => self.handle_move(event, &mut gestures),
            PointerAction::Up => self.handle_up(event, &mut gestures),
            PointerAction::Cancel => self.handle_cancel(event, &mut gestures),
        }
        gestures
    }

    /// Checks for a long-press timeout at `now`.
    ///
    /// Call this when the long-press timer fires.
    pub fn check_long_press(&mut self, now: Instant) -> Option<RecognizedGesture> {
        let deadline = self.long_press_deadline()?;
        if now < deadline {
            return None;
        }
        let press = self.press.as_mut()?;
        press.long_press_recognized = true;

        let mut event = press.last;
        event.timestamp = now;
        tracing::trace!(target: "horizon_select::router", position = ?event.position, "long press");
        Some(RecognizedGesture::LongPress { event })
    }

    /// Stop tracking the current press without emitting anything.
    ///
    /// Used when a selection helper takes over the pointer stream.
    pub fn reset(&mut self) {
        self.press = None;
    }

    fn handle_down(&mut self, event: &PointerEvent, gestures: &mut Vec<RecognizedGesture>) {
        if self.press.is_some() {
            tracing::debug!(target: "horizon_select::router", "press without release, restarting");
        }
        self.press = Some(PressState {
            start: *event,
            last: *event,
            previous: *event,
            moved_beyond_slop: false,
            long_press_recognized: false,
        });
        gestures.push(RecognizedGesture::Down { event: *event });
    }

    fn handle_move(&mut self, event: &PointerEvent, gestures: &mut Vec<RecognizedGesture>) {
        if self.press.is_none() {
            return;
        }
        if let Some(long_press) = self.check_long_press(event.timestamp) {
            gestures.push(long_press);
        }
        let slop = self.config.touch_slop;
        let Some(press) = self.press.as_mut() else {
            return;
        };

        press.previous = press.last;
        press.last = *event;

        if !press.moved_beyond_slop {
            if press.start.position.distance_to(event.position) <= slop {
                return;
            }
            press.moved_beyond_slop = true;
            gestures.push(RecognizedGesture::Drag {
                event: *event,
                origin: press.start.position,
                state: GestureState::Started,
            });
            return;
        }

        gestures.push(RecognizedGesture::Drag {
            event: *event,
            origin: press.start.position,
            state: GestureState::Updated,
        });
    }

    fn handle_up(&mut self, event: &PointerEvent, gestures: &mut Vec<RecognizedGesture>) {
        if let Some(long_press) = self.check_long_press(event.timestamp) {
            gestures.push(long_press);
        }
        let Some(press) = self.press.take() else {
            return;
        };

        if press.moved_beyond_slop {
            let velocity = velocity(&press.last, event);
            let speed = velocity.distance_to(Point::ZERO);
            let distance = press.start.position.distance_to(event.position);
            if distance >= self.config.fling_min_distance && speed >= self.config.fling_min_velocity {
                gestures.push(RecognizedGesture::Fling {
                    event: *event,
                    velocity,
                });
            }
            gestures.push(RecognizedGesture::Drag {
                event: *event,
                origin: press.start.position,
                state: GestureState::Ended,
            });
            return;
        }

        if press.long_press_recognized {
            return;
        }

        let duration = event.timestamp.saturating_duration_since(press.start.timestamp);
        if supports_long_press(event.tool) && duration >= self.config.tap_timeout {
            // Too slow for a tap, too short for a long press.
            self.last_tap = None;
            return;
        }

        let tap_count = match self.last_tap {
            Some(last)
                if last.tool == event.tool
                    && event.timestamp.saturating_duration_since(last.time) < self.config.double_tap_timeout
                    && last.position.distance_to(event.position) < self.config.touch_slop =>
            {
                last.tap_count + 1
            }
            _ => 1,
        };
        self.last_tap = Some(TapState {
            position: event.position,
            time: event.timestamp,
            tool: event.tool,
            tap_count,
        });
        gestures.push(RecognizedGesture::Tap {
            event: *event,
            tap_count,
        });
    }

    fn handle_cancel(&mut self, event: &PointerEvent, gestures: &mut Vec<RecognizedGesture>) {
        let Some(press) = self.press.take() else {
            return;
        };
        if press.moved_beyond_slop {
            gestures.push(RecognizedGesture::Drag {
                event: *event,
                origin: press.start.position,
                state: GestureState::Cancelled,
            });
        }
    }
}

/// Mice have no long press; everything else does.
fn supports_long_press(tool: ToolType) -> bool {
    tool != ToolType::Mouse
}

/// Velocity in pixels per second between two samples.
fn velocity(from: &PointerEvent, to: &PointerEvent) -> Point {
    let dt = to
        .timestamp
        .saturating_duration_since(from.timestamp)
        .max(Duration::from_millis(1))
        .as_secs_f32();
    Point::new(
        (to.position.x - from.position.x) / dt,
        (to.position.y - from.position.y) / dt,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64, t0: Instant) -> Instant {
        t0 + Duration::from_millis(ms)
    }

    fn ev(action: PointerAction, tool: ToolType, x: f32, y: f32, t: Instant) -> PointerEvent {
        PointerEvent::new(action, tool, Point::new(x, y), t)
    }

    #[test]
    fn test_tap_and_double_tap() {
        let mut r = GestureRecognizer::new();
        let t0 = Instant::now();

        r.process(&ev(PointerAction::Down, ToolType::Finger, 5.0, 5.0, t0));
        let first = r.process(&ev(PointerAction::Up, ToolType::Finger, 5.0, 5.0, at(50, t0)));
        assert!(matches!(first[..], [RecognizedGesture::Tap { tap_count: 1, .. }]));

        r.process(&ev(PointerAction::Down, ToolType::Finger, 6.0, 5.0, at(150, t0)));
        let second = r.process(&ev(PointerAction::Up, ToolType::Finger, 6.0, 5.0, at(200, t0)));
        assert!(matches!(second[..], [RecognizedGesture::Tap { tap_count: 2, .. }]));
    }

    #[test]
    fn test_slow_taps_do_not_combine() {
        let mut r = GestureRecognizer::new();
        let t0 = Instant::now();
        r.process(&ev(PointerAction::Down, ToolType::Mouse, 5.0, 5.0, t0));
        r.process(&ev(PointerAction::Up, ToolType::Mouse, 5.0, 5.0, at(10, t0)));
        r.process(&ev(PointerAction::Down, ToolType::Mouse, 5.0, 5.0, at(600, t0)));
        let gestures = r.process(&ev(PointerAction::Up, ToolType::Mouse, 5.0, 5.0, at(610, t0)));
        assert!(matches!(gestures[..], [RecognizedGesture::Tap { tap_count: 1, .. }]));
    }

    #[test]
    fn test_long_press_from_timer() {
        let mut r = GestureRecognizer::new();
        let t0 = Instant::now();
        r.process(&ev(PointerAction::Down, ToolType::Finger, 5.0, 5.0, t0));

        assert_eq!(r.long_press_deadline(), Some(at(500, t0)));
        assert!(r.check_long_press(at(499, t0)).is_none());
        assert!(matches!(r.check_long_press(at(500, t0)), Some(RecognizedGesture::LongPress { .. })));
        assert!(r.check_long_press(at(900, t0)).is_none());

        // Release after a long press is not a tap.
        assert!(r.process(&ev(PointerAction::Up, ToolType::Finger, 5.0, 5.0, at(950, t0))).is_empty());
    }

    #[test]
    fn test_long_press_detected_lazily() {
        let mut r = GestureRecognizer::new();
        let t0 = Instant::now();
        r.process(&ev(PointerAction::Down, ToolType::Stylus, 5.0, 5.0, t0));
        let gestures = r.process(&ev(PointerAction::Move, ToolType::Stylus, 6.0, 5.0, at(700, t0)));
        assert!(matches!(gestures[..], [RecognizedGesture::LongPress { .. }]));
    }

    #[test]
    fn test_mouse_has_no_long_press() {
        let mut r = GestureRecognizer::new();
        let t0 = Instant::now();
        r.process(&ev(PointerAction::Down, ToolType::Mouse, 5.0, 5.0, t0));
        assert_eq!(r.long_press_deadline(), None);
        let gestures = r.process(&ev(PointerAction::Up, ToolType::Mouse, 5.0, 5.0, at(2000, t0)));
        assert!(matches!(gestures[..], [RecognizedGesture::Tap { tap_count: 1, .. }]));
    }

    #[test]
    fn test_drag_and_fling() {
        let mut r = GestureRecognizer::new();
        let t0 = Instant::now();
        r.process(&ev(PointerAction::Down, ToolType::Finger, 0.0, 0.0, t0));
        let started = r.process(&ev(PointerAction::Move, ToolType::Finger, 0.0, 40.0, at(20, t0)));
        assert!(matches!(
            started[..],
            [RecognizedGesture::Drag { state: GestureState::Started, .. }]
        ));
        assert_eq!(r.long_press_deadline(), None);

        let end = r.process(&ev(PointerAction::Up, ToolType::Finger, 0.0, 120.0, at(60, t0)));
        let RecognizedGesture::Fling { velocity, .. } = end[0] else {
            panic!("expected fling, got {end:?}");
        };
        assert_eq!(velocity, Point::new(0.0, 2000.0));
        assert!(matches!(end[1], RecognizedGesture::Drag { state: GestureState::Ended, .. }));
    }

    #[test]
    fn test_reset_drops_press() {
        let mut r = GestureRecognizer::new();
        let t0 = Instant::now();
        r.process(&ev(PointerAction::Down, ToolType::Finger, 0.0, 0.0, t0));
        r.reset();
        assert!(!r.is_tracking());
        assert!(r.process(&ev(PointerAction::Up, ToolType::Finger, 0.0, 0.0, at(10, t0))).is_empty());
    }
}
