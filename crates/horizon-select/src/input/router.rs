//! Dispatch of raw pointer events.
//!
//! Every event first goes to the selection helper the tool is routed to
//! (band or paint). Whatever the helper declines is fed to the gesture
//! recognizer, and recognized gestures go to the touch or mouse handler
//! configured for the tool. Once a helper consumes an event the recognizer
//! forgets the press, so a committed band never also produces a click.

use std::time::Instant;

use horizon_select_core::{SharedTimerManager, TimerEvent, TimerId};

use super::callbacks::InputCallbacks;
use super::events::PointerEvent;
use super::mouse::MouseInputHandler;
use super::recognizer::{GestureRecognizer, GestureState, RecognizedGesture};
use super::touch::TouchInputHandler;
use crate::band::BandSelectionHelper;
use crate::config::{DeviceHandler, HandlerKind, ToolRouting};
use crate::gesture_selection::GestureSelectionHelper;
use crate::host::SelectionHost;
use crate::model::ItemKey;
use crate::tracker::SelectionTracker;

/// Routes pointer events to selection helpers and input handlers.
pub struct InputEventRouter<K: ItemKey> {
    routing: ToolRouting,
    recognizer: GestureRecognizer,
    band: BandSelectionHelper<K>,
    paint: GestureSelectionHelper<K>,
    touch: TouchInputHandler,
    mouse: MouseInputHandler,
    callbacks: Box<dyn InputCallbacks<K>>,
    timers: SharedTimerManager,
    long_press_timer: Option<TimerId>,
}

impl<K: ItemKey> InputEventRouter<K> {
    pub fn new(
        routing: ToolRouting,
        recognizer: GestureRecognizer,
        band: BandSelectionHelper<K>,
        paint: GestureSelectionHelper<K>,
        callbacks: Box<dyn InputCallbacks<K>>,
        timers: SharedTimerManager,
    ) -> Self {
        Self {
            routing,
            recognizer,
            band,
            paint,
            touch: TouchInputHandler::new(),
            mouse: MouseInputHandler::new(),
            callbacks,
            timers,
            long_press_timer: None,
        }
    }

    pub fn routing(&self) -> &ToolRouting {
        &self.routing
    }

    pub fn band(&self) -> &BandSelectionHelper<K> {
        &self.band
    }

    pub fn paint(&self) -> &GestureSelectionHelper<K> {
        &self.paint
    }

    /// Returns true while a band or paint gesture owns the pointer.
    pub fn is_gesture_active(&self) -> bool {
        self.band.is_active() || self.paint.is_active()
    }

    /// Route one pointer event. Returns true if anything consumed it.
    pub fn route<H>(&mut self, event: &PointerEvent, tracker: &mut SelectionTracker<K>, host: &mut H) -> bool
    where
        H: SelectionHost<K> + ?Sized,
    {
        let consumed = match self.routing.handler_for(event.tool) {
            HandlerKind::Band => self.band.on_pointer_event(event, tracker, host),
            HandlerKind::GesturePaint => self.paint.on_pointer_event(event, tracker, host),
            HandlerKind::None => false,
        };
        if consumed {
            self.recognizer.reset();
            self.mouse.reset();
            self.stop_long_press_timer();
            return true;
        }

        let gestures = self.recognizer.process(event);
        self.sync_long_press_timer(event.timestamp);

        let mut handled = false;
        for gesture in gestures {
            handled |= self.dispatch(&gesture, tracker, host);
        }
        handled
    }

    /// Handle an expired timer. Returns true if it belonged to this router.
    pub fn on_timer<H>(&mut self, timer: &TimerEvent, tracker: &mut SelectionTracker<K>, host: &mut H) -> bool
    where
        H: SelectionHost<K> + ?Sized,
    {
        if self.long_press_timer == Some(timer.id) {
            self.long_press_timer = None;
            match self.recognizer.check_long_press(timer.fired_at) {
                Some(gesture) => {
                    self.dispatch(&gesture, tracker, host);
                }
                // Fired early; re-arm for the remaining time.
                None => self.sync_long_press_timer(timer.fired_at),
            }
            return true;
        }
        self.band.on_timer(timer.id, tracker, host) || self.paint.on_timer(timer.id, tracker, host)
    }

    /// Abandon whatever gesture is in progress.
    pub fn cancel(&mut self, tracker: &mut SelectionTracker<K>) -> bool {
        let band = self.band.cancel(tracker);
        let paint = self.paint.cancel(tracker);
        self.recognizer.reset();
        self.mouse.reset();
        self.stop_long_press_timer();
        band || paint
    }

    /// Content was reloaded.
    pub fn on_data_changed(&mut self, tracker: &mut SelectionTracker<K>) {
        self.band.on_data_changed(tracker);
        self.paint.cancel(tracker);
        self.recognizer.reset();
        self.stop_long_press_timer();
    }

    fn dispatch<H>(&mut self, gesture: &RecognizedGesture, tracker: &mut SelectionTracker<K>, host: &mut H) -> bool
    where
        H: SelectionHost<K> + ?Sized,
    {
        let tool = gesture.tool();
        let device = self.routing.device_for(tool);
        let callbacks = &mut *self.callbacks;
        tracing::trace!(target: "horizon_select::router", ?tool, ?device, ?gesture, "dispatch");

        match (gesture, device) {
            (RecognizedGesture::Down { event }, DeviceHandler::Mouse) => {
                self.mouse.on_down(event, &*host, callbacks)
            }
            (RecognizedGesture::Down { .. }, DeviceHandler::Touch) => false,
            (RecognizedGesture::Tap { event, tap_count }, DeviceHandler::Mouse) => {
                self.mouse.on_click(event, *tap_count, tracker, &*host, callbacks)
            }
            (RecognizedGesture::Tap { event, tap_count }, DeviceHandler::Touch) => {
                self.touch.on_tap(event, *tap_count, tracker, &*host, callbacks)
            }
            (RecognizedGesture::LongPress { event }, DeviceHandler::Touch) => {
                let paint = (self.routing.handler_for(tool) == HandlerKind::GesturePaint).then_some(&mut self.paint);
                self.touch.on_long_press(event, tracker, &*host, callbacks, paint)
            }
            (RecognizedGesture::LongPress { .. }, DeviceHandler::Mouse) => false,
            (
                RecognizedGesture::Drag {
                    origin,
                    state: GestureState::Started,
                    ..
                },
                DeviceHandler::Mouse,
            ) => self.mouse.on_drag_started(*origin, tracker, &*host, callbacks),
            (RecognizedGesture::Drag { .. }, _) => false,
            (RecognizedGesture::Fling { velocity, .. }, _) => callbacks.on_fling(*velocity),
        }
    }

    fn sync_long_press_timer(&mut self, now: Instant) {
        match self.recognizer.long_press_deadline() {
            Some(deadline) if self.long_press_timer.is_none() => {
                let delay = deadline.saturating_duration_since(now);
                self.long_press_timer = Some(self.timers.start_one_shot(now, delay));
            }
            Some(_) => {}
            None => self.stop_long_press_timer(),
        }
    }

    fn stop_long_press_timer(&mut self) {
        if let Some(id) = self.long_press_timer.take() {
            // Already gone if it fired and was processed by the host.
            let _ = self.timers.stop(id);
        }
    }
}

impl<K: ItemKey> std::fmt::Debug for InputEventRouter<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputEventRouter")
            .field("routing", &self.routing)
            .field("band", &self.band)
            .field("paint", &self.paint)
            .field("long_press_timer", &self.long_press_timer)
            .finish_non_exhaustive()
    }
}
