//! Interpretation of recognized mouse gestures.
//!
//! Mouse selection follows desktop conventions: a plain click selects just
//! the clicked item, Ctrl (or Cmd) toggles it, Shift extends from the last
//! anchor, and a double click activates. Clicking empty space clears the
//! selection unless a modifier is held.

use horizon_select_core::Point;

use super::callbacks::InputCallbacks;
use super::events::PointerEvent;
use crate::model::{ItemDetailsLookup, ItemKey};
use crate::tracker::SelectionTracker;

#[derive(Debug, Default, Clone, Copy)]
pub struct MouseInputHandler {
    /// The current press used the secondary button; its release is not a click.
    context_press: bool,
}

impl MouseInputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a press. Only secondary-button presses are acted on.
    pub fn on_down<K, H>(
        &mut self,
        event: &PointerEvent,
        host: &H,
        callbacks: &mut dyn InputCallbacks<K>,
    ) -> bool
    where
        K: ItemKey,
        H: ItemDetailsLookup<K> + ?Sized,
    {
        self.context_press = event.is_secondary() && !event.is_primary();
        if !self.context_press {
            return false;
        }
        let details = host.details_at(event.position);
        tracing::debug!(
            target: "horizon_select::router",
            position = details.as_ref().map(|d| d.position),
            "context click"
        );
        callbacks.on_context_click(details.as_ref(), event.position)
    }

    /// Handle a click. `tap_count` is 2 for a double click.
    pub fn on_click<K, H>(
        &mut self,
        event: &PointerEvent,
        tap_count: u32,
        tracker: &mut SelectionTracker<K>,
        host: &H,
        callbacks: &mut dyn InputCallbacks<K>,
    ) -> bool
    where
        K: ItemKey,
        H: ItemDetailsLookup<K> + ?Sized,
    {
        if std::mem::take(&mut self.context_press) {
            return false;
        }
        let modifiers = event.modifiers;

        let Some(details) = host.details_at(event.position) else {
            if modifiers.any() || !tracker.has_selection() {
                return false;
            }
            tracing::debug!(target: "horizon_select::router", "click on empty area, clearing");
            return tracker.clear_selection();
        };

        if tap_count >= 2 {
            return callbacks.on_item_activated(&details);
        }

        if modifiers.toggle() {
            let changed = tracker.toggle(&details.key);
            if tracker.is_selected(&details.key) {
                tracker.start_range(details.position);
            }
            return changed;
        }

        if modifiers.shift && tracker.is_range_active() && tracker.is_multi_select() {
            return tracker.extend_range(details.position);
        }

        let changed = tracker.select_only(&details.key);
        if tracker.is_selected(&details.key) {
            tracker.start_range(details.position);
        }
        changed
    }

    /// Handle the start of a drag that no selection helper claimed.
    ///
    /// Dragging from the drag region of a selected item initiates a drag
    /// and drop.
    pub fn on_drag_started<K, H>(
        &mut self,
        origin: Point,
        tracker: &SelectionTracker<K>,
        host: &H,
        callbacks: &mut dyn InputCallbacks<K>,
    ) -> bool
    where
        K: ItemKey,
        H: ItemDetailsLookup<K> + ?Sized,
    {
        let Some(details) = host.details_at(origin) else {
            return false;
        };
        if !details.in_drag_region(origin) || !tracker.is_selected(&details.key) {
            return false;
        }
        tracing::debug!(target: "horizon_select::router", position = details.position, "drag initiated");
        callbacks.on_drag_initiated(&details, origin)
    }

    /// Forget per-press state.
    pub fn reset(&mut self) {
        self.context_press = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    use crate::config::SelectionMode;
    use crate::input::{KeyboardModifiers, PointerButtons, ToolType};
    use crate::model::{ItemDetails, ListKeyProvider, select_anything};
    use crate::testing::GridHost;

    #[derive(Default)]
    struct Recorder {
        activated: Vec<u64>,
        context: Vec<Option<u64>>,
    }

    impl InputCallbacks<u64> for Recorder {
        fn on_item_activated(&mut self, item: &ItemDetails<u64>) -> bool {
            self.activated.push(item.key);
            true
        }

        fn on_context_click(&mut self, item: Option<&ItemDetails<u64>>, _position: Point) -> bool {
            self.context.push(item.map(|d| d.key));
            true
        }
    }

    fn setup() -> (MouseInputHandler, SelectionTracker<u64>, GridHost, Recorder) {
        let provider = Arc::new(ListKeyProvider::new((0..40u64).collect()));
        let tracker = SelectionTracker::new(provider, Arc::new(select_anything()), SelectionMode::Multi);
        let host = GridHost::new(40, 4, 100.0, 50.0, 400.0, 500.0);
        (MouseInputHandler::new(), tracker, host, Recorder::default())
    }

    /// Viewport point at the centre of `position`.
    fn click(position: usize, modifiers: KeyboardModifiers) -> PointerEvent {
        let point = Point::new((position % 4) as f32 * 100.0 + 50.0, (position / 4) as f32 * 50.0 + 25.0);
        PointerEvent::up(ToolType::Mouse, point, Instant::now()).with_modifiers(modifiers)
    }

    fn selected(tracker: &SelectionTracker<u64>) -> Vec<u64> {
        tracker.selection().iter().copied().collect()
    }

    #[test]
    fn test_plain_click_is_exclusive() {
        let (mut mouse, mut tracker, host, mut rec) = setup();
        mouse.on_click(&click(1, KeyboardModifiers::NONE), 1, &mut tracker, &host, &mut rec);
        mouse.on_click(&click(6, KeyboardModifiers::NONE), 1, &mut tracker, &host, &mut rec);
        assert_eq!(selected(&tracker), vec![6]);
    }

    #[test]
    fn test_ctrl_toggles_and_shift_extends() {
        let (mut mouse, mut tracker, host, mut rec) = setup();
        mouse.on_click(&click(2, KeyboardModifiers::NONE), 1, &mut tracker, &host, &mut rec);
        mouse.on_click(&click(9, KeyboardModifiers::CTRL), 1, &mut tracker, &host, &mut rec);
        assert_eq!(selected(&tracker), vec![2, 9]);

        // Anchor moved to 9; shift-click 11 selects 9..=11.
        mouse.on_click(&click(11, KeyboardModifiers::SHIFT), 1, &mut tracker, &host, &mut rec);
        assert_eq!(selected(&tracker), vec![2, 9, 10, 11]);

        mouse.on_click(&click(9, KeyboardModifiers::CTRL), 1, &mut tracker, &host, &mut rec);
        assert!(!tracker.is_selected(&9));
    }

    #[test]
    fn test_empty_click_clears_unless_modified() {
        let (mut mouse, mut tracker, mut host, mut rec) = setup();
        host.items = 6;
        mouse.on_click(&click(1, KeyboardModifiers::NONE), 1, &mut tracker, &host, &mut rec);

        assert!(!mouse.on_click(&click(20, KeyboardModifiers::CTRL), 1, &mut tracker, &host, &mut rec));
        assert!(tracker.has_selection());
        assert!(mouse.on_click(&click(20, KeyboardModifiers::NONE), 1, &mut tracker, &host, &mut rec));
        assert!(!tracker.has_selection());
    }

    #[test]
    fn test_double_click_activates() {
        let (mut mouse, mut tracker, host, mut rec) = setup();
        mouse.on_click(&click(3, KeyboardModifiers::NONE), 1, &mut tracker, &host, &mut rec);
        mouse.on_click(&click(3, KeyboardModifiers::NONE), 2, &mut tracker, &host, &mut rec);
        assert_eq!(rec.activated, vec![3]);
    }

    #[test]
    fn test_secondary_press_is_context_click() {
        let (mut mouse, mut tracker, host, mut rec) = setup();
        let press = PointerEvent::down(ToolType::Mouse, Point::new(150.0, 25.0), Instant::now())
            .with_buttons(PointerButtons::SECONDARY);
        assert!(mouse.on_down(&press, &host, &mut rec));
        assert_eq!(rec.context, vec![Some(1)]);

        // The matching release does not select.
        assert!(!mouse.on_click(&click(1, KeyboardModifiers::NONE), 1, &mut tracker, &host, &mut rec));
        assert!(!tracker.has_selection());
    }
}
