//! Interpretation of recognized touch gestures.

use horizon_select_core::Point;

use super::callbacks::InputCallbacks;
use super::events::PointerEvent;
use crate::error::Absorbed;
use crate::gesture_selection::GestureSelectionHelper;
use crate::model::{ItemDetails, ItemDetailsLookup, ItemKey};
use crate::tracker::SelectionTracker;

/// Turns taps and long presses from fingers into selection changes.
///
/// With nothing selected a tap activates the item, unless it lands in the
/// item's selection hotspot. Once something is selected the list is in
/// "selection mode" and taps toggle items instead. A long press selects the
/// item (arming paint selection when available), or starts a drag when it
/// lands in the drag region of an already selected item.
#[derive(Debug, Default, Clone, Copy)]
pub struct TouchInputHandler;

impl TouchInputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Handle a completed tap. Returns true if the tap was acted on.
    pub fn on_tap<K, H>(
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
        let Some(details) = host.details_at(event.position) else {
            if !tracker.has_selection() {
                return false;
            }
            tracing::debug!(target: "horizon_select::router", "tap on empty area, clearing");
            return tracker.clear_selection();
        };

        if tap_count >= 2 {
            return callbacks.on_item_activated(&details);
        }

        if tracker.has_selection() {
            if event.modifiers.shift && tracker.is_range_active() {
                return tracker.extend_range(details.position);
            }
            return toggle_and_anchor(&details, tracker);
        }

        if details.in_selection_hotspot(event.position) {
            return select_and_anchor(&details, tracker);
        }
        callbacks.on_item_activated(&details)
    }

    /// Handle a long press.
    ///
    /// `paint` is the paint-selection helper when the tool is routed to it.
    pub fn on_long_press<K, H>(
        &mut self,
        event: &PointerEvent,
        tracker: &mut SelectionTracker<K>,
        host: &H,
        callbacks: &mut dyn InputCallbacks<K>,
        paint: Option<&mut GestureSelectionHelper<K>>,
    ) -> bool
    where
        K: ItemKey,
        H: ItemDetailsLookup<K> + ?Sized,
    {
        let Some(details) = host.details_at(event.position) else {
            return false;
        };

        if details.in_drag_region(event.position) && tracker.is_selected(&details.key) {
            tracing::debug!(target: "horizon_select::router", position = details.position, "drag from long press");
            return callbacks.on_drag_initiated(&details, event.position);
        }

        let handled = match paint {
            Some(helper) if tracker.is_multi_select() => arm(helper, &details, event.position, tracker),
            _ => select_and_anchor(&details, tracker),
        };
        if handled {
            callbacks.perform_haptic_feedback();
        }
        handled
    }
}

fn arm<K: ItemKey>(
    helper: &mut GestureSelectionHelper<K>,
    details: &ItemDetails<K>,
    point: Point,
    tracker: &mut SelectionTracker<K>,
) -> bool {
    if helper.arm(details, point, tracker) {
        return true;
    }
    tracing::debug!(target: "horizon_select::router", reason = %Absorbed::PredicateVeto, "paint not armed");
    false
}

fn select_and_anchor<K: ItemKey>(details: &ItemDetails<K>, tracker: &mut SelectionTracker<K>) -> bool {
    let changed = tracker.select(&details.key);
    if tracker.is_selected(&details.key) {
        tracker.start_range(details.position);
    }
    changed
}

fn toggle_and_anchor<K: ItemKey>(details: &ItemDetails<K>, tracker: &mut SelectionTracker<K>) -> bool {
    let changed = tracker.toggle(&details.key);
    if changed && tracker.is_selected(&details.key) {
        tracker.start_range(details.position);
    }
    changed
}
