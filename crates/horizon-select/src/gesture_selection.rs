//! Touch "paint" selection.
//!
//! A long press over an item arms the helper with that item as the anchor.
//! Dragging past the touch slop starts painting: the provisional selection
//! becomes the contiguous run of positions from the anchor to the item
//! under the finger, so a fast sweep never skips items and sweeping back
//! un-paints them. If the anchor was selected when armed, the stroke
//! deselects instead. Release commits, cancel discards.

use std::marker::PhantomData;
use std::time::Instant;

use horizon_select_core::{Point, SharedTimerManager, TimerId};

use crate::auto_scroll::AutoScroller;
use crate::config::AutoScrollConfig;
use crate::content_lock::{ContentLock, ContentLockGuard};
use crate::error::Absorbed;
use crate::host::{HostView, SelectionHost};
use crate::input::{PointerAction, PointerEvent};
use crate::model::{ItemDetails, ItemKey, Polarity, Position};
use crate::tracker::SelectionTracker;

/// Observable state of the paint gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintState {
    Idle,
    /// Long press recognized; waiting for the finger to move.
    Armed,
    /// Finger is sweeping across items.
    Painting,
}

#[derive(Debug)]
struct Stroke {
    anchor: Position,
    end: Position,
    polarity: Polarity,
    press: Point,
    pointer: Point,
    painting: bool,
    _lock: ContentLockGuard,
}

/// Drives paint selection for one view.
pub struct GestureSelectionHelper<K: ItemKey> {
    stroke: Option<Stroke>,
    auto_scroller: AutoScroller,
    content_lock: ContentLock,
    touch_slop: f32,
    _key: PhantomData<fn() -> K>,
}

impl<K: ItemKey> GestureSelectionHelper<K> {
    pub fn new(
        auto_scroll: AutoScrollConfig,
        timers: SharedTimerManager,
        content_lock: ContentLock,
        touch_slop: f32,
    ) -> Self {
        Self {
            stroke: None,
            auto_scroller: AutoScroller::new(auto_scroll, timers),
            content_lock,
            touch_slop,
            _key: PhantomData,
        }
    }

    pub fn state(&self) -> PaintState {
        match &self.stroke {
            None => PaintState::Idle,
            Some(stroke) if stroke.painting => PaintState::Painting,
            Some(_) => PaintState::Armed,
        }
    }

    pub fn is_active(&self) -> bool {
        self.stroke.is_some()
    }

    /// Polarity of the current stroke, if any.
    pub fn polarity(&self) -> Option<Polarity> {
        self.stroke.as_ref().map(|s| s.polarity)
    }

    /// Arm the helper with the long-pressed item as anchor.
    ///
    /// Returns false (and stays idle) in single-select mode, for stale
    /// items, or when the predicate refuses the anchor.
    pub fn arm(&mut self, details: &ItemDetails<K>, point: Point, tracker: &mut SelectionTracker<K>) -> bool {
        if self.stroke.is_some() {
            tracing::debug!(target: "horizon_select::gesture", reason = %Absorbed::UnexpectedEvent, "re-armed while active");
            self.cancel(tracker);
        }
        if !tracker.is_multi_select() {
            return false;
        }
        let Some(anchor) = tracker.position_for_key(&details.key) else {
            tracing::debug!(target: "horizon_select::gesture", reason = %Absorbed::StaleReference, "anchor vanished");
            return false;
        };

        let polarity = if tracker.is_selected(&details.key) {
            Polarity::Deselect
        } else {
            Polarity::Select
        };
        if !tracker.set_provisional_selection_with([details.key.clone()], polarity) {
            return false;
        }

        tracing::debug!(target: "horizon_select::gesture", anchor, ?polarity, "paint armed");
        self.stroke = Some(Stroke {
            anchor,
            end: anchor,
            polarity,
            press: point,
            pointer: point,
            painting: false,
            _lock: self.content_lock.acquire(),
        });
        true
    }

    /// Offer a raw pointer event. Returns true if the stroke consumed it.
    pub fn on_pointer_event<H>(
        &mut self,
        event: &PointerEvent,
        tracker: &mut SelectionTracker<K>,
        host: &mut H,
    ) -> bool
    where
        H: SelectionHost<K> + ?Sized,
    {
        let Some(stroke) = self.stroke.as_mut() else {
            if event.action == PointerAction::Move {
                tracing::trace!(target: "horizon_select::gesture", "move while idle ignored");
            }
            return false;
        };

        match event.action {
            PointerAction::Down => {
                tracing::debug!(target: "horizon_select::gesture", reason = %Absorbed::UnexpectedEvent, "press during stroke");
                self.cancel(tracker);
                false
            }
            PointerAction::Move => {
                stroke.pointer = event.position;
                if !stroke.painting {
                    if stroke.press.distance_to(event.position) <= self.touch_slop {
                        return true;
                    }
                    stroke.painting = true;
                    tracing::debug!(target: "horizon_select::gesture", "painting");
                }
                self.update(tracker, &*host);
                self.auto_scroll(&*host, event.timestamp);
                true
            }
            PointerAction::Up => {
                self.auto_scroller.reset();
                if let Some(stroke) = self.stroke.take() {
                    tracker.merge_provisional_selection();
                    tracing::debug!(
                        target: "horizon_select::gesture",
                        anchor = stroke.anchor,
                        end = stroke.end,
                        "paint committed"
                    );
                }
                true
            }
            PointerAction::Cancel => {
                self.cancel(tracker);
                true
            }
        }
    }

    /// Handle a timer tick. Returns true if the tick belonged to this stroke.
    pub fn on_timer<H>(&mut self, id: TimerId, tracker: &mut SelectionTracker<K>, host: &mut H) -> bool
    where
        H: SelectionHost<K> + ?Sized,
    {
        if self.stroke.is_none() || !self.auto_scroller.on_tick(id, host) {
            return false;
        }
        self.update(tracker, &*host);
        true
    }

    /// Abandon the stroke, discarding its provisional selection.
    pub fn cancel(&mut self, tracker: &mut SelectionTracker<K>) -> bool {
        self.auto_scroller.reset();
        if self.stroke.take().is_none() {
            return false;
        }
        tracker.clear_provisional_selection();
        tracing::debug!(target: "horizon_select::gesture", "paint cancelled");
        true
    }

    fn update<H>(&mut self, tracker: &mut SelectionTracker<K>, host: &H)
    where
        H: SelectionHost<K> + ?Sized,
    {
        let Some(stroke) = self.stroke.as_mut() else {
            return;
        };
        // Between items: keep the previous range.
        let Some(details) = host.details_at(stroke.pointer) else {
            return;
        };
        if details.position == stroke.end {
            return;
        }
        stroke.end = details.position;

        let (lo, hi) = (stroke.anchor.min(stroke.end), stroke.anchor.max(stroke.end));
        tracing::trace!(target: "horizon_select::gesture", lo, hi, "stroke extended");
        tracker.set_provisional_positions(lo..=hi, stroke.polarity);
    }

    fn auto_scroll<H>(&mut self, host: &H, now: Instant)
    where
        H: HostView + ?Sized,
    {
        let Some(stroke) = self.stroke.as_ref() else {
            return;
        };
        let row_height = host
            .visible_item_rects()
            .first()
            .map_or(0.0, |(_, rect)| rect.height());
        self.auto_scroller
            .update(stroke.pointer, host.viewport(), row_height, now);
    }
}

impl<K: ItemKey> std::fmt::Debug for GestureSelectionHelper<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureSelectionHelper")
            .field("stroke", &self.stroke)
            .field("auto_scroller", &self.auto_scroller)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectionMode;
    use crate::input::ToolType;
    use crate::model::{ItemDetailsLookup, ListKeyProvider, PredicateFn, select_anything};
    use crate::testing::GridHost;
    use std::sync::Arc;

    // Single-column list of 100x50 rows in a 100x500 viewport.
    fn setup() -> (GestureSelectionHelper<u64>, SelectionTracker<u64>, GridHost) {
        let helper = GestureSelectionHelper::new(
            AutoScrollConfig::default(),
            SharedTimerManager::new(),
            ContentLock::new(),
            10.0,
        );
        let provider = Arc::new(ListKeyProvider::new((0..30u64).collect()));
        let tracker = SelectionTracker::new(provider, Arc::new(select_anything()), SelectionMode::Multi);
        (helper, tracker, GridHost::new(30, 1, 100.0, 50.0, 100.0, 500.0))
    }

    fn finger(action: PointerAction, y: f32) -> PointerEvent {
        PointerEvent::new(action, ToolType::Finger, Point::new(50.0, y), Instant::now())
    }

    fn arm_at(helper: &mut GestureSelectionHelper<u64>, tracker: &mut SelectionTracker<u64>, host: &GridHost, y: f32) -> bool {
        let point = Point::new(50.0, y);
        let details = host.details_at(point).unwrap();
        helper.arm(&details, point, tracker)
    }

    #[test]
    fn test_paint_selects_contiguous_range() {
        let (mut helper, mut tracker, mut host) = setup();
        assert!(arm_at(&mut helper, &mut tracker, &host, 125.0));
        assert_eq!(helper.state(), PaintState::Armed);
        assert!(tracker.is_selected(&2));

        assert!(helper.on_pointer_event(&finger(PointerAction::Move, 130.0), &mut tracker, &mut host));
        assert_eq!(helper.state(), PaintState::Armed);

        // Sweep straight to row 6: rows 3..5 are filled in.
        helper.on_pointer_event(&finger(PointerAction::Move, 325.0), &mut tracker, &mut host);
        assert_eq!(helper.state(), PaintState::Painting);
        let provisional: Vec<u64> = tracker.selection().provisional().iter().copied().collect();
        assert_eq!(provisional, vec![2, 3, 4, 5, 6]);
        assert!(tracker.selection().selected().is_empty());

        // Sweep back un-paints.
        helper.on_pointer_event(&finger(PointerAction::Move, 175.0), &mut tracker, &mut host);
        assert!(!tracker.is_selected(&5));

        assert!(helper.on_pointer_event(&finger(PointerAction::Up, 175.0), &mut tracker, &mut host));
        assert_eq!(tracker.snapshot().keys(), &[2, 3]);
        assert_eq!(helper.state(), PaintState::Idle);
    }

    #[test]
    fn test_selected_anchor_paints_deselect() {
        let (mut helper, mut tracker, mut host) = setup();
        tracker.set_items_selected(0..6, true);

        assert!(arm_at(&mut helper, &mut tracker, &host, 25.0));
        assert_eq!(helper.polarity(), Some(Polarity::Deselect));
        helper.on_pointer_event(&finger(PointerAction::Move, 175.0), &mut tracker, &mut host);
        helper.on_pointer_event(&finger(PointerAction::Up, 175.0), &mut tracker, &mut host);

        assert_eq!(tracker.snapshot().keys(), &[4, 5]);
    }

    #[test]
    fn test_cancel_leaves_selection_untouched() {
        let (mut helper, mut tracker, mut host) = setup();
        tracker.select(&9);
        arm_at(&mut helper, &mut tracker, &host, 25.0);
        helper.on_pointer_event(&finger(PointerAction::Move, 225.0), &mut tracker, &mut host);

        assert!(helper.on_pointer_event(&finger(PointerAction::Cancel, 225.0), &mut tracker, &mut host));
        assert_eq!(tracker.snapshot().keys(), &[9]);
        assert!(!tracker.selection().has_provisional());
    }

    #[test]
    fn test_gap_keeps_previous_range() {
        let (mut helper, mut tracker, mut host) = setup();
        arm_at(&mut helper, &mut tracker, &host, 25.0);
        helper.on_pointer_event(&finger(PointerAction::Move, 125.0), &mut tracker, &mut host);
        // Outside the column: no item under the finger.
        let gap = PointerEvent::new(PointerAction::Move, ToolType::Finger, Point::new(-20.0, 300.0), Instant::now());
        helper.on_pointer_event(&gap, &mut tracker, &mut host);
        assert_eq!(tracker.selection().provisional().len(), 3);
    }

    #[test]
    fn test_idle_move_is_ignored() {
        let (mut helper, mut tracker, mut host) = setup();
        assert!(!helper.on_pointer_event(&finger(PointerAction::Move, 100.0), &mut tracker, &mut host));
        assert_eq!(helper.state(), PaintState::Idle);
    }

    #[test]
    fn test_single_mode_does_not_arm() {
        let (mut helper, _, host) = setup();
        let provider = Arc::new(ListKeyProvider::new((0..30u64).collect()));
        let mut tracker = SelectionTracker::new(provider, Arc::new(select_anything()), SelectionMode::Single);
        assert!(!arm_at(&mut helper, &mut tracker, &host, 25.0));
        assert_eq!(helper.state(), PaintState::Idle);
    }

    #[test]
    fn test_vetoed_anchor_does_not_arm() {
        let (mut helper, _, host) = setup();
        let provider = Arc::new(ListKeyProvider::new((0..30u64).collect()));
        let predicate = Arc::new(PredicateFn::new(|k: &u64, _| *k != 0));
        let mut tracker = SelectionTracker::new(provider, predicate, SelectionMode::Multi);
        assert!(!arm_at(&mut helper, &mut tracker, &host, 25.0));
        assert!(!helper.content_lock.is_locked());
    }
}
