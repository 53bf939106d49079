//! Rubber-band selection for mouse and stylus.
//!
//! A press over empty space anchors a band in content coordinates. Once the
//! pointer moves past the touch slop the band is live: every move (and
//! every auto-scroll tick) samples the host's layout into a [`GridModel`],
//! collects the positions whose rects overlap the band and hands them to
//! the tracker as the provisional selection. Release commits, cancel
//! discards. Bands add to the existing selection.
//!
//! A press that is released without dragging is not consumed, so the click
//! falls through to the mouse handler (which clears the selection when the
//! click lands on empty space).

mod grid;
mod predicate;

pub use grid::{GRID_TOLERANCE, GridGeometry, GridLayout, GridModel};
pub use predicate::{BandPredicate, EmptyArea, NonDraggableArea};

use std::sync::Arc;
use std::time::Instant;

use horizon_select_core::{PerfSpan, Point, Rect, SharedTimerManager, TimerId};

use crate::auto_scroll::AutoScroller;
use crate::config::AutoScrollConfig;
use crate::content_lock::{ContentLock, ContentLockGuard};
use crate::error::Absorbed;
use crate::host::{HostView, SelectionHost};
use crate::input::{PointerAction, PointerEvent};
use crate::model::{ItemKey, Polarity};
use crate::tracker::SelectionTracker;

/// The two corners of a band, in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandGeometry {
    pub origin: Point,
    pub current: Point,
}

impl BandGeometry {
    /// The axis-aligned rectangle spanned by the corners.
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.origin, self.current)
    }
}

#[derive(Debug)]
struct ActiveBand {
    geometry: BandGeometry,
    /// Press position in viewport coordinates.
    press: Point,
    /// Latest pointer position in viewport coordinates.
    pointer: Point,
    dragged: bool,
    _lock: ContentLockGuard,
}

/// Drives band selection for one view.
pub struct BandSelectionHelper<K: ItemKey> {
    predicate: Arc<dyn BandPredicate<K>>,
    grid: GridModel,
    auto_scroller: AutoScroller,
    content_lock: ContentLock,
    touch_slop: f32,
    active: Option<ActiveBand>,
}

impl<K: ItemKey> BandSelectionHelper<K> {
    pub fn new(
        predicate: Arc<dyn BandPredicate<K>>,
        auto_scroll: AutoScrollConfig,
        timers: SharedTimerManager,
        content_lock: ContentLock,
        touch_slop: f32,
    ) -> Self {
        Self {
            predicate,
            grid: GridModel::new(),
            auto_scroller: AutoScroller::new(auto_scroll, timers),
            content_lock,
            touch_slop,
            active: None,
        }
    }

    /// Returns true between an accepted press and its release or cancel.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Returns true once the active band has been dragged open.
    pub fn is_dragging(&self) -> bool {
        self.active.as_ref().is_some_and(|b| b.dragged)
    }

    /// Current band corners, for drawing the rubber band.
    pub fn geometry(&self) -> Option<BandGeometry> {
        self.active.as_ref().filter(|b| b.dragged).map(|b| b.geometry)
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    /// Offer a raw pointer event. Returns true if the band consumed it.
    pub fn on_pointer_event<H>(
        &mut self,
        event: &PointerEvent,
        tracker: &mut SelectionTracker<K>,
        host: &mut H,
    ) -> bool
    where
        H: SelectionHost<K> + ?Sized,
    {
        match event.action {
            PointerAction::Down => {
                if self.active.is_some() {
                    tracing::debug!(
                        target: "horizon_select::band",
                        reason = %Absorbed::UnexpectedEvent,
                        "press while band active, resetting"
                    );
                    self.cancel(tracker);
                }
                self.try_start(event, tracker, host);
                false
            }
            PointerAction::Move => {
                let Some(band) = self.active.as_mut() else {
                    return false;
                };
                band.pointer = event.position;
                if !band.dragged {
                    if band.press.distance_to(event.position) <= self.touch_slop {
                        return false;
                    }
                    band.dragged = true;
                    tracing::debug!(target: "horizon_select::band", origin = ?band.geometry.origin, "band opened");
                }
                self.update(tracker, host);
                self.auto_scroll(&*host, event.timestamp);
                true
            }
            PointerAction::Up => {
                let Some(band) = self.active.take() else {
                    return false;
                };
                self.auto_scroller.reset();
                if band.dragged {
                    tracker.merge_provisional_selection();
                    tracing::debug!(target: "horizon_select::band", rect = ?band.geometry.rect(), "band committed");
                }
                band.dragged
            }
            PointerAction::Cancel => {
                let dragged = self.is_dragging();
                self.cancel(tracker);
                dragged
            }
        }
    }

    /// Handle a timer tick. Returns true if the tick belonged to this band.
    pub fn on_timer<H>(&mut self, id: TimerId, tracker: &mut SelectionTracker<K>, host: &mut H) -> bool
    where
        H: SelectionHost<K> + ?Sized,
    {
        if self.active.is_none() || !self.auto_scroller.on_tick(id, host) {
            return false;
        }
        self.update(tracker, host);
        true
    }

    /// Abandon the band, discarding its provisional selection.
    pub fn cancel(&mut self, tracker: &mut SelectionTracker<K>) -> bool {
        self.auto_scroller.reset();
        if self.active.take().is_none() {
            return false;
        }
        tracker.clear_provisional_selection();
        tracing::debug!(target: "horizon_select::band", "band cancelled");
        true
    }

    /// Content was reloaded: cached geometry no longer describes it.
    pub fn on_data_changed(&mut self, tracker: &mut SelectionTracker<K>) {
        self.cancel(tracker);
        self.grid.reset();
    }

    fn try_start<H>(&mut self, event: &PointerEvent, tracker: &SelectionTracker<K>, host: &mut H)
    where
        H: SelectionHost<K> + ?Sized,
    {
        if !event.is_primary() {
            return;
        }
        if !tracker.is_multi_select() {
            tracing::trace!(target: "horizon_select::band", reason = %Absorbed::ModeMismatch, "band disabled");
            return;
        }
        let details = host.details_at(event.position);
        if !self.predicate.can_initiate(event, details.as_ref()) {
            return;
        }

        self.grid.reset();
        self.grid.observe(&*host);
        let origin = event.position + host.scroll_offset();
        self.active = Some(ActiveBand {
            geometry: BandGeometry {
                origin,
                current: origin,
            },
            press: event.position,
            pointer: event.position,
            dragged: false,
            _lock: self.content_lock.acquire(),
        });
        tracing::trace!(target: "horizon_select::band", ?origin, "band armed");
    }

    #[tracing::instrument(skip_all, target = "horizon_select::band", level = "trace")]
    fn update<H>(&mut self, tracker: &mut SelectionTracker<K>, host: &mut H)
    where
        H: SelectionHost<K> + ?Sized,
    {
        let _perf = PerfSpan::new("band_update");
        let Some(band) = self.active.as_mut() else {
            return;
        };

        self.grid.observe(&*host);
        band.geometry.current = band.pointer + host.scroll_offset();
        let rect = band.geometry.rect();

        if matches!(self.grid.layout(), GridLayout::Unavailable) {
            tracing::debug!(
                target: "horizon_select::band",
                reason = %Absorbed::GeometryUnavailable,
                "no item geometry, band selects nothing"
            );
            tracker.clear_provisional_selection();
            return;
        }

        let predicate = &self.predicate;
        let positions = self
            .grid
            .positions_intersecting(&rect, |position, item| predicate.accepts(position, item));
        tracing::trace!(target: "horizon_select::band", ?rect, hits = positions.len(), "band resized");
        tracker.set_provisional_positions(positions, Polarity::Select);
    }

    fn auto_scroll<H>(&mut self, host: &H, now: Instant)
    where
        H: HostView + ?Sized,
    {
        let Some(band) = self.active.as_ref() else {
            return;
        };
        let row_height = match self.grid.layout() {
            GridLayout::Uniform(geometry) => geometry.pitch.height,
            GridLayout::Irregular | GridLayout::Unavailable => 0.0,
        };
        self.auto_scroller
            .update(band.pointer, host.viewport(), row_height, now);
    }
}

impl<K: ItemKey> std::fmt::Debug for BandSelectionHelper<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BandSelectionHelper")
            .field("active", &self.active)
            .field("grid", &self.grid.layout())
            .field("auto_scroller", &self.auto_scroller)
            .finish_non_exhaustive()
    }
}
