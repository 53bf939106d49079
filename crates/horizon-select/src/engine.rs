//! The selection engine facade.
//!
//! [`SelectionEngine`] owns the tracker, the input router with its band and
//! paint helpers, the shared timer manager and the content lock. A host
//! forwards pointer events and expired timers to it and gets told, through
//! [`HostView::invalidate`], when the rendered selection must be redrawn.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_select::prelude::*;
//!
//! let provider = Arc::new(ListKeyProvider::new(vec![1u32, 2, 3]));
//! let mut engine = SelectionEngine::builder(provider)
//!     .mode(SelectionMode::Multi)
//!     .build()
//!     .unwrap();
//!
//! engine.tracker_mut().select(&2);
//! assert!(engine.tracker().is_selected(&2));
//! ```

use std::sync::Arc;
use std::time::Instant;

use horizon_select_core::{SharedTimerManager, TimerEvent};

use crate::band::{BandGeometry, BandPredicate, BandSelectionHelper, EmptyArea};
use crate::config::{SelectionConfig, SelectionMode};
use crate::content_lock::ContentLock;
use crate::error::Result;
use crate::gesture_selection::{GestureSelectionHelper, PaintState};
use crate::host::{HostView, SelectionHost};
use crate::input::{GestureRecognizer, InputCallbacks, InputEventRouter, NoopCallbacks, PointerEvent};
use crate::model::{
    ItemKey, SelectionPredicate, SelectionSnapshot, StableIdProvider, select_anything,
};
use crate::tracker::SelectionTracker;

/// Builder for creating a [`SelectionEngine`].
pub struct SelectionEngineBuilder<K: ItemKey> {
    provider: Arc<dyn StableIdProvider<K>>,
    predicate: Arc<dyn SelectionPredicate<K>>,
    band_predicate: Arc<dyn BandPredicate<K>>,
    callbacks: Box<dyn InputCallbacks<K>>,
    config: SelectionConfig,
    timers: Option<SharedTimerManager>,
    content_lock: Option<ContentLock>,
}

impl<K: ItemKey> SelectionEngineBuilder<K> {
    /// Create a builder with default settings for the given key provider.
    pub fn new(provider: Arc<dyn StableIdProvider<K>>) -> Self {
        Self {
            provider,
            predicate: Arc::new(select_anything()),
            band_predicate: Arc::new(EmptyArea),
            callbacks: Box::new(NoopCallbacks),
            config: SelectionConfig::default(),
            timers: None,
            content_lock: None,
        }
    }

    /// Set the predicate that gates every selection change.
    pub fn predicate(mut self, predicate: Arc<dyn SelectionPredicate<K>>) -> Self {
        self.predicate = predicate;
        self
    }

    /// Set where band selection may begin.
    pub fn band_predicate(mut self, predicate: Arc<dyn BandPredicate<K>>) -> Self {
        self.band_predicate = predicate;
        self
    }

    pub fn callbacks(mut self, callbacks: Box<dyn InputCallbacks<K>>) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: SelectionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn mode(mut self, mode: SelectionMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Share a timer manager with the host instead of creating one.
    pub fn timers(mut self, timers: SharedTimerManager) -> Self {
        self.timers = Some(timers);
        self
    }

    /// Share a content lock with the host instead of creating one.
    pub fn content_lock(mut self, lock: ContentLock) -> Self {
        self.content_lock = Some(lock);
        self
    }

    /// Validate the configuration and build the engine.
    pub fn build(self) -> Result<SelectionEngine<K>> {
        self.config.validate()?;

        let config = self.config;
        let timers = self.timers.unwrap_or_default();
        let content_lock = self.content_lock.unwrap_or_default();
        let slop = config.gesture.touch_slop;

        let band = BandSelectionHelper::new(
            self.band_predicate,
            config.auto_scroll,
            timers.clone(),
            content_lock.clone(),
            slop,
        );
        let paint = GestureSelectionHelper::new(config.auto_scroll, timers.clone(), content_lock.clone(), slop);
        let router = InputEventRouter::new(
            config.routing,
            GestureRecognizer::with_config(config.gesture),
            band,
            paint,
            self.callbacks,
            timers.clone(),
        );
        let tracker = SelectionTracker::new(self.provider, self.predicate, config.mode);

        tracing::debug!(target: "horizon_select::router", mode = ?config.mode, "selection engine built");
        Ok(SelectionEngine {
            config,
            tracker,
            router,
            timers,
            content_lock,
        })
    }
}

impl<K: ItemKey> std::fmt::Debug for SelectionEngineBuilder<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionEngineBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Multi-input selection for one list or grid view.
pub struct SelectionEngine<K: ItemKey> {
    config: SelectionConfig,
    tracker: SelectionTracker<K>,
    router: InputEventRouter<K>,
    timers: SharedTimerManager,
    content_lock: ContentLock,
}

impl<K: ItemKey> SelectionEngine<K> {
    /// Start building an engine for the given key provider.
    pub fn builder(provider: Arc<dyn StableIdProvider<K>>) -> SelectionEngineBuilder<K> {
        SelectionEngineBuilder::new(provider)
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    pub fn tracker(&self) -> &SelectionTracker<K> {
        &self.tracker
    }

    /// Mutable access for programmatic selection changes.
    ///
    /// Changes made this way do not invalidate the host.
    pub fn tracker_mut(&mut self) -> &mut SelectionTracker<K> {
        &mut self.tracker
    }

    /// The lock held while a band or paint gesture is active.
    pub fn content_lock(&self) -> &ContentLock {
        &self.content_lock
    }

    /// The timer manager the host must pump.
    pub fn timers(&self) -> &SharedTimerManager {
        &self.timers
    }

    pub fn is_gesture_active(&self) -> bool {
        self.router.is_gesture_active()
    }

    /// Where the paint gesture is, for hosts that render an armed state.
    pub fn paint_state(&self) -> PaintState {
        self.router.paint().state()
    }

    /// Current band rectangle for drawing, in content coordinates.
    pub fn band_geometry(&self) -> Option<BandGeometry> {
        self.router.band().geometry()
    }

    /// Feed one pointer event. Returns true if the engine consumed it.
    pub fn handle_pointer_event<H>(&mut self, event: &PointerEvent, host: &mut H) -> bool
    where
        H: SelectionHost<K> + ?Sized,
    {
        let mark = self.mark();
        let consumed = self.router.route(event, &mut self.tracker, host);
        self.invalidate_if_changed(mark, host);
        consumed
    }

    /// Feed one expired timer. Returns true if it belonged to the engine.
    pub fn handle_timer<H>(&mut self, timer: &TimerEvent, host: &mut H) -> bool
    where
        H: SelectionHost<K> + ?Sized,
    {
        let mark = self.mark();
        let handled = self.router.on_timer(timer, &mut self.tracker, host);
        self.invalidate_if_changed(mark, host);
        handled
    }

    /// Process every timer due at `now`. Returns how many were handled.
    pub fn pump_timers<H>(&mut self, now: Instant, host: &mut H) -> usize
    where
        H: SelectionHost<K> + ?Sized,
    {
        self.timers
            .process_expired(now)
            .iter()
            .filter(|timer| self.handle_timer(timer, host))
            .count()
    }

    /// Abandon any gesture in progress, discarding provisional selection.
    pub fn cancel<H>(&mut self, host: &mut H) -> bool
    where
        H: HostView + ?Sized,
    {
        let mark = self.mark();
        let cancelled = self.router.cancel(&mut self.tracker);
        self.invalidate_if_changed(mark, host);
        cancelled
    }

    /// The host reloaded its content.
    ///
    /// Any gesture in progress is cancelled, which releases the content lock
    /// and runs work queued behind it. Keys that no longer resolve are then
    /// dropped from the selection and cached layout is discarded.
    #[tracing::instrument(skip_all, target = "horizon_select::router", level = "debug")]
    pub fn notify_data_changed<H>(&mut self, host: &mut H)
    where
        H: HostView + ?Sized,
    {
        let mark = self.mark();
        self.router.on_data_changed(&mut self.tracker);
        self.tracker.on_data_changed();
        self.invalidate_if_changed(mark, host);
    }

    /// Record the committed selection.
    pub fn snapshot(&self) -> SelectionSnapshot<K> {
        self.tracker.snapshot()
    }

    /// Restore a snapshot, cancelling any gesture in progress.
    pub fn restore<H>(&mut self, snapshot: SelectionSnapshot<K>, host: &mut H)
    where
        H: HostView + ?Sized,
    {
        let mark = self.mark();
        self.router.cancel(&mut self.tracker);
        self.tracker.restore_selection(snapshot);
        self.invalidate_if_changed(mark, host);
    }

    fn mark(&self) -> (u64, Option<BandGeometry>) {
        (self.tracker.generation(), self.band_geometry())
    }

    fn invalidate_if_changed<H>(&self, mark: (u64, Option<BandGeometry>), host: &mut H)
    where
        H: HostView + ?Sized,
    {
        if mark != self.mark() {
            host.invalidate();
        }
    }
}

impl<K: ItemKey> std::fmt::Debug for SelectionEngine<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionEngine")
            .field("config", &self.config)
            .field("tracker", &self.tracker)
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}
