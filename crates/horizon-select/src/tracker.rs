//! Selection state owner.
//!
//! [`SelectionTracker`] holds the committed and provisional selection, gates
//! every change through the host's [`SelectionPredicate`], resolves keys
//! through the [`StableIdProvider`] and publishes changes through signals.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_select::model::{ListKeyProvider, select_anything};
//! use horizon_select::{SelectionMode, SelectionTracker};
//!
//! let provider = Arc::new(ListKeyProvider::new(vec![10u64, 11, 12]));
//! let mut tracker = SelectionTracker::new(provider, Arc::new(select_anything()), SelectionMode::Multi);
//!
//! let _guard = tracker.item_state_changed.connect_scoped(|(key, selected)| {
//!     println!("{key} -> {selected}");
//! });
//!
//! assert!(tracker.select(&11));
//! assert!(tracker.is_selected(&11));
//! assert!(!tracker.select(&11)); // already selected
//! ```

use std::sync::Arc;

use horizon_select_core::{ConnectionGuard, Signal};
use indexmap::IndexSet;

use crate::config::SelectionMode;
use crate::error::Absorbed;
use crate::model::{
    ItemKey, Polarity, Position, Selection, SelectionPredicate, SelectionSnapshot,
    StableIdProvider,
};

/// Anchor and current extent of a shift-style range selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Range {
    anchor: Position,
    extent: Option<Position>,
}

impl Range {
    fn positions(anchor: Position, end: Position) -> std::ops::RangeInclusive<Position> {
        anchor.min(end)..=anchor.max(end)
    }
}

/// Owns selection state and publishes changes.
pub struct SelectionTracker<K: ItemKey> {
    selection: Selection<K>,
    mode: SelectionMode,
    provider: Arc<dyn StableIdProvider<K>>,
    predicate: Arc<dyn SelectionPredicate<K>>,
    range: Option<Range>,
    generation: u64,

    /// Emitted with `(key, effectively_selected)` whenever an item's
    /// rendered state flips.
    pub item_state_changed: Signal<(K, bool)>,
    /// Emitted once after any mutation that changed selection state.
    pub selection_changed: Signal<()>,
    /// Emitted after [`SelectionTracker::restore_selection`].
    pub selection_restored: Signal<()>,
    /// Emitted after [`SelectionTracker::clear_selection`] removed something.
    pub selection_cleared: Signal<()>,
}

impl<K: ItemKey> SelectionTracker<K> {
    /// Creates an empty tracker.
    pub fn new(
        provider: Arc<dyn StableIdProvider<K>>,
        predicate: Arc<dyn SelectionPredicate<K>>,
        mode: SelectionMode,
    ) -> Self {
        Self {
            selection: Selection::new(),
            mode,
            provider,
            predicate,
            range: None,
            generation: 0,
            item_state_changed: Signal::new(),
            selection_changed: Signal::new(),
            selection_restored: Signal::new(),
            selection_cleared: Signal::new(),
        }
    }

    /// Read access to the selection sets.
    pub fn selection(&self) -> &Selection<K> {
        &self.selection
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Returns true if more than one item may be selected.
    pub fn is_multi_select(&self) -> bool {
        self.mode.is_multi() && self.predicate.can_select_multiple()
    }

    /// Effective state of `key`, including any provisional layer.
    pub fn is_selected(&self, key: &K) -> bool {
        self.selection.contains(key)
    }

    /// Returns true if anything is effectively selected.
    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Counter bumped on every observable change.
    ///
    /// Lets callers detect "did anything change" without connecting a slot.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The key currently at `position`, if any.
    pub fn key_for_position(&self, position: Position) -> Option<K> {
        self.provider.key_for_position(position)
    }

    /// The current position of `key`, if it is still present.
    pub fn position_for_key(&self, key: &K) -> Option<Position> {
        self.provider.position_for_key(key)
    }

    /// Connect a `selection_changed` observer that lives as long as the guard.
    pub fn observe<F>(&self, slot: F) -> ConnectionGuard
    where
        F: Fn(&()) + Send + Sync + 'static,
    {
        self.selection_changed.connect_scoped(slot)
    }

    // -------------------------------------------------------------------------
    // Committed selection
    // -------------------------------------------------------------------------

    /// Select a single item.
    ///
    /// In single-select mode any other selected item is deselected. Returns
    /// true if the selection changed.
    pub fn select(&mut self, key: &K) -> bool {
        if !self.is_live(key, "select") || self.selection.is_committed(key) {
            return false;
        }
        if !self.allowed(key, true) {
            return false;
        }

        let others: Vec<K> = if self.is_multi_select() {
            Vec::new()
        } else {
            self.selection.iter().filter(|k| *k != key).cloned().collect()
        };
        if !others.iter().all(|k| self.allowed(k, false)) {
            return false;
        }

        let mut affected = others.clone();
        affected.push(key.clone());
        self.apply(&affected, true, |selection| {
            for other in &others {
                selection.remove(other);
            }
            selection.insert(key.clone());
        })
    }

    /// Select `key` and deselect everything else.
    ///
    /// The whole change is vetoed if the predicate refuses any part of it.
    pub fn select_only(&mut self, key: &K) -> bool {
        if !self.is_live(key, "select_only") {
            return false;
        }
        let others: Vec<K> = self.selection.iter().filter(|k| *k != key).cloned().collect();
        let adding = !self.selection.is_committed(key);
        if others.is_empty() && !adding {
            return false;
        }
        if (adding && !self.allowed(key, true)) || !others.iter().all(|k| self.allowed(k, false))
        {
            return false;
        }

        let mut affected = others.clone();
        affected.push(key.clone());
        self.apply(&affected, true, |selection| {
            for other in &others {
                selection.remove(other);
            }
            selection.insert(key.clone());
        })
    }

    /// Deselect a single item. Returns true if the selection changed.
    pub fn deselect(&mut self, key: &K) -> bool {
        if !self.is_live(key, "deselect") || !self.selection.is_committed(key) {
            return false;
        }
        if !self.allowed(key, false) {
            return false;
        }
        self.apply(std::slice::from_ref(key), true, |selection| {
            selection.remove(key);
        })
    }

    /// Flip the committed state of `key`.
    pub fn toggle(&mut self, key: &K) -> bool {
        if self.selection.is_committed(key) {
            self.deselect(key)
        } else {
            self.select(key)
        }
    }

    /// Set many items to the same state at once.
    ///
    /// Stale keys are dropped. If the predicate refuses any remaining key,
    /// nothing changes and false is returned.
    pub fn set_items_selected<I>(&mut self, keys: I, selected: bool) -> bool
    where
        I: IntoIterator<Item = K>,
    {
        let keys: Vec<K> = self
            .live_keys(keys)
            .into_iter()
            .filter(|k| self.selection.is_committed(k) != selected)
            .collect();
        if keys.is_empty() {
            return false;
        }

        if selected && !self.is_multi_select() {
            if keys.len() > 1 {
                self.absorbed(Absorbed::ModeMismatch, "set_items_selected");
                return false;
            }
            return self.select(&keys[0]);
        }

        if !keys.iter().all(|k| self.allowed(k, selected)) {
            return false;
        }

        self.apply(&keys, true, |selection| {
            for key in &keys {
                if selected {
                    selection.insert(key.clone());
                } else {
                    selection.remove(key);
                }
            }
        })
    }

    /// Deselect everything and drop any provisional set and range anchor.
    ///
    /// If the predicate refuses to deselect any committed key, nothing
    /// changes and false is returned.
    pub fn clear_selection(&mut self) -> bool {
        let affected = self.selection.effective_keys();
        let had_committed = !self.selection.selected().is_empty();
        if affected.is_empty() && !had_committed && !self.selection.has_provisional() {
            self.range = None;
            return false;
        }
        if !self.selection.selected().iter().all(|k| self.allowed(k, false)) {
            return false;
        }
        self.range = None;

        let changed = self.apply(&affected, had_committed, |selection| {
            selection.clear_committed();
            selection.clear_provisional();
        });
        if changed {
            tracing::debug!(target: "horizon_select::tracker", "selection cleared");
            self.selection_cleared.emit(());
        }
        changed
    }

    // -------------------------------------------------------------------------
    // Provisional selection
    // -------------------------------------------------------------------------

    /// Replace the provisional set with `keys`, shown as selected.
    pub fn set_provisional_selection<I>(&mut self, keys: I) -> bool
    where
        I: IntoIterator<Item = K>,
    {
        self.set_provisional_selection_with(keys, Polarity::Select)
    }

    /// Replace the provisional set with `keys` under the given polarity.
    ///
    /// Stale keys are dropped. If the predicate refuses a key whose state
    /// would change, or a multi-key set is offered in single-select mode,
    /// the provisional set is cleared and false is returned. Setting the
    /// same set twice is a silent no-op.
    pub fn set_provisional_selection_with<I>(&mut self, keys: I, polarity: Polarity) -> bool
    where
        I: IntoIterator<Item = K>,
    {
        let keys: IndexSet<K> = self.live_keys(keys).into_iter().collect();

        if keys.len() > 1 && !self.is_multi_select() {
            self.absorbed(Absorbed::ModeMismatch, "set_provisional_selection");
            self.clear_provisional_selection();
            return false;
        }

        let target = polarity.target_state();
        let vetoed = keys
            .iter()
            .filter(|k| self.selection.is_committed(k) != target)
            .any(|k| !self.allowed(k, target));
        if vetoed {
            self.clear_provisional_selection();
            return false;
        }

        if self.selection.polarity() == polarity && *self.selection.provisional() == keys {
            return true;
        }

        let affected: Vec<K> = self
            .selection
            .provisional()
            .union(&keys)
            .cloned()
            .collect();
        self.apply(&affected, false, |selection| {
            selection.replace_provisional(keys, polarity);
        });
        true
    }

    /// Replace the provisional set with the items at `positions`.
    ///
    /// Both the position and the key form of the predicate are consulted;
    /// a single refusal clears the provisional set.
    pub fn set_provisional_positions<I>(&mut self, positions: I, polarity: Polarity) -> bool
    where
        I: IntoIterator<Item = Position>,
    {
        let target = polarity.target_state();
        let mut keys = Vec::new();
        for position in positions {
            let Some(key) = self.provider.key_for_position(position) else {
                self.absorbed(Absorbed::StaleReference, "set_provisional_positions");
                continue;
            };
            if self.selection.is_committed(&key) != target
                && !self.predicate.can_set_state_at_position(position, target)
            {
                tracing::debug!(
                    target: "horizon_select::tracker",
                    position,
                    reason = %Absorbed::PredicateVeto,
                    "provisional batch rejected"
                );
                self.clear_provisional_selection();
                return false;
            }
            keys.push(key);
        }
        self.set_provisional_selection_with(keys, polarity)
    }

    /// Commit the provisional set according to its polarity.
    ///
    /// The predicate is consulted again for every key. The provisional set
    /// is cleared whether or not the merge succeeds.
    pub fn merge_provisional_selection(&mut self) -> bool {
        if !self.selection.has_provisional() {
            return false;
        }
        let target = self.selection.polarity().target_state();
        let changing: Vec<K> = self
            .selection
            .provisional()
            .iter()
            .filter(|k| self.selection.is_committed(k) != target)
            .cloned()
            .collect();

        let too_many = target && !self.is_multi_select() && self.selection.len() + changing.len() > 1;
        if too_many || !changing.iter().all(|k| self.allowed(k, target)) {
            self.clear_provisional_selection();
            return false;
        }

        let affected: Vec<K> = self.selection.provisional().iter().cloned().collect();
        tracing::debug!(
            target: "horizon_select::tracker",
            count = changing.len(),
            polarity = ?self.selection.polarity(),
            "merging provisional selection"
        );
        self.apply(&affected, !changing.is_empty(), |selection| {
            selection.merge_provisional();
        });
        !changing.is_empty()
    }

    /// Discard the provisional set without touching committed selection.
    pub fn clear_provisional_selection(&mut self) -> bool {
        if !self.selection.has_provisional() {
            return false;
        }
        let affected: Vec<K> = self.selection.provisional().iter().cloned().collect();
        self.apply(&affected, false, |selection| selection.clear_provisional());
        true
    }

    // -------------------------------------------------------------------------
    // Range selection
    // -------------------------------------------------------------------------

    /// Anchor a range at `position`.
    pub fn start_range(&mut self, position: Position) -> bool {
        if self.provider.key_for_position(position).is_none() {
            self.absorbed(Absorbed::StaleReference, "start_range");
            return false;
        }
        self.range = Some(Range {
            anchor: position,
            extent: None,
        });
        true
    }

    /// Select every item between the anchor and `position`.
    ///
    /// Items covered by a previous extension of the same range but not by
    /// this one are deselected again.
    pub fn extend_range(&mut self, position: Position) -> bool {
        let Some(range) = self.range else {
            self.absorbed(Absorbed::UnexpectedEvent, "extend_range");
            return false;
        };
        if !self.is_multi_select() {
            self.absorbed(Absorbed::ModeMismatch, "extend_range");
            return false;
        }

        let new_span = Range::positions(range.anchor, position);
        let old_span = range
            .extent
            .map(|extent| Range::positions(range.anchor, extent));

        let to_select: Vec<K> = new_span
            .clone()
            .filter_map(|p| self.provider.key_for_position(p))
            .filter(|k| !self.selection.is_committed(k))
            .collect();
        let to_deselect: Vec<K> = old_span
            .into_iter()
            .flatten()
            .filter(|p| !new_span.contains(p))
            .filter_map(|p| self.provider.key_for_position(p))
            .filter(|k| self.selection.is_committed(k))
            .collect();

        let allowed = to_select.iter().all(|k| self.allowed(k, true))
            && to_deselect.iter().all(|k| self.allowed(k, false));
        if !allowed {
            return false;
        }

        self.range = Some(Range {
            anchor: range.anchor,
            extent: Some(position),
        });

        let affected: Vec<K> = to_select.iter().chain(&to_deselect).cloned().collect();
        self.apply(&affected, true, |selection| {
            for key in &to_deselect {
                selection.remove(key);
            }
            for key in &to_select {
                selection.insert(key.clone());
            }
        })
    }

    /// Drop the range anchor.
    pub fn end_range(&mut self) {
        self.range = None;
    }

    pub fn is_range_active(&self) -> bool {
        self.range.is_some()
    }

    // -------------------------------------------------------------------------
    // Persistence and content changes
    // -------------------------------------------------------------------------

    /// Record the committed selection.
    pub fn snapshot(&self) -> SelectionSnapshot<K> {
        SelectionSnapshot::from_keys(self.selection.iter().cloned().collect())
    }

    /// Replace the committed selection with a previously taken snapshot.
    ///
    /// Any provisional set and range anchor are dropped.
    pub fn restore_selection(&mut self, snapshot: SelectionSnapshot<K>) {
        self.range = None;
        let restored: IndexSet<K> = snapshot.into_keys().into_iter().collect();
        let affected: Vec<K> = self
            .selection
            .effective_keys()
            .into_iter()
            .chain(restored.iter().cloned())
            .collect();

        self.apply(&affected, true, |selection| {
            selection.clear_provisional();
            selection.clear_committed();
            for key in restored {
                selection.insert(key);
            }
        });
        tracing::debug!(
            target: "horizon_select::tracker",
            count = self.selection.len(),
            "selection restored"
        );
        self.selection_restored.emit(());
    }

    /// Reconcile with reloaded content.
    ///
    /// Keys the provider no longer resolves are dropped from both sets and
    /// the range anchor is reset, since positions may have shifted.
    pub fn on_data_changed(&mut self) {
        self.range = None;
        let stale: Vec<K> = self
            .selection
            .selected()
            .iter()
            .chain(self.selection.provisional())
            .filter(|k| self.provider.position_for_key(k).is_none())
            .cloned()
            .collect();
        if stale.is_empty() {
            return;
        }

        tracing::debug!(
            target: "horizon_select::tracker",
            count = stale.len(),
            reason = %Absorbed::StaleReference,
            "pruning keys after data change"
        );
        let provider = self.provider.clone();
        self.apply(&stale, true, |selection| {
            selection.retain(|k| provider.position_for_key(k).is_some());
        });
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn is_live(&self, key: &K, operation: &'static str) -> bool {
        let live = self.provider.position_for_key(key).is_some();
        if !live {
            tracing::debug!(
                target: "horizon_select::tracker",
                ?key,
                operation,
                reason = %Absorbed::StaleReference,
                "operation ignored"
            );
        }
        live
    }

    fn live_keys<I>(&self, keys: I) -> Vec<K>
    where
        I: IntoIterator<Item = K>,
    {
        keys.into_iter()
            .filter(|k| self.provider.position_for_key(k).is_some())
            .collect()
    }

    fn allowed(&self, key: &K, next_state: bool) -> bool {
        let allowed = self.predicate.can_set_state_for_key(key, next_state);
        if !allowed {
            tracing::debug!(
                target: "horizon_select::tracker",
                ?key,
                next_state,
                reason = %Absorbed::PredicateVeto,
                "change refused"
            );
        }
        allowed
    }

    fn absorbed(&self, reason: Absorbed, operation: &'static str) {
        tracing::debug!(target: "horizon_select::tracker", operation, %reason, "operation ignored");
    }

    /// Run `mutate` and notify observers of every effective state flip
    /// among `affected`.
    ///
    /// `committed_changed` forces a `selection_changed` even when no
    /// rendered state flipped (a merge moves keys between layers).
    fn apply<F>(&mut self, affected: &[K], committed_changed: bool, mutate: F) -> bool
    where
        F: FnOnce(&mut Selection<K>),
    {
        let before: Vec<bool> = affected.iter().map(|k| self.selection.contains(k)).collect();
        mutate(&mut self.selection);

        let mut flipped = Vec::new();
        for (key, was) in affected.iter().zip(before) {
            let now = self.selection.contains(key);
            if now != was && !flipped.iter().any(|(k, _)| k == key) {
                flipped.push((key.clone(), now));
            }
        }

        if flipped.is_empty() && !committed_changed {
            return false;
        }

        self.generation += 1;
        tracing::trace!(
            target: "horizon_select::tracker",
            flipped = flipped.len(),
            selected = self.selection.len(),
            provisional = self.selection.provisional().len(),
            "selection updated"
        );
        for change in flipped {
            self.item_state_changed.emit(change);
        }
        self.selection_changed.emit(());
        true
    }
}

impl<K: ItemKey> std::fmt::Debug for SelectionTracker<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionTracker")
            .field("selection", &self.selection)
            .field("mode", &self.mode)
            .field("range", &self.range)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(SelectionTracker<u64>: Send, Sync);
