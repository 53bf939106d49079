//! Selection predicates: the host's veto over state changes.

use std::fmt;

use super::key::{ItemKey, Position};

/// Decides whether an item may change selection state.
///
/// Consulted before every mutation. Batches are all-or-nothing: a single
/// refusal rejects the whole batch.
pub trait SelectionPredicate<K: ItemKey>: Send + Sync {
    /// May the item identified by `key` become `next_state`?
    fn can_set_state_for_key(&self, key: &K, next_state: bool) -> bool;

    /// May the item at `position` become `next_state`?
    ///
    /// Used by band selection, which discovers candidates by position.
    fn can_set_state_at_position(&self, position: Position, next_state: bool) -> bool;

    /// Whether more than one item may be selected at once.
    fn can_select_multiple(&self) -> bool;
}

/// Allows every change; multiple selection enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectAnything;

impl<K: ItemKey> SelectionPredicate<K> for SelectAnything {
    fn can_set_state_for_key(&self, _key: &K, _next_state: bool) -> bool {
        true
    }

    fn can_set_state_at_position(&self, _position: Position, _next_state: bool) -> bool {
        true
    }

    fn can_select_multiple(&self) -> bool {
        true
    }
}

/// Allows every change; at most one item selected.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectSingleAnything;

impl<K: ItemKey> SelectionPredicate<K> for SelectSingleAnything {
    fn can_set_state_for_key(&self, _key: &K, _next_state: bool) -> bool {
        true
    }

    fn can_set_state_at_position(&self, _position: Position, _next_state: bool) -> bool {
        true
    }

    fn can_select_multiple(&self) -> bool {
        false
    }
}

/// Shorthand for [`SelectAnything`].
pub fn select_anything() -> SelectAnything {
    SelectAnything
}

/// Shorthand for [`SelectSingleAnything`].
pub fn select_single_anything() -> SelectSingleAnything {
    SelectSingleAnything
}

/// Adapts a key closure into a [`SelectionPredicate`].
///
/// Position checks always pass; the key check runs once the position has
/// been resolved to a key.
///
/// ```
/// use horizon_select::model::{PredicateFn, SelectionPredicate};
///
/// // Odd keys are locked.
/// let predicate = PredicateFn::new(|key: &u64, _next| key % 2 == 0);
/// assert!(predicate.can_set_state_for_key(&4, true));
/// assert!(!predicate.can_set_state_for_key(&5, true));
/// ```
pub struct PredicateFn<F> {
    check: F,
    multiple: bool,
}

impl<F> PredicateFn<F> {
    pub fn new(check: F) -> Self {
        Self {
            check,
            multiple: true,
        }
    }

    /// Restrict to single selection.
    pub fn single(mut self) -> Self {
        self.multiple = false;
        self
    }
}

impl<F> fmt::Debug for PredicateFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateFn")
            .field("multiple", &self.multiple)
            .finish_non_exhaustive()
    }
}

impl<K, F> SelectionPredicate<K> for PredicateFn<F>
where
    K: ItemKey,
    F: Fn(&K, bool) -> bool + Send + Sync,
{
    fn can_set_state_for_key(&self, key: &K, next_state: bool) -> bool {
        (self.check)(key, next_state)
    }

    fn can_set_state_at_position(&self, _position: Position, _next_state: bool) -> bool {
        true
    }

    fn can_select_multiple(&self) -> bool {
        self.multiple
    }
}
