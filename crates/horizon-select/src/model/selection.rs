//! The selection set: committed keys plus an in-progress provisional layer.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::key::ItemKey;
use crate::error::SnapshotError;

/// How a provisional set combines with the committed selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Polarity {
    /// Provisional keys are shown (and will be committed) as selected.
    #[default]
    Select,
    /// Provisional keys are shown (and will be committed) as deselected.
    Deselect,
}

impl Polarity {
    /// The selection state a key takes on under this polarity.
    pub fn target_state(self) -> bool {
        matches!(self, Polarity::Select)
    }
}

/// Committed and provisional selection state.
///
/// Both sets keep insertion order. The provisional set never leaks into
/// `selected` except through an explicit merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<K: ItemKey> {
    selected: IndexSet<K>,
    provisional: IndexSet<K>,
    polarity: Polarity,
}

impl<K: ItemKey> Default for Selection<K> {
    fn default() -> Self {
        Self {
            selected: IndexSet::new(),
            provisional: IndexSet::new(),
            polarity: Polarity::Select,
        }
    }
}

impl<K: ItemKey> Selection<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed keys, in selection order.
    pub fn selected(&self) -> &IndexSet<K> {
        &self.selected
    }

    /// In-progress keys, in discovery order.
    pub fn provisional(&self) -> &IndexSet<K> {
        &self.provisional
    }

    /// Polarity of the provisional set.
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Effective state of `key`, as it should be rendered right now.
    pub fn contains(&self, key: &K) -> bool {
        match self.polarity {
            Polarity::Select => self.selected.contains(key) || self.provisional.contains(key),
            Polarity::Deselect => self.selected.contains(key) && !self.provisional.contains(key),
        }
    }

    /// Committed state of `key`, ignoring the provisional layer.
    pub fn is_committed(&self, key: &K) -> bool {
        self.selected.contains(key)
    }

    /// Number of committed keys.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns true if nothing is effectively selected.
    pub fn is_empty(&self) -> bool {
        match self.polarity {
            Polarity::Select => self.selected.is_empty() && self.provisional.is_empty(),
            Polarity::Deselect => self.selected.iter().all(|k| self.provisional.contains(k)),
        }
    }

    /// Returns true if a provisional set is pending.
    pub fn has_provisional(&self) -> bool {
        !self.provisional.is_empty()
    }

    /// Iterate over committed keys in selection order.
    pub fn iter(&self) -> indexmap::set::Iter<'_, K> {
        self.selected.iter()
    }

    /// Effectively selected keys: committed first, then provisional additions.
    pub fn effective_keys(&self) -> Vec<K> {
        match self.polarity {
            Polarity::Select => self.selected.union(&self.provisional).cloned().collect(),
            Polarity::Deselect => self.selected.difference(&self.provisional).cloned().collect(),
        }
    }

    pub(crate) fn insert(&mut self, key: K) -> bool {
        self.selected.insert(key)
    }

    pub(crate) fn remove(&mut self, key: &K) -> bool {
        self.selected.shift_remove(key)
    }

    pub(crate) fn clear_committed(&mut self) {
        self.selected.clear();
    }

    /// Replace the provisional layer wholesale.
    pub(crate) fn replace_provisional(&mut self, keys: IndexSet<K>, polarity: Polarity) {
        self.provisional = keys;
        self.polarity = polarity;
    }

    /// Fold the provisional layer into `selected` according to its polarity.
    pub(crate) fn merge_provisional(&mut self) {
        let provisional = std::mem::take(&mut self.provisional);
        match self.polarity {
            Polarity::Select => self.selected.extend(provisional),
            Polarity::Deselect => self.selected.retain(|k| !provisional.contains(k)),
        }
        self.polarity = Polarity::Select;
    }

    pub(crate) fn clear_provisional(&mut self) {
        self.provisional.clear();
        self.polarity = Polarity::Select;
    }

    /// Drop every key (committed or provisional) that fails `keep`.
    ///
    /// Returns the removed keys.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&K) -> bool) -> Vec<K> {
        let mut removed = Vec::new();
        self.selected.retain(|k| {
            let live = keep(k);
            if !live {
                removed.push(k.clone());
            }
            live
        });
        self.provisional.retain(|k| keep(k));
        removed
    }
}

/// Opaque, restorable record of the committed selection.
///
/// Provisional state is never captured.
///
/// ```
/// use horizon_select::model::SelectionSnapshot;
///
/// let snapshot = SelectionSnapshot::from_keys(vec![3u64, 1]);
/// let json = snapshot.to_json().unwrap();
/// assert_eq!(SelectionSnapshot::<u64>::from_json(&json).unwrap(), snapshot);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSnapshot<K> {
    keys: Vec<K>,
}

impl<K> SelectionSnapshot<K> {
    /// Snapshot of the given keys, in order.
    pub fn from_keys(keys: Vec<K>) -> Self {
        Self { keys }
    }

    /// The recorded keys, in selection order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn into_keys(self) -> Vec<K> {
        self.keys
    }
}

impl<K: Serialize> SelectionSnapshot<K> {
    /// Encode the snapshot as a JSON array.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(SnapshotError::Encode)
    }
}

impl<K: for<'de> Deserialize<'de>> SelectionSnapshot<K> {
    /// Decode a snapshot previously produced by [`SelectionSnapshot::to_json`].
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(SnapshotError::Decode)
    }
}
