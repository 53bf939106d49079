//! Stable item identity and the position mapping.
//!
//! A [`Position`] is an index into the list as it is laid out right now and
//! becomes meaningless when content reloads. Selection is therefore stored
//! by stable key, and a [`StableIdProvider`] translates between the two.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use parking_lot::RwLock;

/// Transient index into the currently laid-out sequence.
pub type Position = usize;

/// Durable identity of a list item.
///
/// Implemented for every type that is cheap to clone, hashable and
/// shareable, e.g. `u64` database ids or `String` document ids.
pub trait ItemKey: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> ItemKey for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

/// Maps positions to stable keys and back for the current content generation.
///
/// Both lookups return `None` for references that are no longer valid; the
/// engine treats that as a stale reference and silently skips the item.
pub trait StableIdProvider<K: ItemKey>: Send + Sync {
    /// The key of the item currently laid out at `position`.
    fn key_for_position(&self, position: Position) -> Option<K>;

    /// The current position of the item identified by `key`.
    fn position_for_key(&self, key: &K) -> Option<Position>;
}

/// A [`StableIdProvider`] backed by a position-ordered key list.
///
/// Hosts call [`ListKeyProvider::set_keys`] after every content reload.
#[derive(Debug, Default)]
pub struct ListKeyProvider<K: ItemKey> {
    inner: RwLock<KeyTable<K>>,
}

#[derive(Debug)]
struct KeyTable<K> {
    keys: Vec<K>,
    positions: HashMap<K, Position>,
}

impl<K> Default for KeyTable<K> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<K: ItemKey> ListKeyProvider<K> {
    /// Creates a provider for the given position-ordered keys.
    pub fn new(keys: Vec<K>) -> Self {
        let provider = Self {
            inner: RwLock::new(KeyTable::default()),
        };
        provider.set_keys(keys);
        provider
    }

    /// Replaces the key list, e.g. after the adapter reloaded its content.
    ///
    /// Duplicate keys keep their first position.
    pub fn set_keys(&self, keys: Vec<K>) {
        let mut positions = HashMap::with_capacity(keys.len());
        for (position, key) in keys.iter().enumerate() {
            positions.entry(key.clone()).or_insert(position);
        }
        *self.inner.write() = KeyTable { keys, positions };
    }

    /// Number of keys in the current generation.
    pub fn len(&self) -> usize {
        self.inner.read().keys.len()
    }

    /// Returns true if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.inner.read().keys.is_empty()
    }
}

impl<K: ItemKey> StableIdProvider<K> for ListKeyProvider<K> {
    fn key_for_position(&self, position: Position) -> Option<K> {
        self.inner.read().keys.get(position).cloned()
    }

    fn position_for_key(&self, key: &K) -> Option<Position> {
        self.inner.read().positions.get(key).copied()
    }
}
