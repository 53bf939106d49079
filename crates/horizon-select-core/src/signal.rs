//! Signal/slot observers for Horizon Select.
//!
//! Selection state changes are published through [`Signal`]s. Observers
//! (slots) are plain closures; connecting returns a [`ConnectionId`] for
//! manual disconnection, or a [`ConnectionGuard`] that disconnects when
//! dropped so that view teardown is deterministic.
//!
//! All slots run synchronously on the emitting thread. The engine is
//! single-threaded, so there is no queued or cross-thread delivery.
//!
//! # Example
//!
//! ```
//! use horizon_select_core::Signal;
//!
//! let item_changed = Signal::<(u64, bool)>::new();
//!
//! let guard = item_changed.connect_scoped(|(key, selected)| {
//!     println!("item {key} selected={selected}");
//! });
//!
//! item_changed.emit((7, true));
//! drop(guard); // observer removed
//! assert_eq!(item_changed.connection_count(), 0);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::SignalError;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;
type SlotTable<Args> = Mutex<SlotMap<ConnectionId, Slot<Args>>>;

/// A type-safe signal that can have multiple connected slots.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no arguments, or a tuple for multiple arguments.
pub struct Signal<Args> {
    /// All active connections, shared with outstanding guards.
    connections: Arc<SlotTable<Args>>,
    /// Whether signal emission is temporarily blocked.
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Arc::new(Mutex::new(SlotMap::with_key())),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Connect a slot that is disconnected when the returned guard is dropped.
    ///
    /// The guard only holds a weak reference to the signal, so it is safe to
    /// drop it after the signal itself is gone.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        let weak: Weak<SlotTable<Args>> = Arc::downgrade(&self.connections);
        ConnectionGuard {
            id,
            disconnect: Some(Box::new(move |id| {
                weak.upgrade()
                    .map(|table| table.lock().remove(id).is_some())
                    .unwrap_or(false)
            })),
        }
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect a slot, reporting a missing connection as an error.
    pub fn try_disconnect(&self, id: ConnectionId) -> Result<(), SignalError> {
        if self.disconnect(id) {
            Ok(())
        } else {
            Err(SignalError::InvalidConnection)
        }
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots in connection order.
    ///
    /// The slot table is snapshotted before invocation, so slots may connect
    /// or disconnect (including themselves) without deadlocking.
    #[tracing::instrument(skip_all, target = "horizon_select_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: "horizon_select_core::signal", "signal blocked, skipping emit");
            return;
        }

        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(target: "horizon_select_core::signal", connection_count = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }
}

/// A connection guard that automatically disconnects when dropped.
///
/// Created via [`Signal::connect_scoped`]. Call [`ConnectionGuard::forget`]
/// to keep the connection alive for the lifetime of the signal.
pub struct ConnectionGuard {
    id: ConnectionId,
    disconnect: Option<Box<dyn FnOnce(ConnectionId) -> bool + Send + Sync>>,
}

impl ConnectionGuard {
    /// The connection this guard owns.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Disconnect now instead of on drop.
    ///
    /// Returns `true` if the slot was still connected.
    pub fn disconnect(mut self) -> bool {
        self.disconnect.take().is_some_and(|f| f(self.id))
    }

    /// Release the guard without disconnecting the slot.
    pub fn forget(mut self) -> ConnectionId {
        self.disconnect = None;
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            disconnect(self.id);
        }
    }
}

impl std::fmt::Debug for ConnectionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionGuard")
            .field("id", &self.id)
            .field("armed", &self.disconnect.is_some())
            .finish()
    }
}

static_assertions::assert_impl_all!(Signal<(u64, bool)>: Send, Sync);
static_assertions::assert_impl_all!(ConnectionGuard: Send, Sync);
