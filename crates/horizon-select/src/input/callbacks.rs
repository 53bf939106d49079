//! Hooks through which input handlers reach back into the application.

use horizon_select_core::{ConnectionGuard, Point, Signal};

use crate::model::{ItemDetails, ItemKey};

/// Application hooks invoked by the touch and mouse handlers.
///
/// Every method has a no-op default. Methods returning `bool` report
/// whether the application handled the request.
pub trait InputCallbacks<K: ItemKey>: Send {
    /// The user activated an item (tap with nothing selected, or a double
    /// tap/click).
    fn on_item_activated(&mut self, _item: &ItemDetails<K>) -> bool {
        false
    }

    /// Secondary click. `item` is `None` over empty space.
    fn on_context_click(&mut self, _item: Option<&ItemDetails<K>>, _position: Point) -> bool {
        false
    }

    /// A drag started from the drag region of a selected item.
    fn on_drag_initiated(&mut self, _item: &ItemDetails<K>, _position: Point) -> bool {
        false
    }

    fn perform_haptic_feedback(&mut self) {}

    /// A touch drag was released at speed. Velocity is in px/s.
    fn on_fling(&mut self, _velocity: Point) -> bool {
        false
    }
}

/// Callbacks that ignore everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCallbacks;

impl<K: ItemKey> InputCallbacks<K> for NoopCallbacks {}

/// Callbacks that forward to signals.
///
/// Useful when several parts of an application want to observe input
/// outcomes. Requests are reported as handled when at least one slot is
/// connected.
pub struct SignalCallbacks<K: ItemKey> {
    pub item_activated: Signal<ItemDetails<K>>,
    pub context_click: Signal<(Option<ItemDetails<K>>, Point)>,
    pub drag_initiated: Signal<(ItemDetails<K>, Point)>,
    pub haptic_feedback: Signal<()>,
    pub fling: Signal<Point>,
}

impl<K: ItemKey> Default for SignalCallbacks<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ItemKey> SignalCallbacks<K> {
    pub fn new() -> Self {
        Self {
            item_activated: Signal::new(),
            context_click: Signal::new(),
            drag_initiated: Signal::new(),
            haptic_feedback: Signal::new(),
            fling: Signal::new(),
        }
    }

    pub fn on_activated<F>(&self, slot: F) -> ConnectionGuard
    where
        F: Fn(&ItemDetails<K>) + Send + Sync + 'static,
    {
        self.item_activated.connect_scoped(slot)
    }
}

impl<K: ItemKey> InputCallbacks<K> for SignalCallbacks<K> {
    fn on_item_activated(&mut self, item: &ItemDetails<K>) -> bool {
        self.item_activated.emit(item.clone());
        self.item_activated.connection_count() > 0
    }

    fn on_context_click(&mut self, item: Option<&ItemDetails<K>>, position: Point) -> bool {
        self.context_click.emit((item.cloned(), position));
        self.context_click.connection_count() > 0
    }

    fn on_drag_initiated(&mut self, item: &ItemDetails<K>, position: Point) -> bool {
        self.drag_initiated.emit((item.clone(), position));
        self.drag_initiated.connection_count() > 0
    }

    fn perform_haptic_feedback(&mut self) {
        self.haptic_feedback.emit(());
    }

    fn on_fling(&mut self, velocity: Point) -> bool {
        self.fling.emit(velocity);
        self.fling.connection_count() > 0
    }
}

impl<K: ItemKey> std::fmt::Debug for SignalCallbacks<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalCallbacks").finish_non_exhaustive()
    }
}
