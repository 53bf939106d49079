//! Where a band may start, and which items it may pick up.

use horizon_select_core::Rect;

use crate::input::PointerEvent;
use crate::model::{ItemDetails, ItemKey, Position};

/// Host policy for band selection.
pub trait BandPredicate<K: ItemKey>: Send + Sync {
    /// May a band start at this press? `details` is the item under the
    /// pointer, if any.
    fn can_initiate(&self, event: &PointerEvent, details: Option<&ItemDetails<K>>) -> bool;

    /// May the item at `position`, occupying `rect` in content
    /// coordinates, be picked up by the band?
    fn accepts(&self, _position: Position, _rect: &Rect) -> bool {
        true
    }
}

/// Bands start only over empty space.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyArea;

impl<K: ItemKey> BandPredicate<K> for EmptyArea {
    fn can_initiate(&self, _event: &PointerEvent, details: Option<&ItemDetails<K>>) -> bool {
        details.is_none()
    }
}

/// Bands start anywhere except the drag region of an item.
///
/// Suits layouts without gaps between items, where empty space is rare.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonDraggableArea;

impl<K: ItemKey> BandPredicate<K> for NonDraggableArea {
    fn can_initiate(&self, event: &PointerEvent, details: Option<&ItemDetails<K>>) -> bool {
        details.is_none_or(|d| !d.in_drag_region(event.position))
    }
}
