//! Hit testing: what item, if any, lies under a point.

use horizon_select_core::{Point, Rect};

use super::key::{ItemKey, Position};

/// Hit-test result for a single item.
///
/// Regions are in the same (viewport) coordinates as pointer events.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDetails<K> {
    /// Layout position of the item.
    pub position: Position,
    /// Stable key of the item.
    pub key: K,
    /// Host-defined item kind (header, card, ...).
    pub view_type: u32,
    /// Sub-region that starts a drag when pressed on a selected item.
    pub drag_region: Option<Rect>,
    /// Sub-region (e.g. a checkbox) where a tap selects instead of activating.
    pub selection_hotspot: Option<Rect>,
}

impl<K> ItemDetails<K> {
    /// Details with no special regions.
    pub fn new(position: Position, key: K) -> Self {
        Self {
            position,
            key,
            view_type: 0,
            drag_region: None,
            selection_hotspot: None,
        }
    }

    /// Set the host-defined view type.
    pub fn with_view_type(mut self, view_type: u32) -> Self {
        self.view_type = view_type;
        self
    }

    /// Set the drag region.
    pub fn with_drag_region(mut self, region: Rect) -> Self {
        self.drag_region = Some(region);
        self
    }

    /// Set the selection hotspot.
    pub fn with_selection_hotspot(mut self, region: Rect) -> Self {
        self.selection_hotspot = Some(region);
        self
    }

    /// Returns true if `point` falls inside the drag region.
    pub fn in_drag_region(&self, point: Point) -> bool {
        self.drag_region.is_some_and(|r| r.contains(point))
    }

    /// Returns true if `point` falls inside the selection hotspot.
    pub fn in_selection_hotspot(&self, point: Point) -> bool {
        self.selection_hotspot.is_some_and(|r| r.contains(point))
    }
}

/// Resolves a viewport point to the item under it.
///
/// Returning `None` means the point is over empty space (padding, gaps or
/// past the last item), which is where band selection may begin.
pub trait ItemDetailsLookup<K: ItemKey> {
    fn details_at(&self, point: Point) -> Option<ItemDetails<K>>;

    /// Returns true if some item lies under `point`.
    fn over_item(&self, point: Point) -> bool {
        self.details_at(point).is_some()
    }
}
