//! The view the engine is attached to.

use horizon_select_core::{Point, Rect};

use crate::model::{ItemDetailsLookup, ItemKey, Position};

/// Layout and scrolling services provided by the host list or grid view.
///
/// All rects are in viewport coordinates: `(0, 0)` is the top-left corner
/// of the visible area, independent of scroll position.
pub trait HostView {
    /// Total number of items in the current content generation.
    fn item_count(&self) -> usize;

    /// Rects of the items currently laid out (visible or nearly so).
    fn visible_item_rects(&self) -> Vec<(Position, Rect)>;

    /// Bounds of the visible area.
    fn viewport(&self) -> Rect;

    /// How far the content is scrolled.
    ///
    /// Content coordinates are viewport coordinates plus this offset.
    fn scroll_offset(&self) -> Point;

    /// Scroll by the given amount. The host may clamp at either end.
    fn scroll_by(&mut self, dx: f32, dy: f32);

    /// Request a redraw because effective selection changed.
    fn invalidate(&mut self);
}

/// Everything the engine needs from the host in one object.
///
/// Implemented automatically for any type providing both [`HostView`] and
/// [`ItemDetailsLookup`].
pub trait SelectionHost<K: ItemKey>: HostView + ItemDetailsLookup<K> {}

impl<K, T> SelectionHost<K> for T
where
    K: ItemKey,
    T: HostView + ItemDetailsLookup<K> + ?Sized,
{
}
