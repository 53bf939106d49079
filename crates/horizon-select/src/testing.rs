//! In-crate fake host used by unit tests.

use horizon_select_core::{Point, Rect};

use crate::host::HostView;
use crate::model::{ItemDetails, ItemDetailsLookup, Position};

/// A scrollable uniform grid whose item keys equal their positions.
///
/// The viewport may be wider than `columns * cell_w`; the extra space on
/// the right is empty.
#[derive(Debug)]
pub(crate) struct GridHost {
    pub items: usize,
    pub columns: usize,
    pub cell_w: f32,
    pub cell_h: f32,
    pub viewport: Rect,
    pub scroll: Point,
    pub invalidations: usize,
}

impl GridHost {
    pub fn new(items: usize, columns: usize, cell_w: f32, cell_h: f32, view_w: f32, view_h: f32) -> Self {
        Self {
            items,
            columns,
            cell_w,
            cell_h,
            viewport: Rect::new(0.0, 0.0, view_w, view_h),
            scroll: Point::ZERO,
            invalidations: 0,
        }
    }

    fn content_rect(&self, position: Position) -> Rect {
        let col = (position % self.columns) as f32;
        let row = (position / self.columns) as f32;
        Rect::new(col * self.cell_w, row * self.cell_h, self.cell_w, self.cell_h)
    }

    fn max_scroll(&self) -> f32 {
        let rows = self.items.div_ceil(self.columns) as f32;
        (rows * self.cell_h - self.viewport.height()).max(0.0)
    }
}

impl HostView for GridHost {
    fn item_count(&self) -> usize {
        self.items
    }

    fn visible_item_rects(&self) -> Vec<(Position, Rect)> {
        let visible = self.viewport.translate(self.scroll);
        (0..self.items)
            .map(|p| (p, self.content_rect(p)))
            .filter(|(_, r)| r.intersects(&visible))
            .map(|(p, r)| (p, r.translate(Point::ZERO - self.scroll)))
            .collect()
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }

    fn scroll_offset(&self) -> Point {
        self.scroll
    }

    fn scroll_by(&mut self, _dx: f32, dy: f32) {
        self.scroll.y = (self.scroll.y + dy).clamp(0.0, self.max_scroll());
    }

    fn invalidate(&mut self) {
        self.invalidations += 1;
    }
}

impl ItemDetailsLookup<u64> for GridHost {
    fn details_at(&self, point: Point) -> Option<ItemDetails<u64>> {
        let content = point + self.scroll;
        if content.x < 0.0 || content.y < 0.0 {
            return None;
        }
        let col = (content.x / self.cell_w) as usize;
        let row = (content.y / self.cell_h) as usize;
        if col >= self.columns {
            return None;
        }
        let position = row * self.columns + col;
        (position < self.items).then(|| ItemDetails::new(position, position as u64))
    }
}
