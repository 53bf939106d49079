//! Grid geometry inference for band selection.
//!
//! A virtualized view only lays out what is on screen, but a band may
//! cover items that have scrolled away (or never appeared). [`GridModel`]
//! accumulates the rects it has seen during one gesture, infers a uniform
//! grid from them, and extrapolates rects for everything else.
//!
//! Layouts whose observed rects do not fit a single uniform grid (mixed
//! spans, variable heights) are treated as irregular: only observed rects
//! are ever tested against the band.

use std::collections::BTreeMap;

use horizon_select_core::{Point, Rect, Size};

use crate::host::HostView;
use crate::model::Position;

/// Maximum disagreement, in pixels, between an observed rect and the grid.
pub const GRID_TOLERANCE: f32 = 0.5;

/// A uniform grid in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub columns: usize,
    /// Top-left corner of the cell at position 0.
    pub origin: Point,
    /// Distance between adjacent column and row origins.
    pub pitch: Size,
    /// Size of one item.
    pub cell: Size,
}

impl GridGeometry {
    /// Extrapolated rect of the item at `position`.
    pub fn rect_for(&self, position: Position) -> Rect {
        let column = (position % self.columns) as f32;
        let row = (position / self.columns) as f32;
        Rect::new(
            self.origin.x + column * self.pitch.width,
            self.origin.y + row * self.pitch.height,
            self.cell.width,
            self.cell.height,
        )
    }
}

/// What the model currently knows about the layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridLayout {
    /// Nothing has been observed.
    Unavailable,
    /// Every observed rect fits this grid.
    Uniform(GridGeometry),
    /// Observed rects do not fit a uniform grid.
    Irregular,
}

/// Accumulated item geometry for the duration of one band gesture.
#[derive(Debug, Clone)]
pub struct GridModel {
    entries: BTreeMap<Position, Rect>,
    item_count: usize,
    layout: GridLayout,
}

impl Default for GridModel {
    fn default() -> Self {
        Self::new()
    }
}

impl GridModel {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            item_count: 0,
            layout: GridLayout::Unavailable,
        }
    }

    /// Forget everything observed so far.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.item_count = 0;
        self.layout = GridLayout::Unavailable;
    }

    /// Sample the host's laid-out items.
    #[tracing::instrument(skip_all, target = "horizon_select::grid", level = "trace")]
    pub fn observe<H: HostView + ?Sized>(&mut self, host: &H) {
        let offset = host.scroll_offset();
        let rects = host
            .visible_item_rects()
            .into_iter()
            .map(|(position, rect)| (position, rect.translate(offset)));
        self.record(host.item_count(), rects);
    }

    /// Merge rects already in content coordinates and re-infer the layout.
    pub fn record<I>(&mut self, item_count: usize, rects: I)
    where
        I: IntoIterator<Item = (Position, Rect)>,
    {
        self.item_count = item_count;
        self.entries.retain(|&p, _| p < item_count);
        for (position, rect) in rects {
            if position < item_count && !rect.is_empty() {
                self.entries.insert(position, rect);
            }
        }

        let layout = self.infer();
        if layout != self.layout {
            tracing::debug!(target: "horizon_select::grid", ?layout, entries = self.entries.len(), "layout inferred");
        }
        self.layout = layout;
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Number of distinct positions observed.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Rect of `position`: observed if seen, otherwise extrapolated.
    pub fn rect_for(&self, position: Position) -> Option<Rect> {
        if position >= self.item_count {
            return None;
        }
        if let Some(rect) = self.entries.get(&position) {
            return Some(*rect);
        }
        match self.layout {
            GridLayout::Uniform(geometry) => Some(geometry.rect_for(position)),
            GridLayout::Irregular | GridLayout::Unavailable => None,
        }
    }

    /// Positions whose rect overlaps `band` by any area and pass `filter`,
    /// in ascending order.
    pub fn positions_intersecting<F>(&self, band: &Rect, mut filter: F) -> Vec<Position>
    where
        F: FnMut(Position, &Rect) -> bool,
    {
        match self.layout {
            GridLayout::Unavailable => Vec::new(),
            GridLayout::Irregular => self
                .entries
                .iter()
                .filter(|(p, r)| r.intersects(band) && filter(**p, r))
                .map(|(p, _)| *p)
                .collect(),
            GridLayout::Uniform(geometry) => self.uniform_hits(&geometry, band, filter),
        }
    }

    fn uniform_hits<F>(&self, grid: &GridGeometry, band: &Rect, mut filter: F) -> Vec<Position>
    where
        F: FnMut(Position, &Rect) -> bool,
    {
        let mut hits = Vec::new();
        if self.item_count == 0 || band.is_empty() {
            return hits;
        }
        let rows = self.item_count.div_ceil(grid.columns);

        let Some((first_row, last_row)) = span(
            band.top(),
            band.bottom(),
            grid.origin.y,
            grid.pitch.height,
            grid.cell.height,
            rows,
        ) else {
            return hits;
        };
        let Some((first_col, last_col)) = span(
            band.left(),
            band.right(),
            grid.origin.x,
            grid.pitch.width,
            grid.cell.width,
            grid.columns,
        ) else {
            return hits;
        };

        for row in first_row..=last_row {
            for col in first_col..=last_col {
                let position = row * grid.columns + col;
                if position >= self.item_count {
                    break;
                }
                let rect = self
                    .entries
                    .get(&position)
                    .copied()
                    .unwrap_or_else(|| grid.rect_for(position));
                if rect.intersects(band) && filter(position, &rect) {
                    hits.push(position);
                }
            }
        }
        hits
    }

    fn infer(&self) -> GridLayout {
        let Some((&first_position, &first_rect)) = self.entries.first_key_value() else {
            return GridLayout::Unavailable;
        };

        // Columns come from the widest observed row. A last row that does
        // not also hold position 0 may be short and never counts.
        let ys = distinct(self.entries.values().map(Rect::top));
        let last_position = self.item_count.saturating_sub(1);
        let mut xs: Vec<f32> = Vec::new();
        let mut saw_complete_row = false;
        for &top in &ys {
            let row: Vec<(Position, Rect)> = self
                .entries
                .iter()
                .filter(|(_, r)| (r.top() - top).abs() <= GRID_TOLERANCE)
                .map(|(p, r)| (*p, *r))
                .collect();
            let holds_last = row.iter().any(|(p, _)| *p == last_position);
            let holds_first = row.iter().any(|(p, _)| *p == 0);
            if holds_last && !holds_first {
                continue;
            }
            saw_complete_row = true;
            let row_xs = distinct(row.iter().map(|(_, r)| r.left()));
            if row_xs.len() > xs.len() {
                xs = row_xs;
            }
        }
        if !saw_complete_row {
            tracing::debug!(target: "horizon_select::grid", "only a short last row observed, column count unknown");
            return GridLayout::Irregular;
        }

        let columns = xs.len().max(1);
        let cell = first_rect.size;
        let pitch = Size::new(
            if xs.len() > 1 { xs[1] - xs[0] } else { cell.width },
            if ys.len() > 1 { ys[1] - ys[0] } else { cell.height },
        );
        if pitch.width <= GRID_TOLERANCE || pitch.height <= GRID_TOLERANCE {
            return GridLayout::Irregular;
        }

        let first_col = (first_position % columns) as f32;
        let first_row = (first_position / columns) as f32;
        let geometry = GridGeometry {
            columns,
            origin: Point::new(
                first_rect.left() - first_col * pitch.width,
                first_rect.top() - first_row * pitch.height,
            ),
            pitch,
            cell,
        };

        let mismatch = self
            .entries
            .iter()
            .find(|(p, r)| !geometry.rect_for(**p).approx_eq(r, GRID_TOLERANCE));
        if let Some((position, rect)) = mismatch {
            tracing::debug!(
                target: "horizon_select::grid",
                position,
                ?rect,
                expected = ?geometry.rect_for(*position),
                "layout is not a uniform grid"
            );
            return GridLayout::Irregular;
        }
        GridLayout::Uniform(geometry)
    }
}

/// Sorted values with near-duplicates merged.
fn distinct(values: impl Iterator<Item = f32>) -> Vec<f32> {
    let mut values: Vec<f32> = values.collect();
    values.sort_by(f32::total_cmp);
    values.dedup_by(|a, b| (*a - *b).abs() <= GRID_TOLERANCE);
    values
}

/// Inclusive index range of cells along one axis that may overlap
/// `[lo, hi)`, clamped to `0..count`.
fn span(lo: f32, hi: f32, origin: f32, pitch: f32, extent: f32, count: usize) -> Option<(usize, usize)> {
    let last = ((hi - origin) / pitch).floor();
    if last < 0.0 || count == 0 {
        return None;
    }
    let first = ((lo - origin - extent) / pitch).floor().max(0.0) as usize;
    let last = (last as usize).min(count - 1);
    (first <= last).then_some((first, last))
}
