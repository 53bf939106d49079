//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use horizon_select::prelude::*;

/// A scrollable uniform grid whose item keys equal their positions.
///
/// Only items intersecting the viewport are "laid out", like a recycler
/// view. The viewport may be wider than the grid; the strip on the right is
/// empty space.
#[derive(Debug)]
pub struct FakeGridHost {
    pub items: usize,
    pub columns: usize,
    pub cell: Size,
    pub viewport: Rect,
    pub scroll: Point,
    pub invalidations: usize,
    /// Size of a drag handle in the top-left corner of every item.
    pub drag_handle: Option<Size>,
}

impl FakeGridHost {
    pub fn new(items: usize, columns: usize, cell: Size, viewport: Size) -> Self {
        Self {
            items,
            columns,
            cell,
            viewport: Rect::new(0.0, 0.0, viewport.width, viewport.height),
            scroll: Point::ZERO,
            invalidations: 0,
            drag_handle: None,
        }
    }

    /// Four 100x50 columns, ten rows visible, plus a 200 px empty gutter.
    pub fn standard(items: usize) -> Self {
        Self::new(items, 4, Size::new(100.0, 50.0), Size::new(600.0, 500.0))
    }

    fn content_rect(&self, position: Position) -> Rect {
        let col = (position % self.columns) as f32;
        let row = (position / self.columns) as f32;
        Rect::new(col * self.cell.width, row * self.cell.height, self.cell.width, self.cell.height)
    }

    fn max_scroll(&self) -> f32 {
        let rows = self.items.div_ceil(self.columns) as f32;
        (rows * self.cell.height - self.viewport.height()).max(0.0)
    }

    /// Viewport point at the centre of `position`.
    pub fn center_of(&self, position: Position) -> Point {
        let r = self.content_rect(position);
        Point::new(r.left() + r.width() / 2.0, r.top() + r.height() / 2.0) - self.scroll
    }
}

impl HostView for FakeGridHost {
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

impl ItemDetailsLookup<u64> for FakeGridHost {
    fn details_at(&self, point: Point) -> Option<ItemDetails<u64>> {
        let content = point + self.scroll;
        if content.x < 0.0 || content.y < 0.0 {
            return None;
        }
        let col = (content.x / self.cell.width) as usize;
        let row = (content.y / self.cell.height) as usize;
        if col >= self.columns {
            return None;
        }
        let position = row * self.columns + col;
        if position >= self.items {
            return None;
        }
        let details = ItemDetails::new(position, position as u64);
        Some(match self.drag_handle {
            Some(handle) => {
                let corner = self.content_rect(position).origin - self.scroll;
                details.with_drag_region(Rect::new(corner.x, corner.y, handle.width, handle.height))
            }
            None => details,
        })
    }
}

/// What the engine asked the application to do.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Recorded {
    pub activated: Vec<u64>,
    pub context_clicks: Vec<Option<u64>>,
    pub drags: Vec<u64>,
    pub haptics: usize,
    pub flings: usize,
}

/// Callbacks that record into a shared log.
#[derive(Debug, Clone, Default)]
pub struct RecordingCallbacks(pub Arc<Mutex<Recorded>>);

impl InputCallbacks<u64> for RecordingCallbacks {
    fn on_item_activated(&mut self, item: &ItemDetails<u64>) -> bool {
        self.0.lock().activated.push(item.key);
        true
    }

    fn on_context_click(&mut self, item: Option<&ItemDetails<u64>>, _position: Point) -> bool {
        self.0.lock().context_clicks.push(item.map(|d| d.key));
        true
    }

    fn on_drag_initiated(&mut self, item: &ItemDetails<u64>, _position: Point) -> bool {
        self.0.lock().drags.push(item.key);
        true
    }

    fn perform_haptic_feedback(&mut self) {
        self.0.lock().haptics += 1;
    }

    fn on_fling(&mut self, _velocity: Point) -> bool {
        self.0.lock().flings += 1;
        true
    }
}

pub fn provider(count: u64) -> Arc<ListKeyProvider<u64>> {
    Arc::new(ListKeyProvider::new((0..count).collect()))
}

/// Engine over `count` keys plus a handle on what its callbacks saw.
pub fn engine(count: u64) -> (SelectionEngine<u64>, Arc<Mutex<Recorded>>) {
    let recorded = Arc::new(Mutex::new(Recorded::default()));
    let engine = SelectionEngine::builder(provider(count))
        .callbacks(Box::new(RecordingCallbacks(recorded.clone())))
        .build()
        .unwrap();
    (engine, recorded)
}

pub fn selected(engine: &SelectionEngine<u64>) -> Vec<u64> {
    let mut keys: Vec<u64> = engine.tracker().selection().iter().copied().collect();
    keys.sort_unstable();
    keys
}

pub fn provisional(engine: &SelectionEngine<u64>) -> Vec<u64> {
    let mut keys: Vec<u64> = engine.tracker().selection().provisional().iter().copied().collect();
    keys.sort_unstable();
    keys
}

/// Scripted pointer with its own clock.
pub struct Pointer {
    pub tool: ToolType,
    pub now: Instant,
    pub modifiers: KeyboardModifiers,
}

impl Pointer {
    pub fn new(tool: ToolType) -> Self {
        Self {
            tool,
            now: Instant::now(),
            modifiers: KeyboardModifiers::NONE,
        }
    }

    pub fn advance(&mut self, ms: u64) -> Instant {
        self.now += Duration::from_millis(ms);
        self.now
    }

    pub fn down(&mut self, x: f32, y: f32) -> PointerEvent {
        PointerEvent::down(self.tool, Point::new(x, y), self.now).with_modifiers(self.modifiers)
    }

    pub fn moved(&mut self, x: f32, y: f32) -> PointerEvent {
        self.advance(16);
        PointerEvent::moved(self.tool, Point::new(x, y), self.now).with_modifiers(self.modifiers)
    }

    pub fn up(&mut self, x: f32, y: f32) -> PointerEvent {
        self.advance(16);
        PointerEvent::up(self.tool, Point::new(x, y), self.now).with_modifiers(self.modifiers)
    }

    pub fn cancel(&mut self, x: f32, y: f32) -> PointerEvent {
        PointerEvent::cancel(self.tool, Point::new(x, y), self.now)
    }
}

/// Send tracing output to the test harness when `RUST_LOG` is set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
