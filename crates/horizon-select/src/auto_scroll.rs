//! Edge auto-scrolling while a band or paint gesture is active.
//!
//! When the pointer enters the top or bottom margin of the viewport the
//! scroller starts a repeating timer. Each tick scrolls the host, after
//! which the owning helper recomputes its selection with the pointer at the
//! same viewport position. Leaving the margin or ending the gesture stops
//! the timer. Only vertical scrolling is performed.

use std::time::Instant;

use horizon_select_core::{Point, Rect, SharedTimerManager, TimerId};

use crate::config::AutoScrollConfig;
use crate::host::HostView;

/// Speed multiplier reached at the outer edge of a margin.
const MAX_SPEED_FACTOR: f32 = 2.0;

/// Signed scroll distance per tick for `pointer` in `viewport`.
///
/// Negative scrolls up, positive scrolls down, zero means the pointer is
/// outside both margins. `row_height` is used as a floor for the margin
/// so that a single row can always be targeted.
pub fn scroll_velocity(config: &AutoScrollConfig, pointer: Point, viewport: Rect, row_height: f32) -> f32 {
    if viewport.height() <= 0.0 {
        return 0.0;
    }
    let margin = (viewport.height() * config.margin_fraction)
        .max(config.min_margin)
        .max(row_height)
        .min(viewport.height() / 2.0);
    if margin <= 0.0 {
        return 0.0;
    }

    let top_edge = viewport.top() + margin;
    let bottom_edge = viewport.bottom() - margin;
    let (direction, depth) = if pointer.y < top_edge {
        (-1.0, top_edge - pointer.y)
    } else if pointer.y > bottom_edge {
        (1.0, pointer.y - bottom_edge)
    } else {
        return 0.0;
    };

    let penetration = (depth / margin).clamp(0.0, 1.0);
    direction * config.step * (1.0 + (MAX_SPEED_FACTOR - 1.0) * penetration)
}

/// Owns the repeating scroll timer of one helper.
#[derive(Debug)]
pub struct AutoScroller {
    config: AutoScrollConfig,
    timers: SharedTimerManager,
    timer: Option<TimerId>,
    velocity: f32,
}

impl AutoScroller {
    pub fn new(config: AutoScrollConfig, timers: SharedTimerManager) -> Self {
        Self {
            config,
            timers,
            timer: None,
            velocity: 0.0,
        }
    }

    /// Recompute the scroll velocity for the pointer's viewport position,
    /// starting or stopping the tick timer as needed.
    pub fn update(&mut self, pointer: Point, viewport: Rect, row_height: f32, now: Instant) -> f32 {
        self.velocity = scroll_velocity(&self.config, pointer, viewport, row_height);

        if self.velocity == 0.0 {
            self.stop_timer();
        } else if self.timer.is_none() {
            match self.timers.start_repeating(now, self.config.tick_interval) {
                Ok(id) => {
                    tracing::debug!(target: "horizon_select::auto_scroll", velocity = self.velocity, "auto-scroll started");
                    self.timer = Some(id);
                }
                Err(err) => {
                    tracing::warn!(target: "horizon_select::auto_scroll", %err, "auto-scroll timer not started");
                    self.velocity = 0.0;
                }
            }
        }
        self.velocity
    }

    /// Current signed scroll distance per tick.
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn is_scrolling(&self) -> bool {
        self.timer.is_some()
    }

    /// Returns true if `id` is this scroller's tick timer.
    pub fn owns(&self, id: TimerId) -> bool {
        self.timer == Some(id)
    }

    /// Scroll the host by one step. Returns true if a scroll was requested.
    pub fn on_tick<H: HostView + ?Sized>(&mut self, id: TimerId, host: &mut H) -> bool {
        if !self.owns(id) || self.velocity == 0.0 {
            return false;
        }
        tracing::trace!(target: "horizon_select::auto_scroll", dy = self.velocity, "scroll tick");
        host.scroll_by(0.0, self.velocity);
        true
    }

    /// Stop scrolling.
    pub fn reset(&mut self) {
        self.velocity = 0.0;
        self.stop_timer();
    }

    fn stop_timer(&mut self) {
        if let Some(id) = self.timer.take() {
            // The timer may already be gone if the host dropped it.
            let _ = self.timers.stop(id);
            tracing::debug!(target: "horizon_select::auto_scroll", "auto-scroll stopped");
        }
    }
}

impl Drop for AutoScroller {
    fn drop(&mut self) {
        self.stop_timer();
    }
}
