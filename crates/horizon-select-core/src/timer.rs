//! Timer system for Horizon Select.
//!
//! Provides one-shot and repeating timers for long-press detection and
//! auto-scroll ticks. The manager never sleeps or spawns threads: the host
//! event loop asks [`TimerManager::time_until_next`] how long it may wait,
//! then calls [`TimerManager::process_expired`] and feeds every returned
//! [`TimerEvent`] back to the engine. All methods take the current instant
//! explicitly so behavior is deterministic under test.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::TimerError;

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// The type of timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once after the specified duration.
    OneShot,
    /// Fires repeatedly at the specified interval until stopped.
    Repeating,
}

/// Delivered to the engine each time a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEvent {
    /// The timer that fired.
    pub id: TimerId,
    /// The instant the timer was processed at.
    pub fired_at: Instant,
}

/// Internal timer data.
#[derive(Debug)]
struct TimerData {
    /// When this timer should next fire.
    next_fire: Instant,
    /// The interval for repeating timers.
    interval: Duration,
    /// The kind of timer.
    kind: TimerKind,
}

/// An entry in the timer queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other.fire_time.cmp(&self.fire_time)
    }
}

/// Manages all timers owned by one engine.
#[derive(Debug, Default)]
pub struct TimerManager {
    /// All registered timers.
    timers: SlotMap<TimerId, TimerData>,
    /// Priority queue of pending timer fires (min-heap by fire time).
    queue: BinaryHeap<TimerQueueEntry>,
}

impl TimerManager {
    /// Create a new timer manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a one-shot timer that fires `duration` after `now`.
    pub fn start_one_shot(&mut self, now: Instant, duration: Duration) -> TimerId {
        self.insert(now + duration, duration, TimerKind::OneShot)
    }

    /// Start a repeating timer that first fires `interval` after `now`.
    pub fn start_repeating(&mut self, now: Instant, interval: Duration) -> Result<TimerId, TimerError> {
        if interval.is_zero() {
            return Err(TimerError::ZeroInterval);
        }
        Ok(self.insert(now + interval, interval, TimerKind::Repeating))
    }

    fn insert(&mut self, next_fire: Instant, interval: Duration, kind: TimerKind) -> TimerId {
        let id = self.timers.insert(TimerData {
            next_fire,
            interval,
            kind,
        });
        self.queue.push(TimerQueueEntry {
            id,
            fire_time: next_fire,
        });
        tracing::trace!(target: "horizon_select_core::timer", ?id, ?kind, "timer started");
        id
    }

    /// Stop and remove a timer.
    pub fn stop(&mut self, id: TimerId) -> Result<(), TimerError> {
        if self.timers.remove(id).is_some() {
            tracing::trace!(target: "horizon_select_core::timer", ?id, "timer stopped");
            Ok(())
        } else {
            Err(TimerError::InvalidTimerId)
        }
    }

    /// Check if a timer is currently active.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Get the duration from `now` until the next timer fires, if any.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        self.discard_stale_entries();
        self.queue
            .peek()
            .map(|entry| entry.fire_time.saturating_duration_since(now))
    }

    /// Process all timers due at or before `now`.
    ///
    /// Repeating timers are rescheduled relative to `now`, so a host that
    /// falls behind receives one tick rather than a burst.
    #[tracing::instrument(skip(self), target = "horizon_select_core::timer", level = "trace")]
    pub fn process_expired(&mut self, now: Instant) -> Vec<TimerEvent> {
        let mut events = Vec::new();

        while let Some(entry) = self.queue.peek().copied() {
            if entry.fire_time > now {
                break;
            }
            self.queue.pop();

            let Some(timer) = self.timers.get_mut(entry.id) else {
                continue;
            };
            if timer.next_fire != entry.fire_time {
                // Superseded queue entry.
                continue;
            }

            tracing::trace!(target: "horizon_select_core::timer", id = ?entry.id, "timer fired");
            events.push(TimerEvent {
                id: entry.id,
                fired_at: now,
            });

            match timer.kind {
                TimerKind::OneShot => {
                    self.timers.remove(entry.id);
                }
                TimerKind::Repeating => {
                    timer.next_fire = now + timer.interval;
                    self.queue.push(TimerQueueEntry {
                        id: entry.id,
                        fire_time: timer.next_fire,
                    });
                }
            }
        }

        events
    }

    /// Get the number of active timers.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    fn discard_stale_entries(&mut self) {
        while let Some(entry) = self.queue.peek() {
            let live = self
                .timers
                .get(entry.id)
                .is_some_and(|t| t.next_fire == entry.fire_time);
            if live {
                break;
            }
            self.queue.pop();
        }
    }
}

/// A cloneable, thread-safe handle to a [`TimerManager`].
///
/// The engine starts and stops timers through one clone while the host
/// pumps expirations through another.
#[derive(Debug, Clone, Default)]
pub struct SharedTimerManager {
    inner: Arc<Mutex<TimerManager>>,
}

impl SharedTimerManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_one_shot(&self, now: Instant, duration: Duration) -> TimerId {
        self.inner.lock().start_one_shot(now, duration)
    }

    pub fn start_repeating(&self, now: Instant, interval: Duration) -> Result<TimerId, TimerError> {
        self.inner.lock().start_repeating(now, interval)
    }

    pub fn stop(&self, id: TimerId) -> Result<(), TimerError> {
        self.inner.lock().stop(id)
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.inner.lock().is_active(id)
    }

    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.inner.lock().time_until_next(now)
    }

    pub fn process_expired(&self, now: Instant) -> Vec<TimerEvent> {
        self.inner.lock().process_expired(now)
    }

    pub fn active_count(&self) -> usize {
        self.inner.lock().active_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_fires_once() {
        let mut timers = TimerManager::new();
        let t0 = Instant::now();
        let id = timers.start_one_shot(t0, Duration::from_millis(500));

        assert!(timers.process_expired(t0 + Duration::from_millis(499)).is_empty());
        let fired = timers.process_expired(t0 + Duration::from_millis(500));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].id, id);
        assert!(!timers.is_active(id));
        assert!(timers.process_expired(t0 + Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn test_repeating_reschedules() {
        let mut timers = TimerManager::new();
        let t0 = Instant::now();
        let id = timers.start_repeating(t0, Duration::from_millis(16)).unwrap();

        for tick in 1..=3u64 {
            let fired = timers.process_expired(t0 + Duration::from_millis(16 * tick));
            assert_eq!(fired.len(), 1);
            assert_eq!(fired[0].id, id);
        }
        assert!(timers.is_active(id));
    }

    #[test]
    fn test_stop_cancels_pending_fire() {
        let mut timers = TimerManager::new();
        let t0 = Instant::now();
        let id = timers.start_repeating(t0, Duration::from_millis(16)).unwrap();
        timers.stop(id).unwrap();

        assert!(timers.process_expired(t0 + Duration::from_secs(1)).is_empty());
        assert_eq!(timers.stop(id), Err(TimerError::InvalidTimerId));
        assert_eq!(timers.time_until_next(t0), None);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut timers = TimerManager::new();
        assert_eq!(
            timers.start_repeating(Instant::now(), Duration::ZERO),
            Err(TimerError::ZeroInterval)
        );
    }

    #[test]
    fn test_time_until_next() {
        let mut timers = TimerManager::new();
        let t0 = Instant::now();
        timers.start_one_shot(t0, Duration::from_millis(300));
        timers.start_one_shot(t0, Duration::from_millis(100));

        assert_eq!(timers.time_until_next(t0), Some(Duration::from_millis(100)));
        assert_eq!(
            timers.time_until_next(t0 + Duration::from_millis(200)),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_shared_manager_clones_share_state() {
        let shared = SharedTimerManager::new();
        let host_side = shared.clone();
        let t0 = Instant::now();
        shared.start_one_shot(t0, Duration::from_millis(10));
        assert_eq!(host_side.active_count(), 1);
        assert_eq!(host_side.process_expired(t0 + Duration::from_millis(10)).len(), 1);
        assert_eq!(shared.active_count(), 0);
    }
}
