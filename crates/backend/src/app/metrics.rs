use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tracing::warn;

static FRAME_STATS_POISON_WARNED: AtomicBool = AtomicBool::new(false);

fn warn_poison_once(operation: &'static str) {
    if !FRAME_STATS_POISON_WARNED.swap(true, Ordering::Relaxed) {
        warn!(operation, "frame stats lock poisoned; recovered inner value");
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStatsSnapshot {
    /// Frames presented per second.
    pub fps: f32,
    /// Host ticks per second.
    pub tps: f32,
    pub frame_time_ms: f32,
    /// Key events queued during the interval.
    pub key_events: u32,
}

/// Shared read view of the latest published frame statistics.
#[derive(Clone, Debug, Default)]
pub struct FrameStatsHandle {
    snapshot: Arc<RwLock<FrameStatsSnapshot>>,
}

impl FrameStatsHandle {
    pub fn snapshot(&self) -> FrameStatsSnapshot {
        match self.snapshot.read() {
            Ok(guard) => *guard,
            Err(poisoned) => {
                warn_poison_once("read");
                *poisoned.into_inner()
            }
        }
    }

    pub(crate) fn publish(&self, snapshot: FrameStatsSnapshot) {
        match self.snapshot.write() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => {
                warn_poison_once("write");
                *poisoned.into_inner() = snapshot;
            }
        }
    }
}

#[derive(Debug)]
pub(crate) struct FrameStatsAccumulator {
    interval_start: Instant,
    interval: Duration,
    frames: u32,
    ticks: u32,
    key_events: u32,
    frame_time_sum: Duration,
    frame_gaps: u32,
    last_frame_at: Option<Instant>,
}

impl FrameStatsAccumulator {
    pub(crate) fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval_start: now,
            interval,
            frames: 0,
            ticks: 0,
            key_events: 0,
            frame_time_sum: Duration::ZERO,
            frame_gaps: 0,
            last_frame_at: None,
        }
    }

    pub(crate) fn record_frame(&mut self, now: Instant) {
        if let Some(previous) = self.last_frame_at {
            self.frame_time_sum = self
                .frame_time_sum
                .saturating_add(now.saturating_duration_since(previous));
            self.frame_gaps = self.frame_gaps.saturating_add(1);
        }
        self.last_frame_at = Some(now);
        self.frames = self.frames.saturating_add(1);
    }

    pub(crate) fn record_tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    pub(crate) fn record_key_events(&mut self, count: usize) {
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        self.key_events = self.key_events.saturating_add(count);
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<FrameStatsSnapshot> {
        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        // Gaps that straddle the interval start count toward this interval.
        let frame_time_ms = if self.frame_gaps == 0 {
            0.0
        } else {
            self.frame_time_sum.as_secs_f32() * 1000.0 / self.frame_gaps as f32
        };
        let snapshot = FrameStatsSnapshot {
            fps: self.frames as f32 / elapsed_seconds,
            tps: self.ticks as f32 / elapsed_seconds,
            frame_time_ms,
            key_events: self.key_events,
        };

        self.interval_start = now;
        self.frames = 0;
        self.ticks = 0;
        self.key_events = 0;
        self.frame_time_sum = Duration::ZERO;
        self.frame_gaps = 0;
        Some(snapshot)
    }
}
