//! Rolling window of completion timestamps.

use std::collections::VecDeque;
use std::time::Duration;

use flow_core::SimTime;

/// Counts completions within the trailing `window` to derive a live
/// throughput in completions per second.
///
/// Timestamps are recorded in non-decreasing order (the tick clock never
/// runs backwards), so pruning only ever pops from the front.
#[derive(Clone, Debug)]
pub struct ThroughputWindow {
    window: Duration,
    stamps: VecDeque<SimTime>,
}

impl ThroughputWindow {
    pub fn new(window: Duration) -> Self {
        Self { window, stamps: VecDeque::new() }
    }

    pub fn record(&mut self, now: SimTime) {
        self.stamps.push_back(now);
    }

    /// Drop timestamps older than `now - window`.
    pub fn prune(&mut self, now: SimTime) {
        while let Some(&oldest) = self.stamps.front() {
            if now.saturating_since(oldest) > self.window {
                self.stamps.pop_front();
            } else {
                break;
            }
        }
    }

    /// Completions currently inside the window.
    pub fn count(&self) -> usize {
        self.stamps.len()
    }

    pub fn per_second(&self) -> f32 {
        let secs = self.window.as_secs_f32();
        if secs > 0.0 { self.stamps.len() as f32 / secs } else { 0.0 }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }

    pub fn clear(&mut self) {
        self.stamps.clear();
    }
}
