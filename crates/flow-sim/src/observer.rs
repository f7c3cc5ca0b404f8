//! Simulation observer trait for progress reporting and data collection.

use std::time::Duration;

use flow_cases::{CaseSnapshot, CaseStats, CaseTick};
use flow_core::SimTime;
use flow_particles::{ParticleStats, ParticleTick};

/// What one [`FlowSim::tick`][crate::FlowSim::tick] did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Frame number after the tick (1 for the first tick).
    pub frame:          u64,
    pub now:            SimTime,
    pub dt:             Duration,
    /// Particles spawned by secondary emitters this tick.
    pub emitted:        usize,
    pub particles:      ParticleTick,
    pub cases:          CaseTick,
    pub particle_stats: ParticleStats,
    pub case_stats:     CaseStats,
}

/// Read-only state handed to overlays and output writers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameSnapshot {
    pub frame:          u64,
    pub now:            SimTime,
    pub cases:          Vec<CaseSnapshot>,
    pub particle_stats: ParticleStats,
    pub case_stats:     CaseStats,
}

/// Callbacks invoked by [`FlowSim::run_ticks`][crate::FlowSim::run_ticks].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl SimObserver for Progress {
///     fn on_tick_end(&mut self, report: &TickReport) {
///         if report.frame % 60 == 0 {
///             println!("{}: {} cases", report.now, report.case_stats.active);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before the clock advances.  `frame` is the frame about to run.
    fn on_tick_start(&mut self, _frame: u64) {}

    fn on_tick_end(&mut self, _report: &TickReport) {}

    /// Called every `snapshot_interval_ticks` ticks, after `on_tick_end`.
    fn on_snapshot(&mut self, _snapshot: &FrameSnapshot) {}

    /// Called once after the last tick of a `run_ticks` call.
    fn on_sim_end(&mut self, _now: SimTime) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
