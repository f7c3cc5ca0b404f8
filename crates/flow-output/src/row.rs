//! Plain data row types written by output backends.

use flow_cases::CaseSnapshot;
use flow_sim::TickReport;

/// One case's lifecycle state at a snapshot frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaseSnapshotRow {
    pub frame:       u64,
    pub time_ms:     u64,
    pub case_id:     u64,
    pub state:       &'static str,
    /// The node the case is at, or departed from while transitioning.
    pub node:        u32,
    /// Destination while transitioning.
    pub next_node:   Option<u32>,
    pub stage_index: Option<usize>,
    pub progress:    f32,
    pub frozen:      bool,
}

impl CaseSnapshotRow {
    pub fn new(frame: u64, time_ms: u64, snap: &CaseSnapshot) -> Self {
        Self {
            frame,
            time_ms,
            case_id:     snap.id.0,
            state:       snap.state.name(),
            node:        snap.node.0,
            next_node:   snap.next_node.map(|n| n.0),
            stage_index: snap.stage_index,
            progress:    snap.progress,
            frozen:      snap.frozen,
        }
    }
}

/// Summary statistics for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub frame:               u64,
    pub time_ms:             u64,
    pub active_particles:    u64,
    pub completed_particles: u64,
    pub throughput_per_sec:  f32,
    pub active_cases:        u64,
    pub completed_cases:     u64,
    pub frozen_cases:        u64,
}

impl From<&TickReport> for TickSummaryRow {
    fn from(r: &TickReport) -> Self {
        Self {
            frame:               r.frame,
            time_ms:             r.now.as_millis(),
            active_particles:    r.particle_stats.active_count as u64,
            completed_particles: r.particle_stats.completed_count,
            throughput_per_sec:  r.particle_stats.throughput_per_sec,
            active_cases:        r.case_stats.active as u64,
            completed_cases:     r.case_stats.completed,
            frozen_cases:        r.case_stats.frozen as u64,
        }
    }
}
