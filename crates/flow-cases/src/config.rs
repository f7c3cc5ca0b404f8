//! Case engine configuration.
//!
//! Per-node values (spawn rate, hold range, retention, stage list) live on
//! the topology's typed node configs and are re-read every tick.  This
//! struct holds the engine-wide values.

use std::time::Duration;

/// What to do with a case whose next node cannot be found (end of the
/// procedural order, or the topology was edited mid-flight).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MissingNextPolicy {
    /// Keep the case where it is and retry every tick.
    #[default]
    Freeze,
    /// Remove the case.
    Expire,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CaseConfig {
    /// Time spent moving between two nodes.  Default: 800 ms.
    pub transition_duration_ms: u64,
    /// Default per-stage duration when a staged node sets none.  Default: 1200 ms.
    pub stage_duration_ms:      u64,
    pub missing_next:           MissingNextPolicy,
    /// Upper bound on catch-up spawns in one tick after a long frame.
    pub max_spawns_per_tick:    u32,
}

impl Default for CaseConfig {
    fn default() -> Self {
        Self {
            transition_duration_ms: 800,
            stage_duration_ms:      1_200,
            missing_next:           MissingNextPolicy::Freeze,
            max_spawns_per_tick:    8,
        }
    }
}

impl CaseConfig {
    pub fn sanitized(mut self) -> Self {
        self.max_spawns_per_tick = self.max_spawns_per_tick.max(1);
        self
    }

    #[inline]
    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }

    #[inline]
    pub fn stage_duration(&self) -> Duration {
        Duration::from_millis(self.stage_duration_ms)
    }
}
