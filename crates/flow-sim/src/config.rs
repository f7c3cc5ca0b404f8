//! Simulation configuration and the JSON document boundary.
//!
//! ```json
//! {
//!   "seed": 7,
//!   "snapshot_interval_ticks": 60,
//!   "particles": { "spawn_rate_per_sec": 4, "max_particles": 300 },
//!   "cases": { "transition_duration_ms": 600, "missing_next": "expire" }
//! }
//! ```
//!
//! Every field is optional; omitted fields take their defaults.  Values are
//! clamped when the simulation is built, never rejected.

use std::path::Path;

use serde::{Deserialize, Serialize};

use flow_cases::CaseConfig;
use flow_graph::{Topology, TopologyBuilder, TopologySpec};
use flow_particles::ParticleConfig;

use crate::SimResult;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Root seed.  The particle pool and case engine draw from child
    /// streams, so one seed reproduces a whole run.
    pub seed:                    u64,
    /// Call `SimObserver::on_snapshot` every this many ticks; 0 disables.
    pub snapshot_interval_ticks: u64,
    pub particles:               ParticleConfig,
    pub cases:                   CaseConfig,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            seed:                    0,
            snapshot_interval_ticks: 1,
            particles:               ParticleConfig::default(),
            cases:                   CaseConfig::default(),
        }
    }
}

impl FlowConfig {
    pub fn from_json_str(text: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> SimResult<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn to_json_string(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Parse a topology document.  Dangling edges are skipped, as at every
/// topology boundary.
pub fn load_topology_json(text: &str) -> SimResult<Topology> {
    let spec: TopologySpec = serde_json::from_str(text)?;
    Ok(Topology::from_spec(spec))
}

/// Parse a topology document, rejecting duplicate ids and dangling edges.
pub fn load_topology_json_strict(text: &str) -> SimResult<Topology> {
    let spec: TopologySpec = serde_json::from_str(text)?;
    Ok(TopologyBuilder::from_spec(spec).try_build()?)
}

pub fn load_topology_file(path: impl AsRef<Path>) -> SimResult<Topology> {
    load_topology_json(&std::fs::read_to_string(path)?)
}
