//! `flow-sim`: tick orchestrator for the flowsim core.
//!
//! # Tick
//!
//! ```text
//! every frame, with the host's delta time dt:
//!   ① Clock    : SimClock::advance(dt)
//!   ② Emitters : secondary emitter nodes spawn via ParticlePool::spawn_from
//!   ③ Particles: ParticlePool::advance(topology, dt, now)
//!   ④ Cases    : CaseEngine::tick(topology, now)
//! then, optionally:
//!   FlowSim::draw(canvas, viewport, options)
//! ```
//!
//! The particle pool and case engine share the topology snapshot but are
//! otherwise independent: particles are visual markers, cases are the
//! simulated work items.  Topology and configuration may be replaced between
//! any two ticks.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use flow_sim::{FlowConfig, FlowSimBuilder, NoopObserver, load_topology_json};
//!
//! let topology = load_topology_json(TOPOLOGY)?;
//! let mut sim = FlowSimBuilder::new(topology)
//!     .config(FlowConfig { seed: 7, ..FlowConfig::default() })
//!     .build()?;
//! sim.run_ticks(600, Duration::from_micros(16_667), &mut NoopObserver);
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::FlowSimBuilder;
pub use config::{FlowConfig, load_topology_file, load_topology_json, load_topology_json_strict};
pub use error::{SimError, SimResult};
pub use observer::{FrameSnapshot, NoopObserver, SimObserver, TickReport};
pub use sim::FlowSim;
