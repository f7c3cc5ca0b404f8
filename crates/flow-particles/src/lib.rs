//! `flow-particles`: animated markers routed through the workflow graph.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`config`]     | `ParticleConfig`, `TrajectoryStyle`                       |
//! | [`particle`]   | `Particle`, `Trail` (bounded, most-recent-first)          |
//! | [`throughput`] | `ThroughputWindow`: rolling completion timestamps        |
//! | [`pool`]       | `ParticlePool<R>`: spawn, advance, retire, statistics    |
//!
//! # Movement model
//!
//! A particle owns a pre-sampled path of edge ids and a `progress ∈ [0, 1)`
//! along its current edge.  Each tick advances progress by
//! `dt × speed × flow_speed`; on reaching 1 the particle resets to 0 on the
//! next edge, and once it runs off the end of its path it is retired and
//! counted as completed.  Positions are evaluated on the same cubic curve
//! the renderer strokes, shifted sideways by the particle's lateral offset.
//!
//! Particles are purely visual and independent of case state.

pub mod config;
pub mod particle;
pub mod pool;
pub mod throughput;


pub use config::{ParticleConfig, TrajectoryStyle};
pub use particle::{Particle, Trail};
pub use pool::{ParticlePool, ParticleStats, ParticleTick};
pub use throughput::ThroughputWindow;
