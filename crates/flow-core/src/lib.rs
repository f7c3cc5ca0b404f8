//! `flow-core`: foundational types for the flowsim workflow animation core.
//!
//! This crate is a dependency of every other `flow-*` crate.  It has no
//! `flow-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `NodeId`, `EdgeId`, `ParticleId`, `CaseId`                |
//! | [`geo`]     | `Point` (pixel-space 2-D vector)                          |
//! | [`color`]   | `Rgba`, hex parsing                                       |
//! | [`time`]    | `SimTime`, `SimClock`, saturating `Duration` helpers      |
//! | [`rng`]     | `SimRng` (seeded, reproducible)                           |
//! | [`error`]   | `FlowError`, `FlowResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod color;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use color::Rgba;
pub use error::{FlowError, FlowResult};
pub use geo::Point;
pub use ids::{CaseId, EdgeId, NodeId, ParticleId};
pub use rng::SimRng;
pub use time::{SimClock, SimTime, duration_from_secs, rate_interval};
