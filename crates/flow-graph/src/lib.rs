//! `flow-graph`: workflow topology, edge geometry, and routing.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`node`]     | `Node`, `NodeKind`, typed per-kind configs                      |
//! | [`topology`] | `Topology` (read-only snapshot), `TopologyBuilder`, `TopologySpec` |
//! | [`curve`]    | `CubicCurve`: vertical S-curve per edge, point/tangent/normal  |
//! | [`router`]   | `PathRouter` trait, `WeightedWalkRouter`, `pick_weighted`       |
//! | [`error`]    | `GraphError`, `GraphResult<T>`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod curve;
pub mod error;
pub mod node;
pub mod router;
pub mod topology;


pub use curve::CubicCurve;
pub use error::{GraphError, GraphResult};
pub use node::{EmitterConfig, EntryConfig, ExitConfig, Node, NodeKind, Stage, StageKind, StagedConfig};
pub use router::{pick_weighted, PathRouter, WeightedWalkRouter};
pub use topology::{Edge, EdgeSpec, MAX_EDGE_WEIGHT, OutEdge, Topology, TopologyBuilder, TopologySpec};
