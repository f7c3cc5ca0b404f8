//! Routing trait and default weighted random walk.
//!
//! # Pluggability
//!
//! The particle pool calls routing via the [`PathRouter`] trait, so
//! applications can swap in another strategy (shortest path, scripted paths
//! for demos) without touching the pool.
//!
//! # Weighted random walk
//!
//! From the start node, repeatedly:
//!
//! 1. Stop if the current node has no outgoing edges (a sink).
//! 2. Draw `u` uniformly from `[0, total_weight)`.
//! 3. Select the first candidate, in adjacency order, whose cumulative
//!    weight exceeds `u`; append its id and move to its target.
//!
//! When every candidate weighs zero the draw is 0 and the first candidate is
//! taken, so such a node always routes along its first outgoing edge.
//!
//! A hop bound guards against cycles.  A start node with no outgoing edges
//! yields an empty path, and callers must not spawn anything for it.

use flow_core::{EdgeId, NodeId, SimRng};
use tracing::trace;

use crate::topology::{OutEdge, Topology};

// ── PathRouter trait ──────────────────────────────────────────────────────────

/// Pluggable path sampler.
pub trait PathRouter: Send + Sync {
    /// Sample an ordered edge path starting at `start`.
    ///
    /// Returns an empty `Vec` when `start` is unknown or a sink.
    fn sample_path(&self, topology: &Topology, start: NodeId, rng: &mut SimRng) -> Vec<EdgeId>;
}

// ── WeightedWalkRouter ────────────────────────────────────────────────────────

/// Random walk that picks each next edge in proportion to its weight.
#[derive(Clone, Copy, Debug)]
pub struct WeightedWalkRouter {
    /// Maximum number of edges in a sampled path.  Default: 64.
    pub max_hops: usize,
}

impl WeightedWalkRouter {
    pub const DEFAULT_MAX_HOPS: usize = 64;

    pub fn new(max_hops: usize) -> Self {
        Self { max_hops }
    }
}

impl Default for WeightedWalkRouter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_HOPS)
    }
}

impl PathRouter for WeightedWalkRouter {
    fn sample_path(&self, topology: &Topology, start: NodeId, rng: &mut SimRng) -> Vec<EdgeId> {
        let mut path = Vec::new();
        let mut current = start;

        while path.len() < self.max_hops {
            let candidates = topology.out_edges(current);
            if candidates.is_empty() {
                break;
            }
            let total: f32 = candidates.iter().map(|c| c.weight).sum();
            let chosen = if total > 0.0 && total.is_finite() {
                pick_weighted(candidates, rng.uniform(0.0, total))
            } else {
                // All weights zero: the draw is 0 and the first edge wins.
                candidates.first()
            };
            let Some(next) = chosen else { break };
            path.push(next.edge);
            current = next.target;
        }

        if path.len() == self.max_hops && !topology.out_edges(current).is_empty() {
            trace!(%start, hops = self.max_hops, "random walk hit hop bound");
        }
        path
    }
}

/// Select the first candidate whose cumulative weight exceeds `draw`.
///
/// `draw` is expected in `[0, total_weight)`.  Zero-weight candidates are
/// never selected while a positive one exists.  If rounding pushes `draw` to
/// or past the total, the last positive-weight candidate is returned.
pub fn pick_weighted(candidates: &[OutEdge], draw: f32) -> Option<&OutEdge> {
    let mut remaining = draw;
    for c in candidates {
        if c.weight <= 0.0 {
            continue;
        }
        remaining -= c.weight;
        if remaining < 0.0 {
            return Some(c);
        }
    }
    candidates.iter().rev().find(|c| c.weight > 0.0)
}
