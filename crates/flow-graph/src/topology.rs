//! Read-only topology snapshot and its builder.
//!
//! # Snapshot model
//!
//! A [`Topology`] is immutable once built.  The editor that owns the graph
//! produces a fresh snapshot whenever nodes or edges change and hands it to
//! the simulation between ticks; the router, case engine, and renderer all
//! read the same snapshot for the duration of one tick.  Node and edge ids
//! are caller-supplied and stable across snapshots, so in-flight particles
//! keep pointing at the right edges after an unrelated edit.
//!
//! # Adjacency
//!
//! Outgoing edges are stored per source node **in edge insertion order**.
//! The weighted router walks candidates in that order, so insertion order is
//! part of the observable behaviour for a given seed.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use flow_core::{EdgeId, NodeId, Point};

use crate::{GraphError, GraphResult, Node, NodeKind};

// ── Edge ──────────────────────────────────────────────────────────────────────

/// A directed workflow edge with a sanitized, non-negative weight.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub id:     EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f32,
}

/// An edge as supplied by the topology provider; `weight` defaults to 1.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeSpec {
    pub id:     EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weight: Option<f32>,
}

/// One entry of a node's outgoing adjacency list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutEdge {
    pub edge:   EdgeId,
    pub target: NodeId,
    pub weight: f32,
}

/// Largest accepted edge weight.  Keeps the per-node weight total finite.
pub const MAX_EDGE_WEIGHT: f32 = 1.0e6;

/// Clamp a provider weight: missing → 1, negative or non-finite → 0, above
/// [`MAX_EDGE_WEIGHT`] → the cap.
fn sanitize_weight(weight: Option<f32>) -> f32 {
    match weight {
        None => 1.0,
        Some(w) if w.is_finite() && w >= 0.0 => w.min(MAX_EDGE_WEIGHT),
        Some(_) => 0.0,
    }
}

// ── TopologySpec ──────────────────────────────────────────────────────────────

/// Plain-data topology document, as exchanged with the editor.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TopologySpec {
    pub nodes:            Vec<Node>,
    pub edges:            Vec<EdgeSpec>,
    /// Explicit procedural order for cases.  Derived from the graph when
    /// absent.
    pub procedural_order: Option<Vec<NodeId>>,
}

// ── Topology ──────────────────────────────────────────────────────────────────

/// Immutable graph snapshot shared by the router, case engine, and renderer.
///
/// Construct via [`TopologyBuilder`] or [`Topology::from_spec`].
#[derive(Clone, Debug, Default)]
pub struct Topology {
    nodes:          FxHashMap<NodeId, Node>,
    node_order:     Vec<NodeId>,
    edges:          FxHashMap<EdgeId, Edge>,
    edge_order:     Vec<EdgeId>,
    adjacency:      FxHashMap<NodeId, Vec<OutEdge>>,
    explicit_order: Option<Vec<NodeId>>,
}

impl Topology {
    /// A topology with no nodes or edges.  Every query returns nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build leniently from a document (dangling edges skipped).
    pub fn from_spec(spec: TopologySpec) -> Self {
        TopologyBuilder::from_spec(spec).build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_order.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_order.is_empty()
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.node_order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edge_order.iter().filter_map(|id| self.edges.get(id))
    }

    /// Outgoing edges of `node` in insertion order.  Empty for sinks and for
    /// unknown nodes.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> &[OutEdge] {
        self.adjacency.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Source and target positions of `edge`, or `None` if the edge (or one
    /// of its endpoints) is not part of this snapshot.
    pub fn edge_endpoints(&self, edge: EdgeId) -> Option<(Point, Point)> {
        let e = self.edges.get(&edge)?;
        let source = self.nodes.get(&e.source)?;
        let target = self.nodes.get(&e.target)?;
        Some((source.position, target.position))
    }

    /// The first entry node in insertion order.
    pub fn entry_node(&self) -> Option<&Node> {
        self.nodes().find(|n| n.kind.is_entry())
    }

    /// The first exit node in insertion order.
    pub fn exit_node(&self) -> Option<&Node> {
        self.nodes().find(|n| n.kind.is_exit())
    }

    /// Nodes that carry an emitter configuration.
    pub fn emitters(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes().filter(|n| n.emitter.is_some())
    }

    /// The fixed linear node order cases follow.
    ///
    /// An explicit order set on the builder wins (nodes missing from this
    /// snapshot are dropped from it).  Otherwise the order starts at the
    /// entry node and repeatedly follows the first outgoing edge until a sink
    /// or an already-visited node.  Empty when there is no entry node.
    pub fn procedural_order(&self) -> Vec<NodeId> {
        if let Some(order) = &self.explicit_order {
            return order.iter().copied().filter(|id| self.nodes.contains_key(id)).collect();
        }

        let Some(entry) = self.entry_node() else {
            return Vec::new();
        };
        let mut order = vec![entry.id];
        let mut seen: FxHashSet<NodeId> = FxHashSet::default();
        seen.insert(entry.id);
        let mut current = entry.id;
        while let Some(first) = self.out_edges(current).first() {
            if !seen.insert(first.target) {
                break;
            }
            order.push(first.target);
            current = first.target;
        }
        order
    }

    pub fn kind_of(&self, node: NodeId) -> Option<&NodeKind> {
        self.nodes.get(&node).map(|n| &n.kind)
    }
}

// ── TopologyBuilder ───────────────────────────────────────────────────────────

/// Construct a [`Topology`] incrementally, then call [`build`](Self::build)
/// (lenient) or [`try_build`](Self::try_build) (strict).
///
/// # Example
///
/// ```
/// use flow_core::{EdgeId, NodeId, Point};
/// use flow_graph::{EntryConfig, ExitConfig, Node, TopologyBuilder};
///
/// let mut b = TopologyBuilder::new();
/// b.add_node(Node::entry(NodeId(0), Point::new(100.0, 0.0), EntryConfig::default()));
/// b.add_node(Node::exit(NodeId(1), Point::new(100.0, 200.0), ExitConfig::default()));
/// b.add_edge(EdgeId(0), NodeId(0), NodeId(1), None);
/// let topo = b.build();
/// assert_eq!(topo.node_count(), 2);
/// assert_eq!(topo.out_edges(NodeId(0)).len(), 1);
/// ```
#[derive(Default)]
pub struct TopologyBuilder {
    nodes:          Vec<Node>,
    edges:          Vec<EdgeSpec>,
    explicit_order: Option<Vec<NodeId>>,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder with every node, edge and the explicit order of a
    /// document.  Finish with [`build`](Self::build) or
    /// [`try_build`](Self::try_build).
    pub fn from_spec(spec: TopologySpec) -> Self {
        Self {
            nodes:          spec.nodes,
            edges:          spec.edges,
            explicit_order: spec.procedural_order,
        }
    }

    /// Add a node.  A later node with the same id replaces the earlier one
    /// in [`build`](Self::build).
    pub fn add_node(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    /// Add a directed edge.  `weight` defaults to 1 when `None`.
    pub fn add_edge(
        &mut self,
        id:     EdgeId,
        source: NodeId,
        target: NodeId,
        weight: Option<f32>,
    ) -> &mut Self {
        self.edges.push(EdgeSpec { id, source, target, weight });
        self
    }

    /// Supply the procedural order explicitly instead of deriving it.
    pub fn procedural_order(&mut self, order: Vec<NodeId>) -> &mut Self {
        self.explicit_order = Some(order);
        self
    }

    /// Strict build: duplicate ids and dangling edges are errors.
    pub fn try_build(self) -> GraphResult<Topology> {
        let mut node_ids: FxHashSet<NodeId> = FxHashSet::default();
        for n in &self.nodes {
            if !node_ids.insert(n.id) {
                return Err(GraphError::DuplicateNode(n.id));
            }
        }
        let mut edge_ids: FxHashSet<EdgeId> = FxHashSet::default();
        for e in &self.edges {
            if !edge_ids.insert(e.id) {
                return Err(GraphError::DuplicateEdge(e.id));
            }
            for node in [e.source, e.target] {
                if !node_ids.contains(&node) {
                    return Err(GraphError::DanglingEdge { edge: e.id, node });
                }
            }
        }
        Ok(self.build())
    }

    /// Lenient build: later duplicates replace earlier ones, edges whose
    /// endpoints are missing are skipped, and node configs are clamped.
    pub fn build(self) -> Topology {
        let mut nodes: FxHashMap<NodeId, Node> =
            FxHashMap::with_capacity_and_hasher(self.nodes.len(), Default::default());
        let mut node_order = Vec::with_capacity(self.nodes.len());
        for node in self.nodes {
            let id = node.id;
            if nodes.insert(id, node.sanitized()).is_some() {
                debug!(%id, "duplicate node id; later definition wins");
            } else {
                node_order.push(id);
            }
        }

        let mut edges: FxHashMap<EdgeId, Edge> =
            FxHashMap::with_capacity_and_hasher(self.edges.len(), Default::default());
        let mut edge_order = Vec::with_capacity(self.edges.len());
        for spec in self.edges {
            if !nodes.contains_key(&spec.source) || !nodes.contains_key(&spec.target) {
                debug!(edge = %spec.id, source = %spec.source, target = %spec.target,
                       "skipping edge with missing endpoint");
                continue;
            }
            let edge = Edge {
                id:     spec.id,
                source: spec.source,
                target: spec.target,
                weight: sanitize_weight(spec.weight),
            };
            if edges.insert(edge.id, edge).is_some() {
                debug!(edge = %edge.id, "duplicate edge id; later definition wins");
            } else {
                edge_order.push(edge.id);
            }
        }

        // Adjacency in insertion order, built after dedup so a replaced edge
        // appears once, in its original slot.
        let mut adjacency: FxHashMap<NodeId, Vec<OutEdge>> = FxHashMap::default();
        for id in &edge_order {
            let e = &edges[id];
            adjacency.entry(e.source).or_default().push(OutEdge {
                edge:   e.id,
                target: e.target,
                weight: e.weight,
            });
        }

        Topology {
            nodes,
            node_order,
            edges,
            edge_order,
            adjacency,
            explicit_order: self.explicit_order,
        }
    }
}
