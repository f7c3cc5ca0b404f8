//! The procedural order: the fixed node sequence cases follow.

use flow_core::NodeId;
use flow_graph::Topology;

/// Linear sequence entry → intermediate nodes → exit.
///
/// Rebuilt from the topology snapshot each tick so edits take effect
/// immediately.  Workflows are small, so lookups are linear scans.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProceduralOrder(Vec<NodeId>);

impl ProceduralOrder {
    pub fn new(nodes: Vec<NodeId>) -> Self {
        Self(nodes)
    }

    pub fn from_topology(topology: &Topology) -> Self {
        Self(topology.procedural_order())
    }

    /// The node after `node`, or `None` if `node` is last or absent.
    pub fn next_after(&self, node: NodeId) -> Option<NodeId> {
        let pos = self.0.iter().position(|&n| n == node)?;
        self.0.get(pos + 1).copied()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.0.contains(&node)
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
