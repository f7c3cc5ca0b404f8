//! Graph-subsystem error type.

use thiserror::Error;

use flow_core::{EdgeId, NodeId};

/// Errors produced by strict topology construction.
///
/// The lenient path ([`TopologyBuilder::build`][crate::TopologyBuilder::build])
/// never fails; it skips what it cannot use.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("duplicate node id {0}")]
    DuplicateNode(NodeId),

    #[error("duplicate edge id {0}")]
    DuplicateEdge(EdgeId),

    #[error("edge {edge} references missing node {node}")]
    DanglingEdge { edge: EdgeId, node: NodeId },
}

pub type GraphResult<T> = Result<T, GraphError>;
