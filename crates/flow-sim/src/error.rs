use flow_core::NodeId;
use flow_graph::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("particle start node {0} is not in the topology")]
    UnknownStartNode(NodeId),

    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("topology error: {0}")]
    Graph(#[from] GraphError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
