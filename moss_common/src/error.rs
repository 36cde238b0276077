use thiserror::Error;

use crate::graph::NodeId;

/// Errors raised while building or renumbering a graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("node {node} does not exist (graph has {count} nodes)")]
    InvalidNode { node: NodeId, count: usize },

    #[error("self loop on node {0}")]
    SelfLoop(NodeId),

    #[error("{0} is not a permutation")]
    InvalidPermutation(String),

    #[error("edge record {index}: {source}")]
    Record {
        index: usize,
        #[source]
        source: Box<GraphError>,
    },
}
