use contracts::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Position of a node inside the node arena of one [`Graph`](super::Graph).
///
/// Ids are only meaningful for the graph that issued them. Reordering a graph
/// (`prepare_embed`, `permute`) renumbers its nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    /// The underlying raw integer index.
    inner: u32,
}

impl NodeId {
    /// Creates a node id from a raw integer.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self { inner: id }
    }

    /// Returns the index as a usize for array access.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.inner as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.inner)
    }
}

impl From<usize> for NodeId {
    #[inline]
    #[debug_requires(u32::try_from(id).is_ok(), "node index overflows u32")]
    fn from(id: usize) -> Self {
        Self { inner: id as u32 }
    }
}

impl From<NodeId> for usize {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.inner as Self
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.inner
    }
}

/// Position of an edge inside the edge arena of one [`Graph`](super::Graph).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId {
    inner: u32,
}

impl EdgeId {
    /// Creates an edge id from a raw integer.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self { inner: id }
    }

    /// Returns the index as a usize for array access.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.inner as usize
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.inner)
    }
}

impl From<usize> for EdgeId {
    #[inline]
    #[debug_requires(u32::try_from(id).is_ok(), "edge index overflows u32")]
    fn from(id: usize) -> Self {
        Self { inner: id as u32 }
    }
}

impl From<EdgeId> for usize {
    #[inline]
    fn from(id: EdgeId) -> Self {
        id.inner as Self
    }
}
