use super::{EdgeId, NodeType};

/// Mark value of an element nobody has touched.
pub const MARK_CLEAR: i32 = -1;

/// Marks at or below this value flag an element as structurally excluded;
/// [`Graph::clear_marks`](super::Graph::clear_marks) leaves them alone.
pub const MARK_EXCLUDED: i32 = -2;

/// A node of an attributed graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub(super) ty: NodeType,
    pub(super) edges: Vec<EdgeId>,
    pub(super) mark: i32,
}

impl Node {
    pub(super) fn new(ty: NodeType) -> Self {
        Self {
            ty,
            edges: Vec::new(),
            mark: MARK_CLEAR,
        }
    }

    /// Node type.
    #[must_use]
    pub const fn ty(&self) -> NodeType {
        self.ty
    }

    /// Number of incident edges.
    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    /// Incident edges, sorted by `(edge type, neighbor type)` once the graph
    /// has been prepared.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Caller-owned scratch value. None of the graph algorithms read or write it.
    pub fn mark(&self) -> i32 {
        self.mark
    }

    /// Is the node flagged as structurally excluded?
    #[must_use]
    pub const fn is_excluded(&self) -> bool {
        self.mark <= MARK_EXCLUDED
    }
}
