use super::{EdgeType, NodeId, node::MARK_CLEAR};

/// Top bit of [`Edge::flags`]: the edge is a bridge.
pub const BRIDGE: u64 = 1 << 63;

/// The 63 ring-membership bits of [`Edge::flags`].
pub const RING_BITS: u64 = !BRIDGE;

/// Number of distinct rings a graph can record.
pub const MAX_RINGS: u32 = 63;

/// An undirected edge of an attributed graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub(super) ty: EdgeType,
    pub(super) src: NodeId,
    pub(super) dst: NodeId,
    pub(super) mark: i32,
    pub(super) flags: u64,
}

impl Edge {
    pub(super) fn new(src: NodeId, dst: NodeId, ty: EdgeType) -> Self {
        Self {
            ty,
            src,
            dst,
            mark: MARK_CLEAR,
            flags: 0,
        }
    }

    /// Edge type.
    #[must_use]
    pub const fn ty(&self) -> EdgeType {
        self.ty
    }

    /// Source endpoint. After `prepare_embed` it precedes `dst` in node order.
    #[must_use]
    pub const fn src(&self) -> NodeId {
        self.src
    }

    /// Destination endpoint.
    #[must_use]
    pub const fn dst(&self) -> NodeId {
        self.dst
    }

    /// The endpoint that is not `node`.
    pub fn opposite(&self, node: NodeId) -> NodeId {
        debug_assert!(node == self.src || node == self.dst);
        if node == self.src { self.dst } else { self.src }
    }

    /// Does the edge connect `a` and `b`, in either orientation?
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        (self.src == a && self.dst == b) || (self.src == b && self.dst == a)
    }

    /// Caller-owned scratch value.
    #[must_use]
    pub const fn mark(&self) -> i32 {
        self.mark
    }

    /// Is the edge flagged as structurally excluded?
    #[must_use]
    pub const fn is_excluded(&self) -> bool {
        self.mark <= super::node::MARK_EXCLUDED
    }

    /// Bridge bit plus ring-membership bitmask.
    #[must_use]
    pub const fn flags(&self) -> u64 {
        self.flags
    }

    /// Set by `mark_bridges` when removing the edge would split its component.
    #[must_use]
    pub const fn is_bridge(&self) -> bool {
        self.flags & BRIDGE != 0
    }

    /// One bit per marked ring this edge lies on.
    #[must_use]
    pub const fn rings(&self) -> u64 {
        self.flags & RING_BITS
    }
}
