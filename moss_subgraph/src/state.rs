use moss_common::{EdgeId, NodeId};

/// Partial pattern-to-host mapping built up by the enumerator.
///
/// All scratch data lives here, indexed by pattern and host ids, so the
/// graphs themselves are never written during a search.
#[derive(Clone, Debug)]
pub(crate) struct MatchState {
    /// Pattern node -> host node
    node_images: Vec<Option<NodeId>>,
    /// Pattern edge -> host edge
    edge_images: Vec<Option<EdgeId>>,
    host_node_used: Vec<bool>,
    host_edge_used: Vec<bool>,
    mapped_nodes: usize,
    mapped_edges: usize,
}

impl MatchState {
    #[contracts::debug_ensures(ret.mapped_nodes == 0 && ret.mapped_edges == 0)]
    pub(crate) fn new(
        pattern_nodes: usize,
        pattern_edges: usize,
        host_nodes: usize,
        host_edges: usize,
    ) -> Self {
        Self {
            node_images: vec![None; pattern_nodes],
            edge_images: vec![None; pattern_edges],
            host_node_used: vec![false; host_nodes],
            host_edge_used: vec![false; host_edges],
            mapped_nodes: 0,
            mapped_edges: 0,
        }
    }

    pub(crate) fn node_image(&self, p: NodeId) -> Option<NodeId> {
        self.node_images[p.as_usize()]
    }

    pub(crate) fn edge_image(&self, p: EdgeId) -> Option<EdgeId> {
        self.edge_images[p.as_usize()]
    }

    pub(crate) fn is_node_used(&self, h: NodeId) -> bool {
        self.host_node_used[h.as_usize()]
    }

    pub(crate) fn is_edge_used(&self, h: EdgeId) -> bool {
        self.host_edge_used[h.as_usize()]
    }

    #[contracts::debug_requires(self.node_image(p).is_none())]
    #[contracts::debug_requires(!self.is_node_used(h))]
    #[contracts::debug_ensures(self.node_image(p) == Some(h) && self.is_node_used(h))]
    pub(crate) fn map_node(&mut self, p: NodeId, h: NodeId) {
        self.node_images[p.as_usize()] = Some(h);
        self.host_node_used[h.as_usize()] = true;
        self.mapped_nodes += 1;
    }

    #[contracts::debug_requires(self.node_image(p).is_some())]
    #[contracts::debug_ensures(self.node_image(p).is_none())]
    pub(crate) fn unmap_node(&mut self, p: NodeId) {
        if let Some(h) = self.node_images[p.as_usize()].take() {
            self.host_node_used[h.as_usize()] = false;
            self.mapped_nodes -= 1;
        }
    }

    #[contracts::debug_requires(self.edge_image(p).is_none())]
    #[contracts::debug_requires(!self.is_edge_used(h))]
    #[contracts::debug_ensures(self.edge_image(p) == Some(h) && self.is_edge_used(h))]
    pub(crate) fn map_edge(&mut self, p: EdgeId, h: EdgeId) {
        self.edge_images[p.as_usize()] = Some(h);
        self.host_edge_used[h.as_usize()] = true;
        self.mapped_edges += 1;
    }

    #[contracts::debug_requires(self.edge_image(p).is_some())]
    #[contracts::debug_ensures(self.edge_image(p).is_none())]
    pub(crate) fn unmap_edge(&mut self, p: EdgeId) {
        if let Some(h) = self.edge_images[p.as_usize()].take() {
            self.host_edge_used[h.as_usize()] = false;
            self.mapped_edges -= 1;
        }
    }

    /// Reserves host elements that no pattern element maps to, such as the
    /// interior of a chain run.
    pub(crate) fn reserve(&mut self, nodes: &[NodeId], edges: &[EdgeId], used: bool) {
        for n in nodes {
            self.host_node_used[n.as_usize()] = used;
        }
        for e in edges {
            self.host_edge_used[e.as_usize()] = used;
        }
    }

    /// True once every pattern node and edge has an image.
    pub(crate) fn done(&self) -> bool {
        self.mapped_nodes == self.node_images.len() && self.mapped_edges == self.edge_images.len()
    }

    /// True if nothing is mapped or reserved.
    pub(crate) fn is_clear(&self) -> bool {
        self.mapped_nodes == 0
            && self.mapped_edges == 0
            && self.host_node_used.iter().all(|&u| !u)
            && self.host_edge_used.iter().all(|&u| !u)
    }

    /// Snapshot of the complete mapping.
    #[contracts::debug_requires(self.done())]
    pub(crate) fn images(&self) -> (Vec<NodeId>, Vec<EdgeId>) {
        (
            self.node_images.iter().flatten().copied().collect(),
            self.edge_images.iter().flatten().copied().collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_and_unmap_restore_a_clear_state() {
        let mut state = MatchState::new(2, 1, 3, 2);
        state.map_node(NodeId::new(0), NodeId::new(2));
        state.map_node(NodeId::new(1), NodeId::new(0));
        state.map_edge(EdgeId::new(0), EdgeId::new(1));
        assert!(state.done());
        assert_eq!(
            state.images(),
            (vec![NodeId::new(2), NodeId::new(0)], vec![EdgeId::new(1)])
        );
        state.unmap_edge(EdgeId::new(0));
        state.unmap_node(NodeId::new(1));
        state.unmap_node(NodeId::new(0));
        assert!(state.is_clear());
    }

    #[test]
    fn reserved_elements_count_as_used() {
        let mut state = MatchState::new(1, 0, 3, 2);
        state.reserve(&[NodeId::new(1)], &[EdgeId::new(0)], true);
        assert!(state.is_node_used(NodeId::new(1)));
        assert!(state.is_edge_used(EdgeId::new(0)));
        state.reserve(&[NodeId::new(1)], &[EdgeId::new(0)], false);
        assert!(state.is_clear());
    }
}
