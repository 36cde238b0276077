use moss_common::{EdgeId, Graph, NodeId};
use tracing::trace;

/// Best complete mapping seen so far.
#[derive(Clone, Debug)]
pub(super) struct Best {
    pub(super) deletions: usize,
    pub(super) node_map: Vec<Option<NodeId>>,
    pub(super) edge_map: Vec<Option<EdgeId>>,
}

/// Branch and bound over partial mappings from `g1` into `g2`.
///
/// The cost of a complete mapping is the number of elements of either graph
/// left unmapped. Mappings are undone on the way back up, so the tables are
/// empty again when the search returns.
pub(super) struct McsSearch<'a> {
    g1: &'a Graph,
    g2: &'a Graph,
    /// g1 node -> g2 node
    node_map: Vec<Option<NodeId>>,
    node_used: Vec<bool>,
    /// g1 edge -> g2 edge
    edge_map: Vec<Option<EdgeId>>,
    edge_used: Vec<bool>,
    mapped_nodes: usize,
    mapped_edges: usize,
    pub(super) best: Option<Best>,
    pub(super) visited: usize,
}

impl<'a> McsSearch<'a> {
    pub(super) fn new(g1: &'a Graph, g2: &'a Graph) -> Self {
        Self {
            g1,
            g2,
            node_map: vec![None; g1.node_count()],
            node_used: vec![false; g2.node_count()],
            edge_map: vec![None; g1.edge_count()],
            edge_used: vec![false; g2.edge_count()],
            mapped_nodes: 0,
            mapped_edges: 0,
            best: None,
            visited: 0,
        }
    }

    pub(super) fn is_clear(&self) -> bool {
        self.mapped_nodes == 0
            && self.mapped_edges == 0
            && self.node_map.iter().all(Option::is_none)
            && self.edge_map.iter().all(Option::is_none)
    }

    fn deletions(&self) -> usize {
        self.g1.size() + self.g2.size() - 2 * (self.mapped_nodes + self.mapped_edges)
    }

    fn cannot_improve(&self, lower_bound: usize) -> bool {
        self.best.as_ref().is_some_and(|b| lower_bound >= b.deletions)
    }

    fn record(&mut self) {
        let deletions = self.deletions();
        if self.cannot_improve(deletions) {
            return;
        }
        trace!("new best mapping: {deletions} deletions");
        self.best = Some(Best {
            deletions,
            node_map: self.node_map.clone(),
            edge_map: self.edge_map.clone(),
        });
    }

    #[contracts::debug_requires(self.node_map[a.as_usize()].is_none() && !self.node_used[b.as_usize()])]
    fn map_node(&mut self, a: NodeId, b: NodeId) {
        self.node_map[a.as_usize()] = Some(b);
        self.node_used[b.as_usize()] = true;
        self.mapped_nodes += 1;
    }

    fn unmap_node(&mut self, a: NodeId) {
        if let Some(b) = self.node_map[a.as_usize()].take() {
            self.node_used[b.as_usize()] = false;
            self.mapped_nodes -= 1;
        }
    }

    #[contracts::debug_requires(self.edge_map[a.as_usize()].is_none() && !self.edge_used[b.as_usize()])]
    fn map_edge(&mut self, a: EdgeId, b: EdgeId) {
        self.edge_map[a.as_usize()] = Some(b);
        self.edge_used[b.as_usize()] = true;
        self.mapped_edges += 1;
    }

    fn unmap_edge(&mut self, a: EdgeId) {
        if let Some(b) = self.edge_map[a.as_usize()].take() {
            self.edge_used[b.as_usize()] = false;
            self.mapped_edges -= 1;
        }
    }

    /// `Some(true)` if `a` must be newly mapped to `b`, `Some(false)` if it
    /// already is, `None` if the pair is impossible.
    fn node_pairing(&self, a: NodeId, b: NodeId) -> Option<bool> {
        match self.node_map[a.as_usize()] {
            Some(m) => (m == b).then_some(false),
            None => (!self.node_used[b.as_usize()] && self.g1.node_type(a) == self.g2.node_type(b)).then_some(true),
        }
    }

    /// Lower bound on node deletions while `undecided1` g1 nodes may still
    /// get mapped.
    fn node_bound(&self, undecided1: usize) -> usize {
        let (n1, n2) = (self.g1.node_count(), self.g2.node_count());
        let reachable = self.mapped_nodes + undecided1.min(n2 - self.mapped_nodes);
        n1 + n2 - 2 * reachable
    }

    fn edge_bound(&self, undecided1: usize) -> usize {
        let (m1, m2) = (self.g1.edge_count(), self.g2.edge_count());
        let reachable = self.mapped_edges + undecided1.min(m2 - self.mapped_edges);
        m1 + m2 - 2 * reachable
    }

    /// Edge-driven search: level `i` decides g1 edge `i`. Leftover nodes are
    /// paired by type at the leaf.
    pub(super) fn by_edge(&mut self, i: usize) {
        self.visited += 1;
        let (g1, g2) = (self.g1, self.g2);
        let bound = self.edge_bound(g1.edge_count() - i) + self.node_bound(g1.node_count() - self.mapped_nodes);
        if self.cannot_improve(bound) {
            return;
        }
        if i == g1.edge_count() {
            self.pair_leftover_nodes();
            return;
        }

        let e1 = EdgeId::from(i);
        let edge1 = g1.edge(e1);
        let (a, b) = (edge1.src(), edge1.dst());
        for e2 in g2.edge_ids() {
            if self.edge_used[e2.as_usize()] || g2.edge_type(e2) != edge1.ty() {
                continue;
            }
            let edge2 = g2.edge(e2);
            for (c, d) in [(edge2.src(), edge2.dst()), (edge2.dst(), edge2.src())] {
                let (Some(new_a), Some(new_b)) = (self.node_pairing(a, c), self.node_pairing(b, d)) else {
                    continue;
                };
                if new_a {
                    self.map_node(a, c);
                }
                if new_b {
                    self.map_node(b, d);
                }
                self.map_edge(e1, e2);
                self.by_edge(i + 1);
                self.unmap_edge(e1);
                if new_b {
                    self.unmap_node(b);
                }
                if new_a {
                    self.unmap_node(a);
                }
            }
        }
        // leave e1 unmapped
        self.by_edge(i + 1);
    }

    fn pair_leftover_nodes(&mut self) {
        let (g1, g2) = (self.g1, self.g2);
        let mut paired = Vec::new();
        for a in g1.node_ids() {
            if self.node_map[a.as_usize()].is_some() {
                continue;
            }
            let ty = g1.node_type(a);
            if let Some(b) = g2
                .node_ids()
                .find(|&b| !self.node_used[b.as_usize()] && g2.node_type(b) == ty)
            {
                self.map_node(a, b);
                paired.push(a);
            }
        }
        self.record();
        for a in paired {
            self.unmap_node(a);
        }
    }

    /// Node-driven search: level `i` decides g1 node `i`; every g1 edge back
    /// to an earlier mapped node is mapped along if g2 has a free match.
    ///
    /// `decided[i]` is the number of g1 edges with both endpoints below `i`.
    pub(super) fn by_node(&mut self, i: usize, decided: &[usize]) {
        self.visited += 1;
        let (g1, g2) = (self.g1, self.g2);
        let bound = self.node_bound(g1.node_count() - i) + self.edge_bound(g1.edge_count() - decided[i]);
        if self.cannot_improve(bound) {
            return;
        }
        if i == g1.node_count() {
            self.record();
            return;
        }

        let a = NodeId::from(i);
        for c in g2.node_ids() {
            if self.node_pairing(a, c) != Some(true) {
                continue;
            }
            self.map_node(a, c);
            let mut edges = Vec::new();
            for &e1 in g1.incident(a) {
                let other = g1.opposite(e1, a);
                if other >= a {
                    continue;
                }
                let Some(d) = self.node_map[other.as_usize()] else {
                    continue;
                };
                let ty = g1.edge_type(e1);
                if let Some(&e2) = g2
                    .incident(c)
                    .iter()
                    .find(|&&e2| !self.edge_used[e2.as_usize()] && g2.opposite(e2, c) == d && g2.edge_type(e2) == ty)
                {
                    self.map_edge(e1, e2);
                    edges.push(e1);
                }
            }
            self.by_node(i + 1, decided);
            for e1 in edges {
                self.unmap_edge(e1);
            }
            self.unmap_node(a);
        }
        // leave node i unmapped
        self.by_node(i + 1, decided);
    }
}

/// `decided[i]`: g1 edges whose endpoints are both below `i`, for `i` in
/// `0..=node_count`.
pub(super) fn decided_edges(g1: &Graph) -> Vec<usize> {
    let mut closing = vec![0; g1.node_count() + 1];
    for edge in g1.edges() {
        let last = edge.src().max(edge.dst()).as_usize();
        closing[last + 1] += 1;
    }
    let mut total = 0;
    closing
        .into_iter()
        .map(|c| {
            total += c;
            total
        })
        .collect()
}
