//! Maximum common subgraph of two independent graphs.
//!
//! A branch and bound search over partial mappings from the first graph into
//! the second, recursing either over the edges or over the nodes of the
//! first graph ([`McsStrategy`]). A branch is cut as soon as its cost so far
//! plus the least cost still to come cannot beat the best complete mapping.

mod search;

use moss_common::{EdgeId, Graph, McsStrategy, NodeId};
use tracing::debug;

use search::{McsSearch, decided_edges};

/// Result of [`max_common_subgraph`].
#[derive(Clone, Debug)]
pub struct McsResult {
    /// Elements of the smaller graph (by node plus edge count) that are not
    /// part of the common subgraph. 0 iff one graph embeds into the other.
    pub cost: usize,
    /// Elements of either graph left unmapped.
    pub deletions: usize,
    /// For every node of the first graph, its partner in the second.
    pub node_map: Vec<Option<NodeId>>,
    /// For every edge of the first graph, its partner in the second.
    pub edge_map: Vec<Option<EdgeId>>,
    /// The common subgraph, built from the mapped part of the first graph.
    pub subgraph: Graph,
}

impl McsResult {
    /// Nodes plus edges of the common subgraph.
    pub fn size(&self) -> usize {
        self.subgraph.size()
    }
}

/// Finds a maximum common subgraph of `g1` and `g2`.
///
/// Node and edge types must match exactly. The common subgraph need not be
/// connected or induced.
pub fn max_common_subgraph(g1: &Graph, g2: &Graph, strategy: McsStrategy) -> McsResult {
    let mut search = McsSearch::new(g1, g2);
    match strategy {
        McsStrategy::ByEdge => search.by_edge(0),
        McsStrategy::ByNode => search.by_node(0, &decided_edges(g1)),
    }
    debug_assert!(search.is_clear());
    let visited = search.visited;
    // the first leaf is always recorded, so a best mapping exists
    let best = search.best.unwrap_or_else(|| search::Best {
        deletions: g1.size() + g2.size(),
        node_map: vec![None; g1.node_count()],
        edge_map: vec![None; g1.edge_count()],
    });

    let subgraph = build_subgraph(g1, &best.node_map, &best.edge_map);
    let cost = (best.deletions - g1.size().abs_diff(g2.size())) / 2;
    debug!(
        "mcs ({strategy:?}): {} of {} / {} elements common, cost {cost}, {visited} search nodes",
        subgraph.size(),
        g1.size(),
        g2.size()
    );
    McsResult {
        cost,
        deletions: best.deletions,
        node_map: best.node_map,
        edge_map: best.edge_map,
        subgraph,
    }
}

fn build_subgraph(g1: &Graph, node_map: &[Option<NodeId>], edge_map: &[Option<EdgeId>]) -> Graph {
    let mut subgraph = Graph::new();
    let mut local = vec![None; g1.node_count()];
    for n in g1.node_ids().filter(|n| node_map[n.as_usize()].is_some()) {
        local[n.as_usize()] = Some(subgraph.add_node(g1.node_type(n)));
    }
    for e in g1.edge_ids().filter(|e| edge_map[e.as_usize()].is_some()) {
        let edge = g1.edge(e);
        if let (Some(src), Some(dst)) = (local[edge.src().as_usize()], local[edge.dst().as_usize()]) {
            let added = subgraph.add_edge(src, dst, edge.ty());
            debug_assert!(added.is_ok(), "mapped edge {e} has bad endpoints");
        }
    }
    subgraph.prepare();
    subgraph
}

#[cfg(test)]
mod tests {
    use super::*;
    use moss_common::*;
    use rstest::rstest;

    #[rstest]
    #[case::by_edge(McsStrategy::ByEdge)]
    #[case::by_node(McsStrategy::ByNode)]
    fn identical_graphs_cost_nothing(#[case] strategy: McsStrategy) {
        let g = acetic_acid();
        let result = max_common_subgraph(&g, &g, strategy);
        assert_eq!(result.cost, 0);
        assert_eq!(result.deletions, 0);
        assert_eq!(result.size(), g.size());
        assert!(result.node_map.iter().all(Option::is_some));
    }

    #[rstest]
    #[case::by_edge(McsStrategy::ByEdge)]
    #[case::by_node(McsStrategy::ByNode)]
    fn no_shared_types_cost_the_smaller_graph(#[case] strategy: McsStrategy) {
        let nitrogen = bond_between(elements::N, elements::N, bonds::TRIPLE);
        let result = max_common_subgraph(&ethanol(), &nitrogen, strategy);
        assert_eq!(result.cost, nitrogen.size());
        assert!(result.subgraph.is_empty());
    }

    #[rstest]
    #[case::by_edge(McsStrategy::ByEdge)]
    #[case::by_node(McsStrategy::ByNode)]
    fn bond_types_must_agree(#[case] strategy: McsStrategy) {
        let result = max_common_subgraph(&cyclohexane(), &benzene(), strategy);
        // the six carbons are common, none of the bonds
        assert_eq!(result.size(), 6);
        assert_eq!(result.subgraph.edge_count(), 0);
        assert_eq!(result.cost, 6);
    }

    #[rstest]
    #[case::by_edge(McsStrategy::ByEdge)]
    #[case::by_node(McsStrategy::ByNode)]
    fn contained_graph_costs_nothing(#[case] strategy: McsStrategy) {
        let result = max_common_subgraph(&acetic_acid(), &ethanol(), strategy);
        assert_eq!(result.cost, 0);
        assert_eq!(result.size(), ethanol().size());
        assert_eq!(result.deletions, acetic_acid().size() - ethanol().size());
    }

    #[rstest]
    #[case::by_edge(McsStrategy::ByEdge)]
    #[case::by_node(McsStrategy::ByNode)]
    fn common_subgraph_keeps_every_mapped_edge(#[case] strategy: McsStrategy) {
        let result = max_common_subgraph(&naphthalene(), &benzene(), strategy);
        let mapped_nodes = result.node_map.iter().flatten().count();
        let mapped_edges = result.edge_map.iter().flatten().count();
        assert_eq!(result.subgraph.node_count(), mapped_nodes);
        assert_eq!(result.subgraph.edge_count(), mapped_edges);
        assert_eq!(mapped_edges, 6);
    }

    #[test]
    fn strategies_agree_on_the_optimum() {
        let pairs = [
            (naphthalene(), benzene()),
            (cyclohexyl_ethanol(), hexane()),
            (two_triangles(), cyclohexane()),
        ];
        for (g1, g2) in pairs {
            let by_edge = max_common_subgraph(&g1, &g2, McsStrategy::ByEdge);
            let by_node = max_common_subgraph(&g1, &g2, McsStrategy::ByNode);
            assert_eq!(by_edge.deletions, by_node.deletions);
            assert_eq!(by_edge.size(), by_node.size());
        }
    }
}
