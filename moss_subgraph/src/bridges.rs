use moss_common::{BRIDGE, EdgeId, Graph, NodeId};
use tracing::debug;

/// Sets the bridge bit on every edge whose removal disconnects the graph and
/// clears it everywhere else. Returns the number of bridges.
pub fn mark_bridges(graph: &mut Graph) -> usize {
    let bridges = find_bridges(graph);
    for e in graph.edge_ids().collect::<Vec<_>>() {
        let flags = graph.edge_flags(e) & !BRIDGE;
        graph.set_edge_flags(e, flags);
    }
    for &e in &bridges {
        let flags = graph.edge_flags(e) | BRIDGE;
        graph.set_edge_flags(e, flags);
    }
    debug!("marked {} bridges", bridges.len());
    bridges.len()
}

/// The bridges of `graph`, without touching its flags.
pub fn find_bridges(graph: &Graph) -> Vec<EdgeId> {
    let mut search = BridgeSearch {
        graph,
        level: vec![0; graph.node_count()],
        low: vec![0; graph.node_count()],
        bridges: Vec::new(),
        counter: 0,
    };
    for start in graph.node_ids() {
        if search.level[start.as_usize()] == 0 {
            search.visit(start, None);
        }
    }
    search.bridges
}

/// Tarjan low-link state. Levels start at 1; 0 means unvisited.
struct BridgeSearch<'g> {
    graph: &'g Graph,
    level: Vec<usize>,
    low: Vec<usize>,
    bridges: Vec<EdgeId>,
    counter: usize,
}

impl BridgeSearch<'_> {
    fn visit(&mut self, node: NodeId, via: Option<EdgeId>) {
        self.counter += 1;
        let n = node.as_usize();
        self.level[n] = self.counter;
        self.low[n] = self.counter;
        for &e in self.graph.incident(node) {
            if Some(e) == via {
                continue;
            }
            let other = self.graph.opposite(e, node);
            let o = other.as_usize();
            if self.level[o] == 0 {
                self.visit(other, Some(e));
                self.low[n] = self.low[n].min(self.low[o]);
                if self.low[o] > self.level[n] {
                    self.bridges.push(e);
                }
            } else {
                self.low[n] = self.low[n].min(self.level[o]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moss_common::*;

    #[test]
    fn chain_edges_are_all_bridges() {
        let mut g = hexane();
        assert_eq!(mark_bridges(&mut g), 5);
        assert!(g.edges().iter().all(Edge::is_bridge));
    }

    #[test]
    fn ring_edges_are_not_bridges() {
        let mut g = cyclohexyl_ethanol();
        assert_eq!(mark_bridges(&mut g), 2);
        assert!(!g.edge(EdgeId::new(0)).is_bridge());
    }

    #[test]
    fn remarking_clears_stale_bits() {
        let mut g = benzene();
        g.set_edge_flags(EdgeId::new(2), BRIDGE | 0b1);
        assert_eq!(mark_bridges(&mut g), 0);
        assert_eq!(g.edge_flags(EdgeId::new(2)), 0b1);
    }
}
