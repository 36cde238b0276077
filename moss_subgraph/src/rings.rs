//! Ring detection.
//!
//! Every simple cycle whose edge count lies in the requested window gets one
//! bit of the 63-bit ring mask stored in [`Edge::flags`](moss_common::Edge::flags).
//! Bits are handed out greedily: a ring takes the lowest bit that no edge
//! touching its nodes carries yet. Only node-disjoint rings share a bit, so
//! the edges carrying one bit fall apart into exactly the rings that own it.

use std::collections::HashSet;

use moss_common::{BRIDGE, EdgeId, EdgeType, Graph, MAX_RINGS, NodeId, NodeType, RING_BITS};
use tracing::{debug, trace, warn};

/// Outcome of a ring marking pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RingCount {
    /// Rings that received a bit.
    pub rings: usize,
    /// At least one ring found no free bit and was left unmarked.
    pub exhausted: bool,
}

impl RingCount {
    /// The ring count, negated if bits ran out.
    pub fn signed(self) -> i64 {
        let rings = self.rings as i64;
        if self.exhausted { -rings } else { rings }
    }
}

/// Marks all rings with `min..=max` edges.
///
/// Existing ring masks are cleared first. With `type_flag`, the ring flag is
/// also cleared from every node and edge type and then set on every ring
/// edge and its endpoints, after which the graph is re-prepared. An empty
/// window (`max < 3` or `min > max`) just clears.
pub fn mark_rings(graph: &mut Graph, min: usize, max: usize, type_flag: bool) -> RingCount {
    for e in graph.edge_ids().collect::<Vec<_>>() {
        let flags = graph.edge_flags(e) & BRIDGE;
        graph.set_edge_flags(e, flags);
    }
    if type_flag {
        clear_ring_types(graph);
    }
    let lo = min.max(3);
    let count = if lo > max {
        RingCount::default()
    } else {
        let active = vec![true; graph.edge_count()];
        let masks = vec![0; graph.edge_count()];
        RingSearch::new(graph, active, masks, lo, max).run()
    };
    let RingCount { rings, .. } = count;
    if type_flag {
        set_ring_types(graph);
    }
    if count.exhausted {
        warn!("ring bits exhausted after {rings} rings");
    }
    debug!("marked {rings} rings of size {min}..={max}");
    count
}

/// Marks rings of `3..=max` edges made only of edges already on a ring.
///
/// Used after [`mark_rings`] to record small rings inside ring systems
/// without changing any type. Rings that are already marked are skipped.
pub fn mark_pseudo_rings(graph: &mut Graph, max: usize) -> RingCount {
    if max < 3 {
        return RingCount::default();
    }
    let masks: Vec<u64> = graph.edge_ids().map(|e| graph.edge_flags(e) & RING_BITS).collect();
    let active = masks.iter().map(|&m| m != 0).collect();
    let known = marked_rings(graph, &masks);
    let count = RingSearch::new(graph, active, masks, 3, max).with_known(known).run();
    debug!("marked {} pseudo rings of size 3..={max}", count.rings);
    count
}

/// Recovers the rings behind existing masks, each as its sorted edge list.
fn marked_rings(graph: &Graph, masks: &[u64]) -> HashSet<Vec<EdgeId>> {
    let all = masks.iter().fold(0, |acc, m| acc | m);
    let mut known = HashSet::new();
    for bit in (0..MAX_RINGS).map(|b| 1u64 << b).filter(|bit| all & bit != 0) {
        let mut taken = vec![false; masks.len()];
        for start in graph.edge_ids() {
            if masks[start.as_usize()] & bit == 0 || taken[start.as_usize()] {
                continue;
            }
            taken[start.as_usize()] = true;
            let mut stack = vec![start];
            let mut ring = Vec::new();
            while let Some(e) = stack.pop() {
                ring.push(e);
                let edge = graph.edge(e);
                for n in [edge.src(), edge.dst()] {
                    for &f in graph.incident(n) {
                        if masks[f.as_usize()] & bit != 0 && !taken[f.as_usize()] {
                            taken[f.as_usize()] = true;
                            stack.push(f);
                        }
                    }
                }
            }
            ring.sort_unstable();
            known.insert(ring);
        }
    }
    known
}

fn clear_ring_types(graph: &mut Graph) {
    for n in graph.node_ids().collect::<Vec<_>>() {
        let ty = graph.node_type(n).without(NodeType::RING);
        graph.set_node_type(n, ty);
    }
    for e in graph.edge_ids().collect::<Vec<_>>() {
        let ty = graph.edge_type(e).without(EdgeType::RING);
        graph.set_edge_type(e, ty);
    }
}

fn set_ring_types(graph: &mut Graph) {
    for e in graph.edge_ids().collect::<Vec<_>>() {
        if graph.edge_flags(e) & RING_BITS == 0 {
            continue;
        }
        let ty = graph.edge_type(e).with(EdgeType::RING);
        graph.set_edge_type(e, ty);
        let edge = graph.edge(e);
        for n in [edge.src(), edge.dst()] {
            let ty = graph.node_type(n).with(NodeType::RING);
            graph.set_node_type(n, ty);
        }
    }
    graph.prepare();
}

/// Cycle search over the active edges; all scratch state is local.
struct RingSearch<'g> {
    graph: &'g mut Graph,
    /// Edges still taking part in the search.
    active: Vec<bool>,
    /// Active incident edges per node.
    degree: Vec<usize>,
    /// Ring mask per edge, written back at the end.
    masks: Vec<u64>,
    /// Rings holding a bit, as sorted edge lists.
    known: HashSet<Vec<EdgeId>>,
    min: usize,
    max: usize,
    count: RingCount,
}

impl<'g> RingSearch<'g> {
    fn new(graph: &'g mut Graph, active: Vec<bool>, masks: Vec<u64>, min: usize, max: usize) -> Self {
        let degree = graph
            .node_ids()
            .map(|n| graph.incident(n).iter().filter(|e| active[e.as_usize()]).count())
            .collect();
        Self {
            graph,
            active,
            degree,
            masks,
            known: HashSet::new(),
            min,
            max,
            count: RingCount::default(),
        }
    }

    fn with_known(mut self, known: HashSet<Vec<EdgeId>>) -> Self {
        self.known = known;
        self
    }

    fn run(mut self) -> RingCount {
        let all: Vec<NodeId> = self.graph.node_ids().collect();
        self.prune(all);
        for e in 0..self.graph.edge_count() {
            let e = EdgeId::from(e);
            if !self.active[e.as_usize()] {
                continue;
            }
            for cycle in self.cycles_through(e) {
                self.assign_bit(&cycle);
            }
            let edge = self.graph.edge(e);
            let ends = vec![edge.src(), edge.dst()];
            self.deactivate(e);
            self.prune(ends);
        }
        for (i, &mask) in self.masks.iter().enumerate() {
            let e = EdgeId::from(i);
            let flags = self.graph.edge_flags(e) & BRIDGE | mask;
            self.graph.set_edge_flags(e, flags);
        }
        self.count
    }

    fn deactivate(&mut self, e: EdgeId) {
        if !std::mem::replace(&mut self.active[e.as_usize()], false) {
            return;
        }
        let edge = self.graph.edge(e);
        self.degree[edge.src().as_usize()] -= 1;
        self.degree[edge.dst().as_usize()] -= 1;
    }

    /// Repeatedly removes the active edge of any node left with degree 1.
    fn prune(&mut self, mut pending: Vec<NodeId>) {
        while let Some(n) = pending.pop() {
            if self.degree[n.as_usize()] != 1 {
                continue;
            }
            let Some(&e) = self
                .graph
                .incident(n)
                .iter()
                .find(|e| self.active[e.as_usize()])
            else {
                continue;
            };
            let other = self.graph.opposite(e, n);
            self.deactivate(e);
            pending.push(other);
        }
    }

    /// All simple cycles of `min..=max` edges containing `e`.
    fn cycles_through(&self, e: EdgeId) -> Vec<Vec<EdgeId>> {
        let edge = self.graph.edge(e);
        let (src, dst) = (edge.src(), edge.dst());
        let mut on_path = vec![false; self.graph.node_count()];
        let mut path = vec![e];
        let mut cycles = Vec::new();
        on_path[src.as_usize()] = true;
        self.extend_path(src, dst, &mut on_path, &mut path, &mut cycles);
        cycles
    }

    fn extend_path(
        &self,
        node: NodeId,
        target: NodeId,
        on_path: &mut [bool],
        path: &mut Vec<EdgeId>,
        cycles: &mut Vec<Vec<EdgeId>>,
    ) {
        for &e in self.graph.incident(node) {
            if !self.active[e.as_usize()] || path.contains(&e) {
                continue;
            }
            let next = self.graph.opposite(e, node);
            if next == target {
                if path.len() + 1 >= self.min {
                    let mut cycle = path.clone();
                    cycle.push(e);
                    cycles.push(cycle);
                }
                continue;
            }
            // a path of len edges still needs at least one more to close
            if on_path[next.as_usize()] || path.len() + 2 > self.max {
                continue;
            }
            on_path[next.as_usize()] = true;
            path.push(e);
            self.extend_path(next, target, on_path, path, cycles);
            path.pop();
            on_path[next.as_usize()] = false;
        }
    }

    fn assign_bit(&mut self, cycle: &[EdgeId]) {
        let mut key = cycle.to_vec();
        key.sort_unstable();
        if self.known.contains(&key) {
            trace!("cycle of {} edges already marked", cycle.len());
            return;
        }
        let used = cycle
            .iter()
            .flat_map(|&e| {
                let edge = self.graph.edge(e);
                [edge.src(), edge.dst()]
            })
            .flat_map(|n| self.graph.incident(n))
            .fold(0, |acc, f| acc | self.masks[f.as_usize()]);
        let free = !used & RING_BITS;
        if free == 0 {
            self.count.exhausted = true;
            return;
        }
        let bit = 1u64 << free.trailing_zeros();
        debug_assert!(free.trailing_zeros() < MAX_RINGS);
        for e in cycle {
            self.masks[e.as_usize()] |= bit;
        }
        self.known.insert(key);
        self.count.rings += 1;
        trace!("cycle of {} edges gets ring bit {}", cycle.len(), free.trailing_zeros());
    }
}
