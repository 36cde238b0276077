//! Pattern enumeration over attributed graphs.
//!
//! This module finds every occurrence of a pattern graph inside a host graph.
//! The search maps a root node first and then walks the pattern edges in
//! breadth-first order, scanning the sorted adjacency list of the already
//! mapped endpoint. Since both adjacency lists are sorted by
//! `(edge type, neighbor type)`, the scan stops as soon as the host key
//! passes the pattern key.

use std::collections::VecDeque;

use moss_common::{Config, EdgeId, Graph, MatchMode, NodeId};
use tracing::{debug, trace};

use crate::embedding::{Embedding, EmbeddingSet};
use crate::state::MatchState;

/// One pattern edge to map, leaving from an already mapped node.
#[derive(Clone, Copy, Debug)]
struct Step {
    edge: EdgeId,
    from: NodeId,
    to: NodeId,
}

/// Order in which the pattern is mapped.
#[derive(Clone, Debug)]
struct Plan {
    root: NodeId,
    steps: Vec<Step>,
}

impl Plan {
    /// Breadth-first plan from the type-minimal non-chain node. `None` if the
    /// pattern is empty or disconnected.
    fn build(pattern: &Graph) -> Option<Self> {
        let root = pattern.node_ids().min_by_key(|&n| {
            let ty = pattern.node_type(n);
            (ty.is_chain(), ty)
        })?;
        let mut seen_node = vec![false; pattern.node_count()];
        let mut seen_edge = vec![false; pattern.edge_count()];
        let mut steps = Vec::with_capacity(pattern.edge_count());
        let mut queue = VecDeque::from([root]);
        seen_node[root.as_usize()] = true;
        let mut reached = 1;
        while let Some(from) = queue.pop_front() {
            for &edge in pattern.incident(from) {
                if std::mem::replace(&mut seen_edge[edge.as_usize()], true) {
                    continue;
                }
                let to = pattern.opposite(edge, from);
                steps.push(Step { edge, from, to });
                if !std::mem::replace(&mut seen_node[to.as_usize()], true) {
                    reached += 1;
                    queue.push_back(to);
                }
            }
        }
        (reached == pattern.node_count()).then_some(Self { root, steps })
    }
}

/// Entry point for pattern enumeration.
pub struct SubgraphMatcher<'p, 'h, 'cfg> {
    /// The pattern to search for.
    pattern: &'p Graph,
    /// The graph to search within.
    host: &'h Graph,
    config: &'cfg Config,
}

impl<'p, 'h, 'cfg> SubgraphMatcher<'p, 'h, 'cfg> {
    /// Sets up a search of `pattern` in `host`.
    pub fn new(pattern: &'p Graph, host: &'h Graph, config: &'cfg Config) -> Self {
        Self {
            pattern,
            host,
            config,
        }
    }

    /// Enumerates the embeddings of `pattern` in `host`.
    ///
    /// Both graphs must be prepared; the pattern must be connected.
    pub fn enumerate_all(pattern: &'p Graph, host: &'h Graph, config: &'cfg Config) -> EmbeddingSet {
        Self::new(pattern, host, config).enumerate()
    }

    /// Runs the search configured at construction.
    #[contracts::debug_requires(self.host.is_prepared(), "host must be prepared")]
    #[contracts::debug_requires(self.pattern.is_prepared(), "pattern must be prepared")]
    pub fn enumerate(&self) -> EmbeddingSet {
        let (pattern, host) = (self.pattern, self.host);
        if pattern.is_empty()
            || pattern.node_count() > host.node_count()
            || pattern.edge_count() > host.edge_count()
        {
            debug!(
                "pattern ({} nodes, {} edges) cannot fit host ({} nodes, {} edges)",
                pattern.node_count(),
                pattern.edge_count(),
                host.node_count(),
                host.edge_count()
            );
            return EmbeddingSet::new();
        }
        if pattern.node_count() == 1 {
            return self.enumerate_single_node();
        }
        let Some(plan) = Plan::build(pattern) else {
            debug!("pattern is disconnected, nothing to enumerate");
            return EmbeddingSet::new();
        };

        let mut core = MatcherCore {
            pattern,
            host,
            mode: self.config.match_mode,
            symmetric_bond: is_symmetric_bond(pattern),
            state: MatchState::new(
                pattern.node_count(),
                pattern.edge_count(),
                host.node_count(),
                host.edge_count(),
            ),
            found: EmbeddingSet::new(),
            steps: plan.steps,
        };
        let root_ty = pattern.node_type(plan.root);
        let root_degree = pattern.degree(plan.root);
        for h in host.node_ids() {
            if !root_ty.matches(host.node_type(h)) || host.degree(h) < root_degree {
                continue;
            }
            core.state.map_node(plan.root, h);
            let stop = core.match_step(0);
            core.state.unmap_node(plan.root);
            if stop {
                break;
            }
        }
        debug_assert!(core.state.is_clear());
        debug!(
            "enumeration found {} embeddings ({:?})",
            core.found.len(),
            self.config.match_mode
        );
        core.found
    }

    fn enumerate_single_node(&self) -> EmbeddingSet {
        let ty = self.pattern.node_type(NodeId::new(0));
        let matches = self
            .host
            .node_ids()
            .filter(|&h| ty.matches(self.host.node_type(h)))
            .map(|h| Embedding::new(vec![h], Vec::new()));
        match self.config.match_mode {
            MatchMode::All => matches.collect(),
            MatchMode::First => matches.take(1).collect(),
        }
    }
}

/// A single edge between two nodes of the same type has a flip automorphism;
/// such a bond is reported once per host edge instead of once per direction,
/// marked as [mirrored](Embedding::is_mirrored).
fn is_symmetric_bond(pattern: &Graph) -> bool {
    pattern.node_count() == 2
        && pattern.edge_count() == 1
        && pattern.node_type(NodeId::new(0)) == pattern.node_type(NodeId::new(1))
}

/// Mutable search state of one enumeration.
struct MatcherCore<'p, 'h> {
    pattern: &'p Graph,
    host: &'h Graph,
    mode: MatchMode,
    symmetric_bond: bool,
    state: MatchState,
    found: EmbeddingSet,
    steps: Vec<Step>,
}

impl MatcherCore<'_, '_> {
    /// Maps plan step `index` and everything after it. Returns `true` when
    /// the search should stop.
    fn match_step(&mut self, index: usize) -> bool {
        let Some(&Step { edge: pe, from: pa, to: pb }) = self.steps.get(index) else {
            return self.emit();
        };
        if self.state.edge_image(pe).is_some() {
            // consumed together with a chain node
            return self.match_step(index + 1);
        }
        let Some(ha) = self.state.node_image(pa) else {
            return false;
        };
        if let Some(hb) = self.state.node_image(pb) {
            return self.close_ring(index, pe, ha, hb);
        }
        let pb_ty = self.pattern.node_type(pb);
        if pb_ty.is_chain() && self.pattern.degree(pb) == 2 {
            return self.match_chain(index, pe, ha, pb);
        }

        let (pattern, host) = (self.pattern, self.host);
        let pe_ty = pattern.edge_type(pe);
        let pb_degree = pattern.degree(pb);
        for &he in host.incident(ha) {
            if self.state.is_edge_used(he) {
                continue;
            }
            let hb = host.opposite(he, ha);
            let he_ty = host.edge_type(he);
            let hb_ty = host.node_type(hb);
            match (pe_ty.match_key(), pb_ty.match_key()) {
                (Some(ek), Some(nk)) => {
                    let key = (he_ty.raw(), hb_ty.raw());
                    if key > (ek, nk) {
                        break;
                    }
                    if key != (ek, nk) {
                        continue;
                    }
                }
                (Some(ek), None) => {
                    if he_ty.raw() > ek {
                        break;
                    }
                    if he_ty.raw() != ek {
                        continue;
                    }
                }
                (None, _) => {
                    if !pb_ty.matches(hb_ty) {
                        continue;
                    }
                }
            }
            if self.state.is_node_used(hb) || host.degree(hb) < pb_degree {
                continue;
            }
            trace!("step {index}: {pe} -> {he}, {pb} -> {hb}");
            self.state.map_node(pb, hb);
            self.state.map_edge(pe, he);
            let stop = self.match_step(index + 1);
            self.state.unmap_edge(pe);
            self.state.unmap_node(pb);
            if stop {
                return true;
            }
        }
        false
    }

    /// Both endpoints are mapped: find an unused host edge between them.
    fn close_ring(&mut self, index: usize, pe: EdgeId, ha: NodeId, hb: NodeId) -> bool {
        let pe_ty = self.pattern.edge_type(pe);
        let host = self.host;
        for &he in host.incident(ha) {
            if self.state.is_edge_used(he)
                || host.opposite(he, ha) != hb
                || !pe_ty.matches(host.edge_type(he))
            {
                continue;
            }
            self.state.map_edge(pe, he);
            let stop = self.match_step(index + 1);
            self.state.unmap_edge(pe);
            if stop {
                return true;
            }
        }
        false
    }

    /// Maps chain node `pb` onto a run of same-typed degree-2 host nodes
    /// starting next to `ha`. Both pattern edges of the chain and the node
    /// past its far end are mapped in one go; the run interior is reserved.
    fn match_chain(&mut self, index: usize, pe: EdgeId, ha: NodeId, pb: NodeId) -> bool {
        let (pattern, host) = (self.pattern, self.host);
        let Some(&pe_exit) = pattern.incident(pb).iter().find(|&&e| e != pe) else {
            return false;
        };
        let pc = pattern.opposite(pe_exit, pb);
        let chain_ty = pattern.node_type(pb);
        let pe_ty = pattern.edge_type(pe);
        for &he in host.incident(ha) {
            if self.state.is_edge_used(he) || !pe_ty.matches(host.edge_type(he)) {
                continue;
            }
            let h1 = host.opposite(he, ha);
            if self.state.is_node_used(h1) || host.degree(h1) != 2 || !chain_ty.matches(host.node_type(h1)) {
                continue;
            }
            self.state.map_node(pb, h1);
            self.state.map_edge(pe, he);
            let stop = self.finish_chain(index, h1, he, pe_exit, pc);
            self.state.unmap_edge(pe);
            self.state.unmap_node(pb);
            if stop {
                return true;
            }
        }
        false
    }

    fn finish_chain(&mut self, index: usize, h1: NodeId, entry: EdgeId, pe_exit: EdgeId, pc: NodeId) -> bool {
        let host = self.host;
        let run_node_ty = host.node_type(h1);
        let run_edge_ty = host.edge_type(entry);
        let mut interior_nodes = Vec::new();
        let mut interior_edges = Vec::new();
        let (mut last, mut via) = (h1, entry);
        let (exit, term) = loop {
            let Some(&next_edge) = host.incident(last).iter().find(|&&e| e != via) else {
                return false;
            };
            let next = host.opposite(next_edge, last);
            let continues = host.degree(next) == 2
                && host.node_type(next) == run_node_ty
                && host.edge_type(next_edge) == run_edge_ty
                && !self.state.is_node_used(next)
                && !self.state.is_edge_used(next_edge)
                && !interior_nodes.contains(&next);
            if !continues {
                break (next_edge, next);
            }
            interior_nodes.push(next);
            interior_edges.push(next_edge);
            last = next;
            via = next_edge;
        };
        if self.state.is_edge_used(exit) || !self.pattern.edge_type(pe_exit).matches(host.edge_type(exit)) {
            return false;
        }
        let map_term = match self.state.node_image(pc) {
            Some(hc) if hc == term => false,
            Some(_) => return false,
            None => {
                if self.state.is_node_used(term)
                    || !self.pattern.node_type(pc).matches(host.node_type(term))
                    || host.degree(term) < self.pattern.degree(pc)
                {
                    return false;
                }
                true
            }
        };
        trace!(
            "step {index}: chain of {} nodes from {h1} to {term}",
            interior_nodes.len() + 1
        );
        self.state.reserve(&interior_nodes, &interior_edges, true);
        self.state.map_edge(pe_exit, exit);
        if map_term {
            self.state.map_node(pc, term);
        }
        let stop = self.match_step(index + 1);
        if map_term {
            self.state.unmap_node(pc);
        }
        self.state.unmap_edge(pe_exit);
        self.state.reserve(&interior_nodes, &interior_edges, false);
        stop
    }

    fn emit(&mut self) -> bool {
        if !self.state.done() {
            return false;
        }
        let (nodes, edges) = self.state.images();
        if !self.symmetric_bond {
            self.found.push(Embedding::new(nodes, edges));
        } else if nodes[0] < nodes[1] {
            self.found.push(Embedding::mirrored(nodes, edges));
        } else {
            return false;
        }
        self.mode == MatchMode::First
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moss_common::{NodeType, bonds, elements, ring_of};

    fn prepared(mut graph: Graph) -> Graph {
        assert!(graph.prepare_embed());
        graph
    }

    fn embed(pattern: &Graph, host: &Graph) -> EmbeddingSet {
        SubgraphMatcher::enumerate_all(pattern, host, &Config::default())
    }

    #[test]
    fn plan_covers_every_edge_once() {
        let pattern = prepared(moss_common::acetic_acid());
        let plan = Plan::build(&pattern).unwrap();
        assert_eq!(plan.root, NodeId::new(0));
        let mut edges: Vec<_> = plan.steps.iter().map(|s| s.edge).collect();
        edges.sort();
        assert_eq!(edges, pattern.edge_ids().collect::<Vec<_>>());
    }

    #[test]
    fn disconnected_pattern_has_no_plan() {
        let pattern = Graph::from_parts(&[elements::C, elements::C], &[]).unwrap();
        assert!(Plan::build(&pattern).is_none());
        let mut host = moss_common::ethanol();
        host.prepare();
        assert!(embed(&pattern, &host).is_empty());
    }

    #[test]
    fn wildcard_edge_matches_any_bond() {
        let pattern = prepared(
            Graph::from_parts(&[elements::C, elements::O], &[(0, 1, moss_common::EdgeType::ANY)]).unwrap(),
        );
        let mut host = moss_common::acetic_acid();
        host.prepare();
        assert_eq!(embed(&pattern, &host).len(), 2);
    }

    #[test]
    fn wildcard_node_behind_a_concrete_edge() {
        let pattern = prepared(Graph::from_parts(&[elements::C, NodeType::ANY], &[(0, 1, bonds::DOUBLE)]).unwrap());
        let mut host = moss_common::acetic_acid();
        host.prepare();
        let found = embed(&pattern, &host);
        assert_eq!(found.len(), 1);
        assert_eq!(host.node_type(found.items[0].node(1)), elements::O);
    }

    #[test]
    fn chain_node_spans_runs_of_any_length() {
        // O-C~-O pattern: the chain matches the carbons between two oxygens
        let chain = elements::C.with(NodeType::CHAIN);
        let pattern = prepared(
            Graph::from_parts(&[elements::O, chain, elements::O], &[(0, 1, bonds::SINGLE), (1, 2, bonds::SINGLE)])
                .unwrap(),
        );
        for carbons in 1..=4u32 {
            let mut host = Graph::new();
            host.add_node(elements::O);
            for _ in 0..carbons {
                host.add_node(elements::C);
            }
            host.add_node(elements::O);
            for i in 0..=carbons {
                host.add_edge(NodeId::new(i), NodeId::new(i + 1), bonds::SINGLE).unwrap();
            }
            host.prepare();
            // one embedding per direction of the run
            assert_eq!(embed(&pattern, &host).len(), 2, "{carbons} carbons");
        }
    }

    #[test]
    fn chain_stops_at_branching_atoms() {
        let chain = elements::C.with(NodeType::CHAIN);
        let pattern = prepared(
            Graph::from_parts(&[elements::O, chain, elements::O], &[(0, 1, bonds::SINGLE), (1, 2, bonds::SINGLE)])
                .unwrap(),
        );
        // O-C-C(-C)-C-O: the branch point has degree 3 and ends the run
        let mut host = Graph::from_parts(
            &[elements::O, elements::C, elements::C, elements::C, elements::C, elements::O],
            &[
                (0, 1, bonds::SINGLE),
                (1, 2, bonds::SINGLE),
                (2, 3, bonds::SINGLE),
                (2, 4, bonds::SINGLE),
                (4, 5, bonds::SINGLE),
            ],
        )
        .unwrap();
        host.prepare();
        assert!(embed(&pattern, &host).is_empty());
    }

    #[test]
    fn equal_typed_bond_is_reported_once_and_mirrored() {
        let pattern = prepared(Graph::from_parts(&[elements::C, elements::C], &[(0, 1, bonds::SINGLE)]).unwrap());
        let mut host = moss_common::ethanol();
        host.prepare();
        let found = embed(&pattern, &host);
        assert_eq!(found.len(), 1);
        assert!(found.items[0].is_mirrored());
        assert!(found.items[0].node(0) < found.items[0].node(1));

        let mixed = prepared(Graph::from_parts(&[elements::C, elements::O], &[(0, 1, bonds::SINGLE)]).unwrap());
        assert!(embed(&mixed, &host).iter().all(|e| !e.is_mirrored()));
    }

    #[test]
    fn ring_pattern_needs_ring_closure() {
        let pattern = prepared(ring_of(5, elements::C, bonds::SINGLE));
        let mut host = moss_common::cyclohexane();
        host.prepare();
        assert!(embed(&pattern, &host).is_empty());
        let mut five = ring_of(5, elements::C, bonds::SINGLE);
        five.prepare();
        assert_eq!(embed(&pattern, &five).len(), 10);
    }
}
