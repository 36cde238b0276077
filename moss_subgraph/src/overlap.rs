//! Overlap tests between two embeddings of the same pattern.

use std::collections::HashSet;

use moss_common::{EdgeId, Graph, NodeId};
use tracing::trace;

use crate::embedding::Embedding;

/// Do the embeddings share at least one host node?
pub fn overlaps(e1: &Embedding, e2: &Embedding) -> bool {
    if e1.nodes() == e2.nodes() {
        return !e1.is_empty();
    }
    let seen: HashSet<NodeId> = e1.nodes().iter().copied().collect();
    e2.nodes().iter().any(|n| seen.contains(n))
}

/// Do the embeddings overlap in a way that would count one occurrence twice?
///
/// Each pattern edge `k` of `e1` is paired with a same-typed pattern edge `l`
/// of `e2` whose endpoints have the same host images, in either direction.
/// Without any pair the overlap is harmless. Otherwise the paired pattern
/// edges are split into connected components, and the overlap is harmful if
/// some pattern node `i` lands in the same component as the pattern node
/// that `e2` maps onto `e1`'s image of `i`.
pub fn overlaps_harmfully(pattern: &Graph, e1: &Embedding, e2: &Embedding) -> bool {
    let pairs = pair_edges(pattern, e1, e2);
    if pairs.is_empty() {
        return false;
    }

    // node bijection induced by the two embeddings: i -> e2^-1(e1(i))
    let mut inverse2 = vec![None; e2.nodes().iter().map(|n| n.as_usize() + 1).max().unwrap_or(0)];
    for (i, &h) in e2.nodes().iter().enumerate() {
        inverse2[h.as_usize()] = Some(i);
    }
    let sigma = |i: usize| inverse2.get(e1.node(i).as_usize()).copied().flatten();

    let mut comp: Vec<usize> = (0..pattern.node_count()).collect();
    let mut involved = vec![false; pattern.node_count()];
    let edges: Vec<EdgeId> = pairs.iter().flat_map(|&(k, l)| [k, l]).collect();
    for &e in &edges {
        let edge = pattern.edge(e);
        involved[edge.src().as_usize()] = true;
        involved[edge.dst().as_usize()] = true;
    }
    let mut changed = true;
    while changed {
        changed = false;
        for &e in &edges {
            let edge = pattern.edge(e);
            let (a, b) = (edge.src().as_usize(), edge.dst().as_usize());
            let min = comp[a].min(comp[b]);
            if comp[a] != min || comp[b] != min {
                comp[a] = min;
                comp[b] = min;
                changed = true;
            }
        }
    }

    let harmful = (0..pattern.node_count())
        .filter(|&i| involved[i])
        .any(|i| sigma(i).is_some_and(|j| comp[j] == comp[i]));
    trace!("{} paired edges, harmful: {harmful}", pairs.len());
    harmful
}

/// Pairs pattern edges of `e1` with distinct pattern edges of `e2` covering
/// the same host node pair.
fn pair_edges(pattern: &Graph, e1: &Embedding, e2: &Embedding) -> Vec<(EdgeId, EdgeId)> {
    let mut taken = vec![false; pattern.edge_count()];
    let mut pairs = Vec::new();
    for k in pattern.edge_ids() {
        let ek = pattern.edge(k);
        let (a, b) = (e1.node(ek.src().as_usize()), e1.node(ek.dst().as_usize()));
        let found = pattern.edge_ids().find(|&l| {
            let el = pattern.edge(l);
            if taken[l.as_usize()] || el.ty() != ek.ty() {
                return false;
            }
            let (c, d) = (e2.node(el.src().as_usize()), e2.node(el.dst().as_usize()));
            (a == c && b == d) || (a == d && b == c)
        });
        if let Some(l) = found {
            taken[l.as_usize()] = true;
            pairs.push((k, l));
        }
    }
    pairs
}
