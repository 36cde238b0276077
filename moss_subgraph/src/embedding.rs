//! Embeddings and their growth by one edge.

use std::collections::HashSet;

use moss_common::{EdgeId, EdgeType, Graph, NodeId, NodeType};
use tracing::trace;

/// One occurrence of a pattern inside a host graph.
///
/// `nodes[i]` is the image of pattern node `i` and `edges[j]` the image of
/// pattern edge `j`. A chain node maps to the first host node of its run.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Embedding {
    nodes: Vec<NodeId>,
    edges: Vec<EdgeId>,
    /// Stands for both orientations of a bond between equal node types.
    mirrored: bool,
}

impl Embedding {
    /// Builds an embedding from node and edge images.
    #[contracts::debug_requires(!nodes.is_empty())]
    pub fn new(nodes: Vec<NodeId>, edges: Vec<EdgeId>) -> Self {
        Self {
            nodes,
            edges,
            mirrored: false,
        }
    }

    /// A single-bond embedding whose swapped image was not enumerated.
    #[contracts::debug_requires(nodes.len() == 2 && edges.len() == 1)]
    pub(crate) fn mirrored(nodes: Vec<NodeId>, edges: Vec<EdgeId>) -> Self {
        Self {
            nodes,
            edges,
            mirrored: true,
        }
    }

    /// Does this embedding also stand for its swapped image?
    #[must_use]
    pub const fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// Node images, indexed by pattern node.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Edge images, indexed by pattern edge.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Image of pattern node `index`.
    pub fn node(&self, index: usize) -> NodeId {
        self.nodes[index]
    }

    /// Image of pattern edge `index`.
    pub fn edge(&self, index: usize) -> EdgeId {
        self.edges[index]
    }

    /// Number of mapped nodes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true for an embedding built by the matcher.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Is `node` the image of some pattern node?
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Is `edge` the image of some pattern edge?
    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.edges.contains(&edge)
    }

    /// Sorted host node ids; equal for embeddings covering the same atoms.
    pub fn signature(&self) -> Vec<usize> {
        let mut sig: Vec<usize> = self.nodes.iter().map(|n| n.as_usize()).collect();
        sig.sort_unstable();
        sig
    }

    /// Re-embeds the pattern grown by one edge.
    ///
    /// The new pattern edge starts at pattern node `src` and has type
    /// `edge_ty`. With `dst = Some(j)` it closes a ring to pattern node `j`;
    /// with `None` it leads to a new node of type `node_ty`, which becomes
    /// the last node of every returned embedding.
    ///
    /// A mirrored bond is grown from both of its orientations.
    pub fn extend(
        &self,
        host: &Graph,
        src: usize,
        dst: Option<usize>,
        edge_ty: EdgeType,
        node_ty: NodeType,
    ) -> EmbeddingSet {
        let mut out = self.grow(&self.nodes, host, src, dst, edge_ty, node_ty);
        if self.mirrored {
            let swapped = [self.nodes[1], self.nodes[0]];
            out.items.extend(self.grow(&swapped, host, src, dst, edge_ty, node_ty));
        }
        out
    }

    fn grow(
        &self,
        images: &[NodeId],
        host: &Graph,
        src: usize,
        dst: Option<usize>,
        edge_ty: EdgeType,
        node_ty: NodeType,
    ) -> EmbeddingSet {
        let from = images[src];
        let mut out = EmbeddingSet::new();
        for &e in host.incident(from) {
            if self.contains_edge(e) || !edge_ty.matches(host.edge_type(e)) {
                continue;
            }
            let to = host.opposite(e, from);
            let mut nodes = images.to_vec();
            match dst {
                Some(j) if images[j] == to => {}
                Some(_) => continue,
                None => {
                    if self.contains_node(to) || !node_ty.matches(host.node_type(to)) {
                        continue;
                    }
                    nodes.push(to);
                }
            }
            let mut edges = self.edges.clone();
            edges.push(e);
            out.push(Self::new(nodes, edges));
        }
        trace!("extend from {from}: {} embeddings", out.len());
        out
    }
}

/// The embeddings found by one enumeration, in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmbeddingSet {
    /// The embeddings themselves.
    pub items: Vec<Embedding>,
}

impl EmbeddingSet {
    /// An empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends one embedding.
    pub fn push(&mut self, embedding: Embedding) {
        self.items.push(embedding);
    }

    /// Returns the count of found embeddings.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing was found.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates in discovery order.
    pub fn iter(&self) -> std::slice::Iter<'_, Embedding> {
        self.items.iter()
    }

    /// Extends every embedding by one edge; see [`Embedding::extend`].
    pub fn extend(
        &self,
        host: &Graph,
        src: usize,
        dst: Option<usize>,
        edge_ty: EdgeType,
        node_ty: NodeType,
    ) -> Self {
        Self {
            items: self
                .items
                .iter()
                .flat_map(|emb| emb.extend(host, src, dst, edge_ty, node_ty).items)
                .collect(),
        }
    }

    /// Keeps the first embedding per host node set.
    pub fn dedupe(&mut self) {
        let mut seen: HashSet<Vec<usize>> = HashSet::new();
        self.items.retain(|emb| seen.insert(emb.signature()));
    }
}

impl IntoIterator for EmbeddingSet {
    type Item = Embedding;
    type IntoIter = std::vec::IntoIter<Embedding>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a EmbeddingSet {
    type Item = &'a Embedding;
    type IntoIter = std::slice::Iter<'a, Embedding>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Embedding> for EmbeddingSet {
    fn from_iter<T: IntoIterator<Item = Embedding>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moss_common::{bonds, elements, ethanol};

    fn ids(nodes: &[u32]) -> Vec<NodeId> {
        nodes.iter().copied().map(NodeId::new).collect()
    }

    #[test]
    fn extend_adds_a_new_node() {
        let host = ethanol();
        // C-C mapped onto host atoms 0 and 1 through edge 0
        let emb = Embedding::new(ids(&[0, 1]), vec![EdgeId::new(0)]);
        let grown = emb.extend(&host, 1, None, bonds::SINGLE, elements::O);
        assert_eq!(grown.len(), 1);
        assert_eq!(grown.items[0].nodes(), ids(&[0, 1, 2]).as_slice());
        assert_eq!(grown.items[0].edges(), &[EdgeId::new(0), EdgeId::new(1)]);
        assert!(emb.extend(&host, 1, None, bonds::DOUBLE, elements::O).is_empty());
    }

    #[test]
    fn extend_closes_rings_only_onto_the_requested_node() {
        let mut host = Graph::new();
        for _ in 0..3 {
            host.add_node(elements::C);
        }
        for (a, b) in [(0, 1), (1, 2), (2, 0)] {
            host.add_edge(NodeId::new(a), NodeId::new(b), bonds::SINGLE).unwrap();
        }
        let emb = Embedding::new(ids(&[0, 1, 2]), vec![EdgeId::new(0), EdgeId::new(1)]);
        let closed = emb.extend(&host, 2, Some(0), bonds::SINGLE, NodeType::ANY);
        assert_eq!(closed.len(), 1);
        assert_eq!(closed.items[0].edge(2), EdgeId::new(2));
        assert!(emb.extend(&host, 2, Some(1), bonds::SINGLE, NodeType::ANY).is_empty());
    }

    #[test]
    fn mirrored_bond_grows_from_both_orientations() {
        // C0-C1 with an oxygen on C0
        let host = Graph::from_parts(
            &[elements::C, elements::C, elements::O],
            &[(0, 1, bonds::SINGLE), (0, 2, bonds::SINGLE)],
        )
        .unwrap();
        let plain = Embedding::new(ids(&[0, 1]), vec![EdgeId::new(0)]);
        let mirrored = Embedding::mirrored(ids(&[0, 1]), vec![EdgeId::new(0)]);
        assert!(mirrored.is_mirrored() && !plain.is_mirrored());

        assert!(plain.extend(&host, 1, None, bonds::SINGLE, elements::O).is_empty());
        let grown = mirrored.extend(&host, 1, None, bonds::SINGLE, elements::O);
        assert_eq!(grown.len(), 1);
        assert_eq!(grown.items[0].nodes(), ids(&[1, 0, 2]).as_slice());
        assert!(!grown.items[0].is_mirrored());

        let grown = mirrored.extend(&host, 0, None, bonds::SINGLE, elements::O);
        assert_eq!(grown.len(), 1);
        assert_eq!(grown.items[0].nodes(), ids(&[0, 1, 2]).as_slice());
    }

    #[test]
    fn dedupe_keeps_one_embedding_per_node_set() {
        let mut set: EmbeddingSet = [
            Embedding::new(ids(&[0, 1]), vec![EdgeId::new(0)]),
            Embedding::new(ids(&[1, 0]), vec![EdgeId::new(0)]),
            Embedding::new(ids(&[1, 2]), vec![EdgeId::new(1)]),
        ]
        .into_iter()
        .collect();
        set.dedupe();
        assert_eq!(set.len(), 2);
        assert_eq!(set.items[1].signature(), vec![1, 2]);
    }
}
