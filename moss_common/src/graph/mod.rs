//! The attributed graph model shared by every algorithm in the workspace.
//!
//! Nodes and edges live in two arenas owned by [`Graph`] and refer to each
//! other by [`NodeId`] / [`EdgeId`]. Nothing outside the graph holds a
//! reference into it, only ids.

mod edge;
mod ids;
mod node;
mod record;
mod recoder;
mod types;

pub use edge::{BRIDGE, Edge, MAX_RINGS, RING_BITS};
pub use ids::{EdgeId, NodeId};
pub use node::{MARK_CLEAR, MARK_EXCLUDED, Node};
pub use record::GraphRecord;
pub use recoder::Recoder;
pub use types::{EdgeType, NodeType, bonds, elements};

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use itertools::Itertools;
use tracing::trace;

use crate::GraphError;

/// An undirected graph with typed nodes and edges.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    recoder: Option<Arc<Recoder>>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with room for `nodes` nodes and `edges` edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
            recoder: None,
        }
    }

    /// Builds a graph from a node type list and `(src, dst, type)` triples.
    pub fn from_parts(
        node_types: &[NodeType],
        edges: &[(u32, u32, EdgeType)],
    ) -> Result<Self, GraphError> {
        let mut graph = Self::with_capacity(node_types.len(), edges.len());
        for &ty in node_types {
            graph.add_node(ty);
        }
        for &(src, dst, ty) in edges {
            graph.add_edge(NodeId::new(src), NodeId::new(dst), ty)?;
        }
        Ok(graph)
    }

    /// Adds a node and returns its id.
    pub fn add_node(&mut self, ty: NodeType) -> NodeId {
        let id = NodeId::from(self.nodes.len());
        self.nodes.push(Node::new(ty));
        id
    }

    /// Adds an edge between two existing nodes and registers it with both
    /// endpoints.
    pub fn add_edge(&mut self, src: NodeId, dst: NodeId, ty: EdgeType) -> Result<EdgeId, GraphError> {
        for node in [src, dst] {
            if node.as_usize() >= self.nodes.len() {
                return Err(GraphError::InvalidNode {
                    node,
                    count: self.nodes.len(),
                });
            }
        }
        if src == dst {
            return Err(GraphError::SelfLoop(src));
        }
        let id = EdgeId::from(self.edges.len());
        self.edges.push(Edge::new(src, dst, ty));
        self.nodes[src.as_usize()].edges.push(id);
        self.nodes[dst.as_usize()].edges.push(id);
        Ok(id)
    }

    /// Drops spare capacity from every arena and adjacency list.
    pub fn trim(&mut self) {
        self.nodes.shrink_to_fit();
        self.edges.shrink_to_fit();
        for node in &mut self.nodes {
            node.edges.shrink_to_fit();
        }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Nodes plus edges.
    pub fn size(&self) -> usize {
        self.nodes.len() + self.edges.len()
    }

    /// A graph without nodes is empty, whatever its edges.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node behind `id`.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.as_usize()]
    }

    /// The edge behind `id`.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.as_usize()]
    }

    /// All nodes, in id order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges, in id order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Ids of all nodes, ascending.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::from)
    }

    /// Ids of all edges, ascending.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(EdgeId::from)
    }

    /// Type of node `id`.
    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.nodes[id.as_usize()].ty
    }

    /// Type of edge `id`.
    pub fn edge_type(&self, id: EdgeId) -> EdgeType {
        self.edges[id.as_usize()].ty
    }

    /// Number of edges incident to `id`.
    pub fn degree(&self, id: NodeId) -> usize {
        self.nodes[id.as_usize()].edges.len()
    }

    /// Incident edges of `id`.
    pub fn incident(&self, id: NodeId) -> &[EdgeId] {
        &self.nodes[id.as_usize()].edges
    }

    /// The neighbor of `node` across `edge`.
    pub fn opposite(&self, edge: EdgeId, node: NodeId) -> NodeId {
        self.edges[edge.as_usize()].opposite(node)
    }

    /// First edge connecting `a` and `b`, if any.
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        self.incident(a)
            .iter()
            .copied()
            .find(|&e| self.edges[e.as_usize()].connects(a, b))
    }

    /// Overwrites a node type. Adjacency order is stale until the next
    /// [`prepare`](Self::prepare).
    pub fn set_node_type(&mut self, id: NodeId, ty: NodeType) {
        self.nodes[id.as_usize()].ty = ty;
    }

    /// Overwrites an edge type. Adjacency order is stale until the next
    /// [`prepare`](Self::prepare).
    pub fn set_edge_type(&mut self, id: EdgeId, ty: EdgeType) {
        self.edges[id.as_usize()].ty = ty;
    }

    /// Bridge bit and ring mask of edge `id`; see [`BRIDGE`] and [`RING_BITS`].
    pub fn edge_flags(&self, id: EdgeId) -> u64 {
        self.edges[id.as_usize()].flags
    }

    /// Overwrites the bridge bit and ring mask of edge `id`.
    pub fn set_edge_flags(&mut self, id: EdgeId, flags: u64) {
        self.edges[id.as_usize()].flags = flags;
    }

    /// Sets the scratch mark of node `id`.
    pub fn set_node_mark(&mut self, id: NodeId, mark: i32) {
        self.nodes[id.as_usize()].mark = mark;
    }

    /// Sets the scratch mark of edge `id`.
    pub fn set_edge_mark(&mut self, id: EdgeId, mark: i32) {
        self.edges[id.as_usize()].mark = mark;
    }

    /// Resets every mark to `value`, except on elements flagged as excluded.
    pub fn clear_marks(&mut self, value: i32) {
        for node in self.nodes.iter_mut().filter(|n| !n.is_excluded()) {
            node.mark = value;
        }
        for edge in self.edges.iter_mut().filter(|e| !e.is_excluded()) {
            edge.mark = value;
        }
    }

    /// True if every node and edge mark equals `value`.
    pub fn marks_are(&self, value: i32) -> bool {
        self.nodes.iter().all(|n| n.mark == value) && self.edges.iter().all(|e| e.mark == value)
    }

    /// Order-independent hash over node types, degrees and edge types.
    ///
    /// Isomorphic graphs always hash equal, so comparing hash codes is a cheap
    /// pre-filter in front of an exact isomorphism test.
    pub fn hash_code(&self) -> u64 {
        let mut hash = mix((self.nodes.len() as u64) << 32 | self.edges.len() as u64);
        for (id, node) in self.nodes.iter().enumerate() {
            let mut local = mix(u64::from(node.ty.raw()) ^ (node.edges.len() as u64) << 40);
            for &e in &node.edges {
                let edge = &self.edges[e.as_usize()];
                let other = self.nodes[edge.opposite(NodeId::from(id)).as_usize()].ty;
                local = local.wrapping_add(mix(u64::from(edge.ty.raw()) << 32 | u64::from(other.raw())));
            }
            hash = hash.wrapping_add(mix(local));
        }
        for edge in &self.edges {
            let a = u64::from(self.nodes[edge.src.as_usize()].ty.raw());
            let b = u64::from(self.nodes[edge.dst.as_usize()].ty.raw());
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            hash = hash.wrapping_add(mix(u64::from(edge.ty.raw()) ^ lo << 21 ^ hi << 42));
        }
        hash
    }

    /// Sorts every adjacency list by `(edge type, neighbor type)`.
    ///
    /// The sort is stable, so preparing twice yields the same order as once.
    pub fn prepare(&mut self) {
        let Self { nodes, edges, .. } = self;
        for id in 0..nodes.len() {
            let me = NodeId::from(id);
            let mut adjacency = std::mem::take(&mut nodes[id].edges);
            adjacency.sort_by_key(|&e| {
                let edge = &edges[e.as_usize()];
                (edge.ty, nodes[edge.opposite(me).as_usize()].ty)
            });
            nodes[id].edges = adjacency;
        }
    }

    /// True if every adjacency list is in [`prepare`](Self::prepare) order.
    pub fn is_prepared(&self) -> bool {
        self.node_ids().all(|node| {
            self.incident(node)
                .iter()
                .map(|&e| (self.edge_type(e), self.node_type(self.opposite(e, node))))
                .is_sorted()
        })
    }

    /// Reorders nodes and edges breadth-first from a type-minimal root.
    ///
    /// Afterwards every edge has its `src` earlier in node order than its
    /// `dst`, and every edge has at least one endpoint that is the root or is
    /// reached by an earlier edge. Returns `false` and keeps the current
    /// numbering if the graph is disconnected.
    pub fn prepare_embed(&mut self) -> bool {
        self.prepare();
        let Some(root) = self.root() else {
            return true;
        };
        let mut node_order = Vec::with_capacity(self.nodes.len());
        let mut edge_order = Vec::with_capacity(self.edges.len());
        let mut seen_node = vec![false; self.nodes.len()];
        let mut seen_edge = vec![false; self.edges.len()];
        let mut queue = VecDeque::from([root]);
        seen_node[root.as_usize()] = true;
        while let Some(node) = queue.pop_front() {
            node_order.push(node);
            for &e in self.incident(node) {
                if std::mem::replace(&mut seen_edge[e.as_usize()], true) {
                    continue;
                }
                edge_order.push(e);
                let other = self.opposite(e, node);
                if !std::mem::replace(&mut seen_node[other.as_usize()], true) {
                    queue.push_back(other);
                }
            }
        }
        if node_order.len() < self.nodes.len() {
            trace!(
                "prepare_embed: reached {} of {} nodes",
                node_order.len(),
                self.nodes.len()
            );
            return false;
        }
        self.apply_order(&node_order, &edge_order);
        for edge in &mut self.edges {
            if edge.dst < edge.src {
                std::mem::swap(&mut edge.src, &mut edge.dst);
            }
        }
        self.prepare();
        true
    }

    /// Non-chain node with the smallest type (lowest id on ties).
    fn root(&self) -> Option<NodeId> {
        self.node_ids()
            .min_by_key(|&n| {
                let ty = self.node_type(n);
                (ty.is_chain(), ty)
            })
    }

    /// Renumbers the graph: `node_order[i]` becomes node `i` and
    /// `edge_order[j]` becomes edge `j`. Both must be permutations.
    pub fn reorder(&mut self, node_order: &[NodeId], edge_order: &[EdgeId]) -> Result<(), GraphError> {
        if !is_permutation(node_order.iter().map(|n| n.as_usize()), self.nodes.len()) {
            return Err(GraphError::InvalidPermutation("node order".into()));
        }
        if !is_permutation(edge_order.iter().map(|e| e.as_usize()), self.edges.len()) {
            return Err(GraphError::InvalidPermutation("edge order".into()));
        }
        self.apply_order(node_order, edge_order);
        Ok(())
    }

    /// Renumbers nodes only; edges follow in order of their (new) endpoints.
    pub fn permute(&mut self, node_order: &[NodeId]) -> Result<(), GraphError> {
        if !is_permutation(node_order.iter().map(|n| n.as_usize()), self.nodes.len()) {
            return Err(GraphError::InvalidPermutation("node order".into()));
        }
        let mut new_index = vec![0usize; self.nodes.len()];
        for (i, n) in node_order.iter().enumerate() {
            new_index[n.as_usize()] = i;
        }
        let edge_order: Vec<EdgeId> = self
            .edge_ids()
            .sorted_by_key(|&e| {
                let edge = self.edge(e);
                let (a, b) = (new_index[edge.src.as_usize()], new_index[edge.dst.as_usize()]);
                (a.min(b), a.max(b), edge.ty)
            })
            .collect();
        self.apply_order(node_order, &edge_order);
        Ok(())
    }

    fn apply_order(&mut self, node_order: &[NodeId], edge_order: &[EdgeId]) {
        let mut node_map = vec![NodeId::new(0); self.nodes.len()];
        for (i, n) in node_order.iter().enumerate() {
            node_map[n.as_usize()] = NodeId::from(i);
        }
        let mut edge_map = vec![EdgeId::new(0); self.edges.len()];
        for (j, e) in edge_order.iter().enumerate() {
            edge_map[e.as_usize()] = EdgeId::from(j);
        }
        let mut old_nodes: Vec<Option<Node>> = std::mem::take(&mut self.nodes).into_iter().map(Some).collect();
        let mut old_edges: Vec<Option<Edge>> = std::mem::take(&mut self.edges).into_iter().map(Some).collect();
        self.nodes = node_order
            .iter()
            .filter_map(|n| old_nodes[n.as_usize()].take())
            .map(|mut node| {
                for e in &mut node.edges {
                    *e = edge_map[e.as_usize()];
                }
                node
            })
            .collect();
        self.edges = edge_order
            .iter()
            .filter_map(|e| old_edges[e.as_usize()].take())
            .map(|mut edge| {
                edge.src = node_map[edge.src.as_usize()];
                edge.dst = node_map[edge.dst.as_usize()];
                edge
            })
            .collect();
    }

    /// True if every node can reach every other node.
    pub fn is_connected(&self) -> bool {
        self.component_ids().iter().all(|&c| c == 0)
    }

    /// Component index per node, numbered in order of first appearance.
    pub fn component_ids(&self) -> Vec<usize> {
        let mut comp = vec![usize::MAX; self.nodes.len()];
        let mut next = 0;
        for start in 0..self.nodes.len() {
            if comp[start] != usize::MAX {
                continue;
            }
            let mut stack = vec![NodeId::from(start)];
            comp[start] = next;
            while let Some(node) = stack.pop() {
                for &e in self.incident(node) {
                    let other = self.opposite(e, node);
                    if comp[other.as_usize()] == usize::MAX {
                        comp[other.as_usize()] = next;
                        stack.push(other);
                    }
                }
            }
            next += 1;
        }
        comp
    }

    /// Splits the graph into its connected components.
    pub fn split(&self) -> Vec<Self> {
        let comp = self.component_ids();
        let count = comp.iter().copied().max().map_or(0, |m| m + 1);
        let mut parts: Vec<Self> = (0..count)
            .map(|_| Self {
                recoder: self.recoder.clone(),
                ..Self::new()
            })
            .collect();
        let mut local = vec![NodeId::new(0); self.nodes.len()];
        for (i, node) in self.nodes.iter().enumerate() {
            local[i] = parts[comp[i]].add_node(node.ty);
        }
        for edge in &self.edges {
            let part = &mut parts[comp[edge.src.as_usize()]];
            let (src, dst) = (local[edge.src.as_usize()], local[edge.dst.as_usize()]);
            let id = EdgeId::from(part.edges.len());
            let mut copy = Edge::new(src, dst, edge.ty);
            copy.flags = edge.flags;
            part.edges.push(copy);
            part.nodes[src.as_usize()].edges.push(id);
            part.nodes[dst.as_usize()].edges.push(id);
        }
        parts
    }

    /// The recoder this graph is currently encoded with.
    pub fn recoder(&self) -> Option<&Arc<Recoder>> {
        self.recoder.as_ref()
    }

    /// Replaces node types by their frequency-ranked codes.
    pub fn encode(&mut self, recoder: Arc<Recoder>) {
        self.decode();
        for node in &mut self.nodes {
            node.ty = recoder.encode(node.ty);
        }
        self.recoder = Some(recoder);
        self.prepare();
    }

    /// Restores the original node types if the graph is encoded.
    pub fn decode(&mut self) {
        let Some(recoder) = self.recoder.take() else {
            return;
        };
        for node in &mut self.nodes {
            node.ty = recoder.decode(node.ty);
        }
        self.prepare();
    }
}

fn is_permutation(items: impl Iterator<Item = usize>, len: usize) -> bool {
    let mut seen = vec![false; len];
    let mut count = 0;
    for i in items {
        if i >= len || std::mem::replace(&mut seen[i], true) {
            return false;
        }
        count += 1;
    }
    count == len
}

/// 64-bit finalizer (splitmix64).
fn mix(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "nodes: {}",
            self.nodes.iter().map(|n| n.ty.to_string()).join(" ")
        )?;
        write!(
            f,
            "edges: {}",
            self.edges
                .iter()
                .map(|e| format!("{}{}{}", e.src.as_usize(), e.ty, e.dst.as_usize()))
                .join(" ")
        )
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use quickcheck::{Arbitrary, Gen, quickcheck};

    #[derive(Clone, Debug)]
    struct SmallGraph(Graph);

    impl Arbitrary for SmallGraph {
        fn arbitrary(g: &mut Gen) -> Self {
            let nodes = usize::arbitrary(g) % 8 + 1;
            let mut graph = Graph::new();
            for _ in 0..nodes {
                graph.add_node(NodeType::new(u32::arbitrary(g) % 3 + 6));
            }
            for _ in 0..usize::arbitrary(g) % 12 {
                let a = NodeId::from(usize::arbitrary(g) % nodes);
                let b = NodeId::from(usize::arbitrary(g) % nodes);
                // self loops are rejected, which is fine here
                let _ = graph.add_edge(a, b, EdgeType::new(u32::arbitrary(g) % 2 + 1));
            }
            Self(graph)
        }
    }

    quickcheck! {
        fn prop_prepare_is_idempotent(g: SmallGraph) -> bool {
            let mut once = g.0;
            once.prepare();
            let mut twice = once.clone();
            twice.prepare();
            once.nodes() == twice.nodes()
        }

        fn prop_prepare_embed_keeps_hash(g: SmallGraph) -> bool {
            let mut graph = g.0;
            let before = graph.hash_code();
            let connected = graph.is_connected();
            graph.prepare_embed() == connected && graph.hash_code() == before
        }

        fn prop_split_preserves_size(g: SmallGraph) -> bool {
            let parts = g.0.split();
            parts.iter().all(Graph::is_connected)
                && parts.iter().map(Graph::size).sum::<usize>() == g.0.size()
        }
    }
}
