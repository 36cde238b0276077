//! The canonical-form seam.
//!
//! Fragment mining needs a way to tell whether two fragments are the same
//! graph without running an isomorphism test on every pair. A canonical form
//! renumbers a graph so that isomorphic graphs end up with identical code
//! words. The ordering itself is left to implementations.

use itertools::Itertools;
use moss_common::Graph;
use tracing::debug;

/// A canonical numbering of graphs, described by its code word.
pub trait CanonicalForm {
    /// Totally ordered description of a numbered graph.
    type CodeWord: Ord;

    /// Code word of `graph` in its current numbering.
    fn code_word(&self, graph: &Graph) -> Self::CodeWord;

    /// Renumbers `graph` into its canonical form.
    fn make_canonic(&self, graph: &mut Graph);

    /// Is `graph` already numbered canonically?
    fn is_canonic(&self, graph: &Graph) -> bool {
        let mut canonic = graph.clone();
        self.make_canonic(&mut canonic);
        self.code_word(&canonic) == self.code_word(graph)
    }

    /// Do two canonically numbered graphs describe the same graph?
    fn equals_canonic(&self, a: &Graph, b: &Graph) -> bool {
        a.node_count() == b.node_count() && a.edge_count() == b.edge_count() && self.code_word(a) == self.code_word(b)
    }
}

/// Canonicalizes `fragments` and keeps one graph per code word, in code word
/// order.
pub fn dedupe_canonic<F: CanonicalForm>(form: &F, fragments: Vec<Graph>) -> Vec<Graph> {
    let before = fragments.len();
    let unique: Vec<Graph> = fragments
        .into_iter()
        .map(|mut g| {
            form.make_canonic(&mut g);
            (form.code_word(&g), g)
        })
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .dedup_by(|a, b| a.0 == b.0)
        .map(|(_, g)| g)
        .collect();
    debug!("{} of {before} fragments are distinct", unique.len());
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use moss_common::*;

    /// Smallest code word over all node numberings. Only usable on tiny graphs.
    struct Exhaustive;

    type Word = (Vec<NodeType>, Vec<(usize, usize, EdgeType)>);

    impl CanonicalForm for Exhaustive {
        type CodeWord = Word;

        fn code_word(&self, graph: &Graph) -> Word {
            let nodes = graph.node_ids().map(|n| graph.node_type(n)).collect();
            let edges = graph
                .edges()
                .iter()
                .map(|e| {
                    let (a, b) = (e.src().as_usize(), e.dst().as_usize());
                    (a.min(b), a.max(b), e.ty())
                })
                .sorted()
                .collect();
            (nodes, edges)
        }

        fn make_canonic(&self, graph: &mut Graph) {
            let best = graph
                .node_ids()
                .permutations(graph.node_count())
                .filter_map(|order| {
                    let mut candidate = graph.clone();
                    candidate.permute(&order).ok()?;
                    Some((self.code_word(&candidate), candidate))
                })
                .min_by(|a, b| a.0.cmp(&b.0));
            if let Some((_, candidate)) = best {
                *graph = candidate;
            }
        }
    }

    #[test]
    fn renumbered_graphs_share_a_canonical_form() {
        let form = Exhaustive;
        let mut a = acetic_acid();
        let mut b = acetic_acid();
        b.permute(&[3, 1, 0, 2].map(NodeId::new)).unwrap();
        assert_ne!(form.code_word(&a), form.code_word(&b));

        form.make_canonic(&mut a);
        form.make_canonic(&mut b);
        assert!(form.is_canonic(&a));
        assert!(form.is_canonic(&b));
        assert!(form.equals_canonic(&a, &b));
        assert!(!form.equals_canonic(&a, &{
            let mut e = ethanol();
            form.make_canonic(&mut e);
            e
        }));
    }

    #[test]
    fn dedupe_keeps_one_per_graph() {
        let mut flipped = ethanol();
        flipped.permute(&[2, 1, 0].map(NodeId::new)).unwrap();
        let fragments = vec![ethanol(), acetic_acid(), flipped, ethanol()];
        let unique = dedupe_canonic(&Exhaustive, fragments);
        assert_eq!(unique.len(), 2);
        assert!(unique.iter().all(|g| Exhaustive.is_canonic(g)));
    }
}
