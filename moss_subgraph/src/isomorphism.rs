use moss_common::Graph;
use tracing::trace;

use crate::contains;

/// Are `a` and `b` the same graph up to renumbering?
///
/// Cheap checks first (sizes, hash code), then a containment search of one
/// graph in the other, which for equal sizes is an isomorphism test. Both
/// graphs must be connected; clones are prepared internally.
pub fn is_isomorphic(a: &Graph, b: &Graph) -> bool {
    if a.node_count() != b.node_count() || a.edge_count() != b.edge_count() {
        return false;
    }
    if a.hash_code() != b.hash_code() {
        trace!("hash codes differ");
        return false;
    }
    let mut pattern = a.clone();
    if !pattern.prepare_embed() {
        return false;
    }
    let mut host = b.clone();
    host.prepare();
    contains(&host, &pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use moss_common::*;

    #[test]
    fn relabeled_graphs_are_isomorphic() {
        let g = acetic_acid();
        let mut h = g.clone();
        h.permute(&[2, 3, 1, 0].map(NodeId::new)).unwrap();
        assert!(is_isomorphic(&g, &h));
    }

    #[test]
    fn bond_types_break_isomorphism() {
        assert!(!is_isomorphic(&benzene(), &cyclohexane()));
        assert!(!is_isomorphic(&ethanol(), &acetic_acid()));
    }

    #[test]
    fn equal_hashes_still_need_a_match() {
        // both are 3-regular on 6 nodes with identical local structure
        let prism = Graph::from_parts(
            &[elements::C; 6],
            &[
                (0, 1, bonds::SINGLE),
                (1, 2, bonds::SINGLE),
                (2, 0, bonds::SINGLE),
                (3, 4, bonds::SINGLE),
                (4, 5, bonds::SINGLE),
                (5, 3, bonds::SINGLE),
                (0, 3, bonds::SINGLE),
                (1, 4, bonds::SINGLE),
                (2, 5, bonds::SINGLE),
            ],
        )
        .unwrap();
        let k33 = Graph::from_parts(
            &[elements::C; 6],
            &[
                (0, 3, bonds::SINGLE),
                (0, 4, bonds::SINGLE),
                (0, 5, bonds::SINGLE),
                (1, 3, bonds::SINGLE),
                (1, 4, bonds::SINGLE),
                (1, 5, bonds::SINGLE),
                (2, 3, bonds::SINGLE),
                (2, 4, bonds::SINGLE),
                (2, 5, bonds::SINGLE),
            ],
        )
        .unwrap();
        assert_eq!(prism.hash_code(), k33.hash_code());
        assert!(!is_isomorphic(&prism, &k33));
        assert!(is_isomorphic(&prism, &prism.clone()));
    }
}
