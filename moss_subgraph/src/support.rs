//! Support counting over a graph database.

use moss_common::{Graph, OverlapMode};
use tracing::debug;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::embedding::EmbeddingSet;
use crate::overlap::{overlaps, overlaps_harmfully};

/// Number of database graphs that contain `pattern`.
///
/// The pattern must be prepared for embedding and every graph prepared.
pub fn support(database: &[Graph], pattern: &Graph) -> usize {
    #[cfg(feature = "rayon")]
    let graphs = database.par_iter();

    #[cfg(not(feature = "rayon"))]
    let graphs = database.iter();

    let count = graphs.filter(|host| crate::contains(host, pattern)).count();
    debug!("pattern supported by {count} of {} graphs", database.len());
    count
}

/// Size of a greedy independent set in the conflict graph of `embeddings`,
/// a lower bound on the number of non-overlapping occurrences.
///
/// Which pairs conflict depends on `mode`; with [`OverlapMode::None`] every
/// embedding counts.
pub fn independent_count(pattern: &Graph, embeddings: &EmbeddingSet, mode: OverlapMode) -> usize {
    let items = &embeddings.items;
    if mode == OverlapMode::None {
        return items.len();
    }
    let conflicts = |i: usize, j: usize| match mode {
        OverlapMode::None => false,
        OverlapMode::Any => overlaps(&items[i], &items[j]),
        OverlapMode::Harmful => overlaps_harmfully(pattern, &items[i], &items[j]),
    };

    let n = items.len();
    let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); n];
    for i in 0..n {
        for j in i + 1..n {
            if conflicts(i, j) {
                neighbors[i].push(j);
                neighbors[j].push(i);
            }
        }
    }

    // repeatedly take the vertex with the fewest remaining neighbors
    let mut alive = vec![true; n];
    let mut degree: Vec<usize> = neighbors.iter().map(Vec::len).collect();
    let mut chosen = 0;
    while let Some(v) = (0..n).filter(|&v| alive[v]).min_by_key(|&v| degree[v]) {
        chosen += 1;
        alive[v] = false;
        for &u in &neighbors[v] {
            if !alive[u] {
                continue;
            }
            alive[u] = false;
            for &w in &neighbors[u] {
                degree[w] = degree[w].saturating_sub(1);
            }
        }
    }
    debug!("{chosen} of {n} embeddings are independent ({mode:?})");
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed;
    use moss_common::*;

    fn prepared(mut g: Graph) -> Graph {
        assert!(g.prepare_embed());
        g
    }

    #[test]
    fn support_counts_graphs_not_embeddings() {
        let database: Vec<Graph> = [benzene(), naphthalene(), cyclohexane(), ethanol()]
            .into_iter()
            .map(|mut g| {
                g.prepare();
                g
            })
            .collect();
        assert_eq!(support(&database, &prepared(benzene())), 2);
        assert_eq!(support(&database, &prepared(SINGLE_CC.clone())), 2);
        assert_eq!(support(&database, &prepared(SINGLE_CO.clone())), 1);
    }

    #[test]
    fn independent_count_by_mode() {
        let mut host = hexane();
        host.prepare();
        let pattern = prepared(SINGLE_CC.clone());
        let found = embed(&host, &pattern);
        assert_eq!(found.len(), 5);
        assert_eq!(independent_count(&pattern, &found, OverlapMode::None), 5);
        // bonds 0-1, 2-3, 4-5
        assert_eq!(independent_count(&pattern, &found, OverlapMode::Any), 3);
        // neighboring bonds share only an atom
        assert_eq!(independent_count(&pattern, &found, OverlapMode::Harmful), 5);
    }

    #[test]
    fn automorphic_embeddings_collapse_under_harmful_overlap() {
        let mut host = benzene();
        host.prepare();
        let pattern = prepared(benzene());
        let found = embed(&host, &pattern);
        assert_eq!(found.len(), 12);
        assert_eq!(independent_count(&pattern, &found, OverlapMode::Harmful), 1);
    }
}
