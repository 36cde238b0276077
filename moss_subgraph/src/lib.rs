//! Substructure search over attributed graphs.
//!
//! Everything here works on [`moss_common::Graph`]: finding the embeddings
//! of a pattern, marking rings and bridges, comparing embeddings for
//! overlap, and computing a maximum common subgraph of two graphs. No
//! algorithm touches the scratch marks stored in the graph; search state
//! lives in the algorithm.

mod state;

pub mod bridges;
pub mod canonical;
pub mod embedding;
pub mod isomorphism;
pub mod matcher;
pub mod mcs;
pub mod overlap;
pub mod rings;
pub mod support;

pub use bridges::{find_bridges, mark_bridges};
pub use canonical::{CanonicalForm, dedupe_canonic};
pub use embedding::{Embedding, EmbeddingSet};
pub use isomorphism::is_isomorphic;
pub use matcher::SubgraphMatcher;
pub use mcs::{McsResult, max_common_subgraph};
pub use overlap::{overlaps, overlaps_harmfully};
pub use rings::{RingCount, mark_pseudo_rings, mark_rings};
pub use support::{independent_count, support};

use moss_common::{Config, Graph, MatchMode};

/// All embeddings of `pattern` in `host`.
///
/// `pattern` must be prepared for embedding and `host` prepared.
pub fn embed(host: &Graph, pattern: &Graph) -> EmbeddingSet {
    embed_with(host, pattern, &Config::default())
}

/// Embeddings of `pattern` in `host` under `config`.
pub fn embed_with(host: &Graph, pattern: &Graph, config: &Config) -> EmbeddingSet {
    SubgraphMatcher::enumerate_all(pattern, host, config)
}

/// Does `host` contain `pattern`? Stops at the first embedding.
pub fn contains(host: &Graph, pattern: &Graph) -> bool {
    let config = Config::builder().match_mode(MatchMode::First).build();
    !embed_with(host, pattern, &config).is_empty()
}
