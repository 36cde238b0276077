//! Search configuration shared by the matcher, the ring detector and the MCS
//! solver.
//!
//! ```ignore
//! use moss_common::{Config, MatchMode, OverlapMode};
//! let cfg = Config::builder()
//!     .match_mode(MatchMode::All)
//!     .rings(3, 8)
//!     .overlap(OverlapMode::Harmful)
//!     .build();
//! ```

use serde::{Deserialize, Serialize};

/// How many embeddings an enumeration collects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchMode {
    /// Every embedding.
    #[default]
    All,
    /// Stop at the first one (containment test).
    First,
}

/// Which side the MCS branch and bound recurses over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum McsStrategy {
    /// Assign an edge of the first graph per level, nodes follow the edges.
    #[default]
    ByEdge,
    /// Assign a node of the first graph per level, edges follow the nodes.
    ByNode,
}

/// How overlapping embeddings are treated when counting support.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlapMode {
    /// Every embedding counts.
    #[default]
    None,
    /// Embeddings sharing any host node conflict.
    Any,
    /// Only harmful overlaps conflict.
    Harmful,
}

/// Global search configuration.
///
/// Missing fields take their default when deserialized.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// All embeddings or just the first.
    pub match_mode: MatchMode,
    /// Smallest ring size marked by ring detection.
    pub ring_min: usize,
    /// Largest ring size marked by ring detection.
    pub ring_max: usize,
    /// Whether ring detection also sets the ring type flags.
    pub ring_types: bool,
    /// Largest pseudo-ring size, 0 disables pseudo-ring marking.
    pub pseudo_ring_max: usize,
    /// Recursion side of the MCS search.
    pub mcs: McsStrategy,
    /// Overlap handling when counting independent embeddings.
    pub overlap: OverlapMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::All,
            ring_min: 3,
            ring_max: 8,
            ring_types: true,
            pseudo_ring_max: 0,
            mcs: McsStrategy::ByEdge,
            overlap: OverlapMode::None,
        }
    }
}

impl Config {
    /// A builder starting from the defaults.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// A builder starting from this configuration.
    pub fn into_builder(self) -> ConfigBuilder {
        ConfigBuilder { config: self }
    }
}

/// Builder for [`Config`], starting from [`Config::default`].
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Sets [`Config::match_mode`].
    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.config.match_mode = mode;
        self
    }

    /// Ring size window; the bounds are swapped if given out of order.
    pub fn rings(mut self, min: usize, max: usize) -> Self {
        self.config.ring_min = min.min(max);
        self.config.ring_max = min.max(max);
        self
    }

    /// Sets [`Config::ring_types`].
    pub fn ring_types(mut self, flag: bool) -> Self {
        self.config.ring_types = flag;
        self
    }

    /// Largest pseudo-ring size; 0 turns the pass off.
    pub fn pseudo_rings(mut self, max: usize) -> Self {
        self.config.pseudo_ring_max = max;
        self
    }

    /// Sets [`Config::mcs`].
    pub fn mcs(mut self, strategy: McsStrategy) -> Self {
        self.config.mcs = strategy;
        self
    }

    /// Sets [`Config::overlap`].
    pub fn overlap(mut self, mode: OverlapMode) -> Self {
        self.config.overlap = mode;
        self
    }

    /// Finishes the configuration.
    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let cfg = Config::builder()
            .match_mode(MatchMode::First)
            .rings(7, 5)
            .mcs(McsStrategy::ByNode)
            .build();
        assert_eq!(cfg.match_mode, MatchMode::First);
        assert_eq!((cfg.ring_min, cfg.ring_max), (5, 7));
        assert_eq!(cfg.mcs, McsStrategy::ByNode);
        assert_eq!(cfg.overlap, OverlapMode::None);
    }

    #[test]
    fn config_deserializes_from_json() {
        let json = r#"{"match_mode":"First","ring_min":5,"ring_max":6,"ring_types":false,
            "pseudo_ring_max":0,"mcs":"ByEdge","overlap":"Harmful"}"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.overlap, OverlapMode::Harmful);
        assert!(!cfg.ring_types);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"ring_max":6}"#).unwrap();
        assert_eq!(cfg.ring_max, 6);
        assert_eq!(cfg.ring_min, 3);
        assert_eq!(cfg.match_mode, MatchMode::All);
    }
}
