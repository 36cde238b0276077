use std::path::PathBuf;

use clap::{Parser, Subcommand};
use moss_common::{Config, MatchMode, McsStrategy, OverlapMode};

/// MoSS substructure search - embeddings, rings and common subgraphs of
/// molecule-like graphs stored as JSON
#[derive(Parser, Debug)]
#[command(name = "moss")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON file with search settings; flags override it
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// What to compute.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Find the embeddings of a pattern in a host graph
    Embed {
        /// Pattern graph (JSON record)
        pattern: PathBuf,
        /// Host graph (JSON record)
        host: PathBuf,
        /// Stop at the first embedding
        #[arg(long, default_value_t = false)]
        first: bool,
        /// Keep one embedding per set of host nodes
        #[arg(long, default_value_t = false)]
        dedupe: bool,
        /// Print every embedding
        #[arg(short = 'l', long, default_value_t = false)]
        list: bool,
        /// Also count embeddings that do not overlap
        #[arg(long, value_enum)]
        overlap: Option<OverlapArg>,
    },
    /// Mark the bridges and rings of a graph
    Rings {
        /// Graph (JSON record)
        graph: PathBuf,
        /// Smallest ring size
        #[arg(long)]
        min: Option<usize>,
        /// Largest ring size
        #[arg(long)]
        max: Option<usize>,
        /// Largest pseudo-ring size
        #[arg(long)]
        pseudo: Option<usize>,
    },
    /// Maximum common subgraph of two graphs
    Mcs {
        /// First graph (JSON record)
        first: PathBuf,
        /// Second graph (JSON record)
        second: PathBuf,
        /// Recurse over nodes instead of edges
        #[arg(long, default_value_t = false)]
        by_node: bool,
    },
    /// Count the graphs of a database that contain a pattern
    Support {
        /// Pattern graph (JSON record)
        pattern: PathBuf,
        /// Database (JSON array of records)
        database: PathBuf,
    },
}

impl Command {
    /// Applies the command's flags on top of `base`.
    pub fn to_config(&self, base: Config) -> Config {
        let (ring_min, ring_max) = (base.ring_min, base.ring_max);
        let mut builder = base.into_builder();
        match self {
            Self::Embed { first, overlap, .. } => {
                if *first {
                    builder = builder.match_mode(MatchMode::First);
                }
                if let Some(overlap) = overlap {
                    builder = builder.overlap(overlap.clone().into());
                }
            }
            Self::Rings { min, max, pseudo, .. } => {
                builder = builder.rings(min.unwrap_or(ring_min), max.unwrap_or(ring_max));
                if let Some(pseudo) = pseudo {
                    builder = builder.pseudo_rings(*pseudo);
                }
            }
            Self::Mcs { by_node, .. } => {
                if *by_node {
                    builder = builder.mcs(McsStrategy::ByNode);
                }
            }
            Self::Support { .. } => {}
        }
        builder.build()
    }
}

/// Command-line argument wrapper for OverlapMode
#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OverlapArg {
    /// Every embedding counts
    #[value(name = "none")]
    None,
    /// Embeddings sharing a node conflict
    #[value(name = "any")]
    Any,
    /// Only harmful overlaps conflict
    #[value(name = "harmful")]
    Harmful,
}

impl From<OverlapArg> for OverlapMode {
    fn from(arg: OverlapArg) -> Self {
        match arg {
            OverlapArg::None => Self::None,
            OverlapArg::Any => Self::Any,
            OverlapArg::Harmful => Self::Harmful,
        }
    }
}
