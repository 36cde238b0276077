//! Loading graph files and running the subcommands.
//!
//! Every command returns its report as a string; `main` prints it.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use moss_common::{Config, Graph, GraphError, GraphRecord, OverlapMode};
use moss_subgraph::{
    embed_with, independent_count, mark_bridges, mark_pseudo_rings, mark_rings, max_common_subgraph, support,
};
use thiserror::Error;
use tracing::info;

use crate::args::{Args, Command};

/// Errors raised while reading input files.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("graph {path}: {source}")]
    Graph {
        path: PathBuf,
        #[source]
        source: GraphError,
    },

    #[error("pattern {0} is not connected")]
    Disconnected(PathBuf),
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn to_graph(path: &Path, record: &GraphRecord) -> Result<Graph, CliError> {
    Graph::try_from(record).map_err(|source| CliError::Graph {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the settings file, or the defaults without one.
pub fn load_config(path: Option<&Path>) -> Result<Config, CliError> {
    path.map_or_else(|| Ok(Config::default()), read_json)
}

/// Reads a single graph record. The graph comes back prepared.
pub fn load_graph(path: &Path) -> Result<Graph, CliError> {
    let record: GraphRecord = read_json(path)?;
    to_graph(path, &record)
}

/// Reads a graph and prepares it as a pattern.
pub fn load_pattern(path: &Path) -> Result<Graph, CliError> {
    let mut pattern = load_graph(path)?;
    if !pattern.prepare_embed() {
        return Err(CliError::Disconnected(path.to_path_buf()));
    }
    Ok(pattern)
}

/// Reads a JSON array of graph records.
pub fn load_database(path: &Path) -> Result<Vec<Graph>, CliError> {
    let records: Vec<GraphRecord> = read_json(path)?;
    records.iter().map(|record| to_graph(path, record)).collect()
}

/// Runs the parsed command line.
pub fn run(args: &Args) -> Result<String, CliError> {
    let base = load_config(args.config.as_deref())?;
    let config = args.command.to_config(base);
    match &args.command {
        Command::Embed {
            pattern,
            host,
            dedupe,
            list,
            ..
        } => Ok(run_embed(&load_pattern(pattern)?, &load_graph(host)?, &config, *dedupe, *list)),
        Command::Rings { graph, .. } => Ok(run_rings(load_graph(graph)?, &config)),
        Command::Mcs { first, second, .. } => Ok(run_mcs(&load_graph(first)?, &load_graph(second)?, &config)),
        Command::Support { pattern, database } => {
            let pattern = load_pattern(pattern)?;
            let database = load_database(database)?;
            info!("searching {} graphs", database.len());
            let count = support(&database, &pattern);
            Ok(format!("support: {count} of {}\n", database.len()))
        }
    }
}

fn run_embed(pattern: &Graph, host: &Graph, config: &Config, dedupe: bool, list: bool) -> String {
    let mut found = embed_with(host, pattern, config);
    if dedupe {
        found.dedupe();
    }
    let mut out = format!("{} embeddings\n", found.len());
    if config.overlap != OverlapMode::None {
        let independent = independent_count(pattern, &found, config.overlap);
        let _ = writeln!(out, "{independent} without overlap ({:?})", config.overlap);
    }
    if list {
        for (i, embedding) in found.iter().enumerate() {
            let nodes: Vec<String> = embedding.nodes().iter().map(ToString::to_string).collect();
            let _ = writeln!(out, "{i}: {}", nodes.join(" "));
        }
    }
    out
}

fn run_rings(mut graph: Graph, config: &Config) -> String {
    let bridges = mark_bridges(&mut graph);
    let rings = mark_rings(&mut graph, config.ring_min, config.ring_max, config.ring_types);
    let mut out = format!("bridges: {bridges}\nrings: {}\n", rings.signed());
    if config.pseudo_ring_max > 0 {
        let pseudo = mark_pseudo_rings(&mut graph, config.pseudo_ring_max);
        let _ = writeln!(out, "pseudo rings: {}", pseudo.signed());
    }
    for edge in graph.edges() {
        let _ = writeln!(
            out,
            "{}-{} rings {:#x}{}",
            edge.src(),
            edge.dst(),
            edge.rings(),
            if edge.is_bridge() { " bridge" } else { "" }
        );
    }
    out
}

fn run_mcs(first: &Graph, second: &Graph, config: &Config) -> String {
    let result = max_common_subgraph(first, second, config.mcs);
    format!(
        "cost: {}\ncommon elements: {}\n{}\n",
        result.cost,
        result.size(),
        result.subgraph
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use moss_common::*;
    use tempfile::TempDir;

    fn write_graph(dir: &TempDir, name: &str, graph: &Graph) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, serde_json::to_string(&GraphRecord::from(graph)).unwrap()).unwrap();
        path
    }

    fn run_line(line: &[&str]) -> Result<String, CliError> {
        let args = Args::try_parse_from(std::iter::once("moss").chain(line.iter().copied())).unwrap();
        run(&args)
    }

    fn arg(path: &Path) -> &str {
        path.to_str().unwrap()
    }

    #[test]
    fn embed_counts_aromatic_bonds() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = write_graph(&dir, "bond.json", &AROMATIC_BOND);
        let host = write_graph(&dir, "benzene.json", &benzene());
        let report = run_line(&["embed", arg(&pattern), arg(&host)]).unwrap();
        assert!(report.starts_with("6 embeddings"));
        let report = run_line(&["embed", "--first", arg(&pattern), arg(&host)]).unwrap();
        assert!(report.starts_with("1 embeddings"));
    }

    #[test]
    fn embed_reports_independent_occurrences() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = write_graph(&dir, "benzene.json", &benzene());
        let report = run_line(&["embed", "--overlap", "harmful", "--list", arg(&pattern), arg(&pattern)]).unwrap();
        assert!(report.starts_with("12 embeddings\n1 without overlap (Harmful)\n"));
        assert_eq!(report.lines().count(), 14);

        let report = run_line(&["embed", "--dedupe", arg(&pattern), arg(&pattern)]).unwrap();
        assert!(report.starts_with("1 embeddings"));
    }

    #[test]
    fn disconnected_pattern_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let split = Graph::from_parts(&[elements::C, elements::O], &[]).unwrap();
        let pattern = write_graph(&dir, "split.json", &split);
        let host = write_graph(&dir, "ethanol.json", &ethanol());
        let err = run_line(&["embed", arg(&pattern), arg(&host)]).unwrap_err();
        assert!(matches!(err, CliError::Disconnected(_)));
    }

    #[test]
    fn bad_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(load_graph(&missing), Err(CliError::Io { .. })));

        let garbage = dir.path().join("garbage.json");
        fs::write(&garbage, "{ nodes: ").unwrap();
        assert!(matches!(load_graph(&garbage), Err(CliError::Json { .. })));

        let looped = dir.path().join("loop.json");
        fs::write(&looped, r#"{"nodes":[6],"edges":[[0,0,1]]}"#).unwrap();
        assert!(matches!(load_graph(&looped), Err(CliError::Graph { .. })));
    }

    #[test]
    fn rings_of_naphthalene() {
        let dir = tempfile::tempdir().unwrap();
        let graph = write_graph(&dir, "naphthalene.json", &naphthalene());
        let report = run_line(&["rings", arg(&graph)]).unwrap();
        assert!(report.starts_with("bridges: 0\nrings: 2\n"));

        let report = run_line(&["rings", "--min", "10", "--max", "10", arg(&graph)]).unwrap();
        assert!(report.starts_with("bridges: 0\nrings: 1\n"));
    }

    #[test]
    fn settings_file_is_overridden_by_flags() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("config.json");
        fs::write(&settings, r#"{"ring_min":10,"ring_max":10}"#).unwrap();
        let graph = write_graph(&dir, "naphthalene.json", &naphthalene());

        let report = run_line(&["--config", arg(&settings), "rings", arg(&graph)]).unwrap();
        assert!(report.contains("rings: 1\n"));
        let report = run_line(&["rings", "--config", arg(&settings), "--min", "5", "--max", "6", arg(&graph)]).unwrap();
        assert!(report.contains("rings: 2\n"));
    }

    #[test]
    fn mcs_of_contained_graph_costs_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_graph(&dir, "acid.json", &acetic_acid());
        let second = write_graph(&dir, "ethanol.json", &ethanol());
        let report = run_line(&["mcs", "--by-node", arg(&first), arg(&second)]).unwrap();
        assert!(report.starts_with("cost: 0\ncommon elements: 5\n"));
    }

    #[test]
    fn support_over_a_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = write_graph(&dir, "co.json", &SINGLE_CO);
        let records: Vec<GraphRecord> = [ethanol(), acetic_acid(), hexane(), benzene()]
            .iter()
            .map(GraphRecord::from)
            .collect();
        let database = dir.path().join("db.json");
        fs::write(&database, serde_json::to_string(&records).unwrap()).unwrap();
        let report = run_line(&["support", arg(&pattern), arg(&database)]).unwrap();
        assert_eq!(report, "support: 2 of 4\n");
    }
}
