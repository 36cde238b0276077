//! Fixture molecules and embedding test cases shared by the workspace's tests.
//!
//! Molecules are hydrogen-suppressed: only heavy atoms become nodes.

use crate::config::{Config, MatchMode};
use crate::graph::{EdgeType, Graph, NodeId, NodeType, bonds, elements};

/// A ring of `size` nodes of type `ty` joined by `bond` edges.
pub fn ring_of(size: u32, ty: NodeType, bond: EdgeType) -> Graph {
    let mut graph = chain_of(size, ty, bond);
    if size > 2 {
        graph
            .add_edge(NodeId::new(size - 1), NodeId::new(0), bond)
            .expect("a ring of three or more closes without a self loop");
    }
    graph
}

/// A path of `size` nodes of type `ty` joined by `bond` edges.
pub fn chain_of(size: u32, ty: NodeType, bond: EdgeType) -> Graph {
    let mut graph = Graph::with_capacity(size as usize, size as usize);
    for i in 0..size {
        let node = graph.add_node(ty);
        if i > 0 {
            graph
                .add_edge(NodeId::new(i - 1), node, bond)
                .expect("consecutive chain nodes exist");
        }
    }
    graph
}

/// Two nodes joined by one edge.
pub fn bond_between(a: NodeType, b: NodeType, bond: EdgeType) -> Graph {
    molecule(&[a, b], &[(0, 1, bond)])
}

fn molecule(nodes: &[NodeType], edges: &[(u32, u32, EdgeType)]) -> Graph {
    Graph::from_parts(nodes, edges).expect("fixture molecules are well formed")
}

/// `CCO`
pub fn ethanol() -> Graph {
    molecule(
        &[elements::C, elements::C, elements::O],
        &[(0, 1, bonds::SINGLE), (1, 2, bonds::SINGLE)],
    )
}

/// `CC(=O)O`
pub fn acetic_acid() -> Graph {
    molecule(
        &[elements::C, elements::C, elements::O, elements::O],
        &[(0, 1, bonds::SINGLE), (1, 2, bonds::DOUBLE), (1, 3, bonds::SINGLE)],
    )
}

/// `c1ccccc1`
pub fn benzene() -> Graph {
    ring_of(6, elements::C, bonds::AROMATIC)
}

/// `C1CCCCC1`
pub fn cyclohexane() -> Graph {
    ring_of(6, elements::C, bonds::SINGLE)
}

/// `CCCCCC`
pub fn hexane() -> Graph {
    chain_of(6, elements::C, bonds::SINGLE)
}

/// `c1ccc2ccccc2c1`: two aromatic six-rings sharing the 4-9 edge.
pub fn naphthalene() -> Graph {
    let mut graph = ring_of(10, elements::C, bonds::AROMATIC);
    let _ = graph.add_edge(NodeId::new(4), NodeId::new(9), bonds::AROMATIC);
    graph
}

/// `C1CC1C1CC1`: two three-rings joined by one bridge (2-3).
pub fn two_triangles() -> Graph {
    let c = elements::C;
    let s = bonds::SINGLE;
    molecule(
        &[c, c, c, c, c, c],
        &[(0, 1, s), (1, 2, s), (2, 0, s), (2, 3, s), (3, 4, s), (4, 5, s), (5, 3, s)],
    )
}

/// `OCC1CCCCC1`: a cyclohexane ring with a two-atom side chain.
pub fn cyclohexyl_ethanol() -> Graph {
    let mut graph = cyclohexane();
    let c = graph.add_node(elements::C);
    let o = graph.add_node(elements::O);
    let _ = graph.add_edge(NodeId::new(0), c, bonds::SINGLE);
    let _ = graph.add_edge(c, o, bonds::SINGLE);
    graph
}

/// An enumeration case: pattern, host and the expected embedding count.
#[derive(Debug, Clone)]
pub struct TestCase {
    /// Case name, reported on failure.
    pub name: &'static str,
    /// Settings for the enumeration.
    pub config: Config,
    /// The pattern to embed.
    pub pattern: &'static Graph,
    /// The graph to embed into.
    pub host: &'static Graph,
    /// Embeddings the enumeration must report.
    pub expected_matches: usize,
}

// #####################
// PATTERNS
// #####################
lazy_static::lazy_static! {
    pub static ref AROMATIC_BOND: Graph = bond_between(elements::C, elements::C, bonds::AROMATIC);
    pub static ref SINGLE_CC: Graph = bond_between(elements::C, elements::C, bonds::SINGLE);
    pub static ref SINGLE_CO: Graph = bond_between(elements::C, elements::O, bonds::SINGLE);
    pub static ref PROPANE: Graph = chain_of(3, elements::C, bonds::SINGLE);
    pub static ref OXYGEN: Graph = molecule(&[elements::O], &[]);
    pub static ref ANY_ATOM: Graph = molecule(&[NodeType::ANY], &[]);
}

// #####################
// HOSTS
// #####################
lazy_static::lazy_static! {
    pub static ref ETHANOL: Graph = ethanol();
    pub static ref ACETIC_ACID: Graph = acetic_acid();
    pub static ref BENZENE: Graph = benzene();
    pub static ref CYCLOHEXANE: Graph = cyclohexane();
    pub static ref HEXANE: Graph = hexane();
    pub static ref NAPHTHALENE: Graph = naphthalene();
    pub static ref TWO_TRIANGLES: Graph = two_triangles();
}

fn all() -> Config {
    Config::builder().match_mode(MatchMode::All).build()
}

fn first() -> Config {
    Config::builder().match_mode(MatchMode::First).build()
}

lazy_static::lazy_static! {
    pub static ref EMBED_TEST_CASES: Vec<TestCase> = vec![
        TestCase {
            name: "aromatic_bond_in_benzene",
            config: all(),
            pattern: &AROMATIC_BOND,
            host: &BENZENE,
            expected_matches: 6,
        },
        TestCase {
            name: "benzene_in_benzene",
            config: all(),
            pattern: &BENZENE,
            host: &BENZENE,
            expected_matches: 12,
        },
        TestCase {
            name: "benzene_in_naphthalene",
            config: all(),
            pattern: &BENZENE,
            host: &NAPHTHALENE,
            expected_matches: 24,
        },
        TestCase {
            name: "benzene_in_naphthalene_first",
            config: first(),
            pattern: &BENZENE,
            host: &NAPHTHALENE,
            expected_matches: 1,
        },
        TestCase {
            name: "cyclohexane_in_benzene",
            config: all(),
            pattern: &CYCLOHEXANE,
            host: &BENZENE,
            expected_matches: 0,
        },
        TestCase {
            name: "naphthalene_in_benzene",
            config: all(),
            pattern: &NAPHTHALENE,
            host: &BENZENE,
            expected_matches: 0,
        },
        TestCase {
            name: "ethanol_in_acetic_acid",
            config: all(),
            pattern: &ETHANOL,
            host: &ACETIC_ACID,
            expected_matches: 1,
        },
        TestCase {
            name: "single_co_in_ethanol",
            config: all(),
            pattern: &SINGLE_CO,
            host: &ETHANOL,
            expected_matches: 1,
        },
        TestCase {
            name: "single_cc_in_hexane",
            config: all(),
            pattern: &SINGLE_CC,
            host: &HEXANE,
            expected_matches: 5,
        },
        TestCase {
            name: "propane_in_hexane",
            config: all(),
            pattern: &PROPANE,
            host: &HEXANE,
            expected_matches: 8,
        },
        TestCase {
            name: "oxygen_in_acetic_acid",
            config: all(),
            pattern: &OXYGEN,
            host: &ACETIC_ACID,
            expected_matches: 2,
        },
        TestCase {
            name: "any_atom_in_ethanol",
            config: all(),
            pattern: &ANY_ATOM,
            host: &ETHANOL,
            expected_matches: 3,
        },
        TestCase {
            name: "any_atom_in_ethanol_first",
            config: first(),
            pattern: &ANY_ATOM,
            host: &ETHANOL,
            expected_matches: 1,
        },
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_have_expected_sizes() {
        assert_eq!((BENZENE.node_count(), BENZENE.edge_count()), (6, 6));
        assert_eq!((NAPHTHALENE.node_count(), NAPHTHALENE.edge_count()), (10, 11));
        assert_eq!((TWO_TRIANGLES.node_count(), TWO_TRIANGLES.edge_count()), (6, 7));
        assert_eq!((HEXANE.node_count(), HEXANE.edge_count()), (6, 5));
        assert_eq!(cyclohexyl_ethanol().node_count(), 8);
        assert!(EMBED_TEST_CASES.iter().all(|c| c.pattern.is_connected()));
    }
}
