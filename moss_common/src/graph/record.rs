use serde::{Deserialize, Serialize};

use super::{EdgeType, Graph, NodeId, NodeType};
use crate::GraphError;

/// Plain serializable form of a [`Graph`]: node types in id order and edges
/// as `(src, dst, type)` triples.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRecord {
    /// Optional label, e.g. a molecule identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Node types, indexed by node.
    pub nodes: Vec<NodeType>,
    /// `(src, dst, type)` per edge.
    pub edges: Vec<(u32, u32, EdgeType)>,
}

impl From<&Graph> for GraphRecord {
    fn from(graph: &Graph) -> Self {
        Self {
            name: None,
            nodes: graph.nodes().iter().map(|n| n.ty()).collect(),
            edges: graph
                .edges()
                .iter()
                .map(|e| (u32::from(e.src()), u32::from(e.dst()), e.ty()))
                .collect(),
        }
    }
}

impl TryFrom<&GraphRecord> for Graph {
    type Error = GraphError;

    fn try_from(record: &GraphRecord) -> Result<Self, Self::Error> {
        let mut graph = Self::with_capacity(record.nodes.len(), record.edges.len());
        for &ty in &record.nodes {
            graph.add_node(ty);
        }
        for (index, &(src, dst, ty)) in record.edges.iter().enumerate() {
            graph
                .add_edge(NodeId::new(src), NodeId::new(dst), ty)
                .map_err(|source| GraphError::Record {
                    index,
                    source: Box::new(source),
                })?;
        }
        graph.prepare();
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_cases::*;

    #[test]
    fn record_survives_json() {
        let record = GraphRecord::from(&acetic_acid());
        let json = serde_json::to_string(&record).unwrap();
        let back: GraphRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        let graph = Graph::try_from(&back).unwrap();
        assert_eq!(graph.hash_code(), acetic_acid().hash_code());
    }

    #[test]
    fn bad_edge_reports_its_index() {
        let json = r#"{"nodes":[6,8],"edges":[[0,1,1],[1,1,1]]}"#;
        let record: GraphRecord = serde_json::from_str(json).unwrap();
        let err = Graph::try_from(&record).unwrap_err();
        assert!(matches!(err, GraphError::Record { index: 1, .. }));
    }
}
