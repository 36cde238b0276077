use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use tracing::debug;

use super::{Graph, NodeType};

/// Maps node types to dense codes ranked by how many graphs contain them.
///
/// Rare types get small codes, so after encoding the type-minimal node of a
/// pattern (the root chosen by [`Graph::prepare_embed`]) is also the rarest
/// one in the database. Flag bits pass through unchanged.
#[derive(Clone, Debug, Default)]
pub struct Recoder {
    support: HashMap<u32, usize>,
    /// Base types in code order; filled by [`commit`](Self::commit).
    types: Vec<u32>,
    codes: HashMap<u32, u32>,
}

impl Recoder {
    /// An empty recoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts every base node type of `graph` once.
    pub fn count(&mut self, graph: &Graph) {
        let seen: HashSet<u32> = graph.nodes().iter().map(|n| n.ty().base()).collect();
        for ty in seen {
            *self.support.entry(ty).or_default() += 1;
        }
    }

    /// Number of counted graphs that contain `ty`.
    pub fn support(&self, ty: NodeType) -> usize {
        self.support.get(&ty.base()).copied().unwrap_or(0)
    }

    /// Freezes the code table: ascending support, ties broken by type.
    pub fn commit(&mut self) {
        self.types = self
            .support
            .iter()
            .sorted_by_key(|&(&ty, &count)| (count, ty))
            .map(|(&ty, _)| ty)
            .collect();
        self.codes = self
            .types
            .iter()
            .enumerate()
            .map(|(code, &ty)| (ty, code as u32))
            .collect();
        debug!("recoder committed {} node types", self.types.len());
    }

    /// Number of types with an assigned code.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Has no type been recorded yet?
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Code for `ty`. Types the recoder never saw are shifted past the table.
    pub fn encode(&self, ty: NodeType) -> NodeType {
        let flags = ty.raw() & NodeType::FLAGS;
        let code = self
            .codes
            .get(&ty.base())
            .copied()
            .unwrap_or(self.types.len() as u32 + ty.base());
        NodeType::new(code | flags)
    }

    /// Inverse of [`encode`](Self::encode).
    pub fn decode(&self, ty: NodeType) -> NodeType {
        let flags = ty.raw() & NodeType::FLAGS;
        let code = ty.base();
        let base = self
            .types
            .get(code as usize)
            .copied()
            .unwrap_or_else(|| code - self.types.len() as u32);
        NodeType::new(base | flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::elements;
    use crate::test_cases::*;

    fn committed() -> Recoder {
        let mut recoder = Recoder::new();
        for g in [ethanol(), acetic_acid(), benzene(), cyclohexane()] {
            recoder.count(&g);
        }
        recoder.commit();
        recoder
    }

    #[test]
    fn rarer_types_get_smaller_codes() {
        let recoder = committed();
        assert_eq!(recoder.support(elements::C), 4);
        assert_eq!(recoder.support(elements::O), 2);
        assert!(recoder.encode(elements::O) < recoder.encode(elements::C));
        assert_eq!(recoder.len(), 2);
    }

    #[test]
    fn unknown_types_and_flags_survive_a_round_trip() {
        let recoder = committed();
        for ty in [elements::N, elements::C.with(NodeType::RING), elements::S.with(NodeType::CHAIN)] {
            assert_eq!(recoder.decode(recoder.encode(ty)), ty);
        }
    }
}
