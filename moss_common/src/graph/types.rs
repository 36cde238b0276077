//! Integer type codes for nodes and edges.
//!
//! A type code is a plain `u32`: the low bits carry the chemical meaning
//! (element and charge for atoms, bond kind for bonds) and the high bits carry
//! structural flags that the algorithms set or interpret. Matching compares
//! the full code, so a ring-flagged bond only matches ring-flagged bonds.

use serde::{Deserialize, Serialize};
use std::fmt;

const ELEMENT_MASK: u32 = 0x0000_00ff;
const CHARGE_SHIFT: u32 = 8;
const CHARGE_MASK: u32 = 0x0000_ff00;

/// Type code of a node (an atom).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeType(u32);

impl NodeType {
    /// Node lies on at least one marked ring.
    pub const RING: u32 = 0x1000_0000;
    /// Pattern placeholder for a run of same-typed degree-2 nodes.
    pub const CHAIN: u32 = 0x2000_0000;
    /// Pattern node that matches any host node.
    pub const WILDCARD: u32 = 0x4000_0000;
    /// All flag bits.
    pub const FLAGS: u32 = Self::RING | Self::CHAIN | Self::WILDCARD;

    /// A node type that matches every host node.
    pub const ANY: Self = Self(Self::WILDCARD);

    /// Wraps a raw type code.
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    /// Encodes an atom from its element number and formal charge.
    pub const fn atom(element: u8, charge: i8) -> Self {
        Self(element as u32 | (((charge as u8) as u32) << CHARGE_SHIFT))
    }

    /// The raw code including flag bits.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The code with all flag bits cleared.
    pub const fn base(self) -> u32 {
        self.0 & !Self::FLAGS
    }

    /// Element number (low byte of the base code).
    pub const fn element(self) -> u8 {
        (self.0 & ELEMENT_MASK) as u8
    }

    /// Formal charge.
    pub const fn charge(self) -> i8 {
        ((self.0 & CHARGE_MASK) >> CHARGE_SHIFT) as u8 as i8
    }

    /// Is the ring flag set?
    pub const fn is_ring(self) -> bool {
        self.0 & Self::RING != 0
    }

    /// Is the chain flag set?
    pub const fn is_chain(self) -> bool {
        self.0 & Self::CHAIN != 0
    }

    /// Is the wildcard flag set?
    pub const fn is_wildcard(self) -> bool {
        self.0 & Self::WILDCARD != 0
    }

    /// Returns a copy with `flag` set.
    pub const fn with(self, flag: u32) -> Self {
        Self(self.0 | flag)
    }

    /// Returns a copy with `flag` cleared.
    pub const fn without(self, flag: u32) -> Self {
        Self(self.0 & !flag)
    }

    /// The value host neighbor types are compared against when scanning a
    /// sorted adjacency list, or `None` if this pattern type matches anything.
    pub const fn match_key(self) -> Option<u32> {
        if self.is_wildcard() {
            None
        } else {
            Some(self.0 & !Self::CHAIN)
        }
    }

    /// Does this pattern type accept the host type `host`?
    pub const fn matches(self, host: Self) -> bool {
        match self.match_key() {
            None => true,
            Some(key) => key == host.0,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wildcard() {
            return write!(f, "*");
        }
        write!(f, "{}", self.base())?;
        if self.is_chain() {
            write!(f, "~")?;
        }
        if self.is_ring() {
            write!(f, "@")?;
        }
        Ok(())
    }
}

/// Type code of an edge (a bond).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeType(u32);

impl EdgeType {
    /// Edge lies on at least one marked ring.
    pub const RING: u32 = 0x1000_0000;
    /// Pattern edge that matches any host edge.
    pub const WILDCARD: u32 = 0x4000_0000;
    /// All flag bits.
    pub const FLAGS: u32 = Self::RING | Self::WILDCARD;

    /// An edge type that matches every host edge.
    pub const ANY: Self = Self(Self::WILDCARD);

    /// Wraps a raw type code.
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    /// The raw code including flag bits.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The code with all flag bits cleared.
    pub const fn base(self) -> u32 {
        self.0 & !Self::FLAGS
    }

    /// Is the ring flag set?
    pub const fn is_ring(self) -> bool {
        self.0 & Self::RING != 0
    }

    /// Is the wildcard flag set?
    pub const fn is_wildcard(self) -> bool {
        self.0 & Self::WILDCARD != 0
    }

    /// Returns a copy with `flag` set.
    pub const fn with(self, flag: u32) -> Self {
        Self(self.0 | flag)
    }

    /// Returns a copy with `flag` cleared.
    pub const fn without(self, flag: u32) -> Self {
        Self(self.0 & !flag)
    }

    /// See [`NodeType::match_key`].
    pub const fn match_key(self) -> Option<u32> {
        if self.is_wildcard() {
            None
        } else {
            Some(self.0)
        }
    }

    /// Does this pattern type accept the host type `host`?
    pub const fn matches(self, host: Self) -> bool {
        match self.match_key() {
            None => true,
            Some(key) => key == host.0,
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wildcard() {
            return write!(f, "~");
        }
        match self.base() {
            bonds::SINGLE_CODE => write!(f, "-")?,
            bonds::DOUBLE_CODE => write!(f, "=")?,
            bonds::TRIPLE_CODE => write!(f, "#")?,
            bonds::AROMATIC_CODE => write!(f, ":")?,
            other => write!(f, "<{other}>")?,
        }
        if self.is_ring() {
            write!(f, "@")?;
        }
        Ok(())
    }
}

/// Element codes for the atoms used throughout tests and fixtures.
pub mod elements {
    use super::NodeType;

    /// Hydrogen.
    pub const H: NodeType = NodeType::atom(1, 0);
    /// Carbon.
    pub const C: NodeType = NodeType::atom(6, 0);
    /// Nitrogen.
    pub const N: NodeType = NodeType::atom(7, 0);
    /// Oxygen.
    pub const O: NodeType = NodeType::atom(8, 0);
    /// Sulfur.
    pub const S: NodeType = NodeType::atom(16, 0);
    /// Chlorine.
    pub const CL: NodeType = NodeType::atom(17, 0);
}

/// Bond codes.
pub mod bonds {
    use super::EdgeType;

    pub(super) const SINGLE_CODE: u32 = 1;
    pub(super) const DOUBLE_CODE: u32 = 2;
    pub(super) const TRIPLE_CODE: u32 = 3;
    pub(super) const AROMATIC_CODE: u32 = 4;

    /// Single bond.
    pub const SINGLE: EdgeType = EdgeType::new(SINGLE_CODE);
    /// Double bond.
    pub const DOUBLE: EdgeType = EdgeType::new(DOUBLE_CODE);
    /// Triple bond.
    pub const TRIPLE: EdgeType = EdgeType::new(TRIPLE_CODE);
    /// Aromatic bond.
    pub const AROMATIC: EdgeType = EdgeType::new(AROMATIC_CODE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atom_round_trips_element_and_charge() {
        let t = NodeType::atom(7, -1);
        assert_eq!(t.element(), 7);
        assert_eq!(t.charge(), -1);
        assert_eq!(t.base(), t.raw());
    }

    #[test]
    fn wildcard_matches_everything() {
        assert!(NodeType::ANY.matches(elements::O));
        assert!(EdgeType::ANY.matches(bonds::DOUBLE));
        assert!(!elements::C.matches(elements::O));
    }

    #[test]
    fn chain_flag_is_ignored_when_matching() {
        let chain = elements::C.with(NodeType::CHAIN);
        assert!(chain.is_chain());
        assert!(chain.matches(elements::C));
        assert!(!chain.matches(elements::C.with(NodeType::RING)));
    }

    #[test]
    fn ring_flag_is_part_of_the_type() {
        let ring = bonds::SINGLE.with(EdgeType::RING);
        assert!(!bonds::SINGLE.matches(ring));
        assert!(ring.matches(ring));
        assert_eq!(ring.without(EdgeType::RING), bonds::SINGLE);
        assert_eq!(ring.to_string(), "-@");
    }
}
