use crate::Literal;

/// A node id, ie the index of the node in the node store.
///
/// The constant node [`AigNode::False`] has id 0 by convention.
pub type NodeId = u32;

/// Unambiguous fanin selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaninId {
    Fanin0,
    Fanin1,
}

/// An AIG node.
///
/// Nodes do not carry their id: the id is the position of the node in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AigNode {
    /// The constant low/false signal, always stored at id 0.
    False,
    /// A primary input.
    Input,
    /// An AND gate with two fanins.
    And { fanin0: Literal, fanin1: Literal },
}

impl AigNode {
    /// Returns a new and gate.
    pub fn and(fanin0: Literal, fanin1: Literal) -> Self {
        AigNode::And { fanin0, fanin1 }
    }

    pub fn is_false(&self) -> bool {
        matches!(self, AigNode::False)
    }

    pub fn is_input(&self) -> bool {
        matches!(self, AigNode::Input)
    }

    pub fn is_and(&self) -> bool {
        matches!(self, AigNode::And { .. })
    }

    /// Returns both fanins if the node is an and gate, else returns [`None`].
    pub fn get_fanins(&self) -> Option<(Literal, Literal)> {
        match *self {
            AigNode::And { fanin0, fanin1 } => Some((fanin0, fanin1)),
            _ => None,
        }
    }

    pub fn get_fanin(&self, fanin_id: FaninId) -> Option<Literal> {
        let (fanin0, fanin1) = self.get_fanins()?;
        match fanin_id {
            FaninId::Fanin0 => Some(fanin0),
            FaninId::Fanin1 => Some(fanin1),
        }
    }

    /// Overwrites one fanin. Does nothing on the constant node and inputs.
    ///
    /// The caller is responsible for the owning AIG invariants (topological order,
    /// structural hashing): only the rewrite engine does this, right before a canonicalization.
    pub(crate) fn set_fanin(&mut self, fanin_id: FaninId, lit: Literal) {
        match (self, fanin_id) {
            (AigNode::And { fanin0, .. }, FaninId::Fanin0) => *fanin0 = lit,
            (AigNode::And { fanin1, .. }, FaninId::Fanin1) => *fanin1 = lit,
            _ => (),
        }
    }
}
