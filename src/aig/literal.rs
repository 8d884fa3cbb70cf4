//! A [`Literal`] points at an [`AigNode`] and can be complemented (indicates the presence of a NOT gate).
//!
//! [`AigNode`]: crate::AigNode

use std::{
    fmt::Display,
    ops::{BitXor, Not},
};

use crate::NodeId;

/// A signed reference to a node: the node id and a polarity bit packed in one integer.
///
/// The encoding is the AIGER one, `2 * id + inverted`. Literal `0` is the constant false,
/// literal `1` the constant true.
///
/// ```rust
/// use aigopt::Literal;
/// let x = Literal::new(3, false);
/// assert_eq!(x.raw(), 6);
/// assert_eq!(!x, Literal::new(3, true));
/// assert_eq!(x ^ true, !x);
/// assert_eq!((!x).node_id(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Literal(u32);

impl Literal {
    /// The constant false signal.
    pub const FALSE: Literal = Literal(0);
    /// The constant true signal.
    pub const TRUE: Literal = Literal(1);

    pub const fn new(id: NodeId, inverted: bool) -> Self {
        Literal((id << 1) | inverted as u32)
    }

    /// Builds a literal from its AIGER integer.
    pub const fn from_raw(raw: u32) -> Self {
        Literal(raw)
    }

    /// Returns the AIGER integer.
    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn node_id(self) -> NodeId {
        self.0 >> 1
    }

    /// Node id as an index into the node store.
    pub(crate) const fn index(self) -> usize {
        (self.0 >> 1) as usize
    }

    pub const fn is_inverted(self) -> bool {
        self.0 & 1 == 1
    }

    pub const fn is_const_false(self) -> bool {
        self.0 == 0
    }

    pub const fn is_const_true(self) -> bool {
        self.0 == 1
    }

    pub const fn is_complement_of(self, other: Literal) -> bool {
        self.0 ^ 1 == other.0
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self::Output {
        Literal(self.0 ^ 1)
    }
}

/// `lit ^ inverted` applies an extra inversion when `inverted` is set.
impl BitXor<bool> for Literal {
    type Output = Self;

    fn bitxor(self, inverted: bool) -> Self::Output {
        Literal(self.0 ^ inverted as u32)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
