//! Structural hashing: at most one and gate per unordered pair of fanins.

use std::{collections::HashMap, mem::swap};

use crate::Literal;

/// Applies the algebraic identities of the AND operator, in this order:
/// `x & 0 = 0`, `1 & x = x`, `x & 1 = x`, `x & x = x`, `x & !x = 0`.
///
/// Returns [`None`] if none of them applies, ie a real gate is needed.
pub fn simplify_and(lit0: Literal, lit1: Literal) -> Option<Literal> {
    if lit0.is_const_false() || lit1.is_const_false() {
        Some(Literal::FALSE)
    } else if lit0.is_const_true() {
        Some(lit1)
    } else if lit1.is_const_true() {
        Some(lit0)
    } else if lit0 == lit1 {
        Some(lit0)
    } else if lit0.is_complement_of(lit1) {
        Some(Literal::FALSE)
    } else {
        None
    }
}

/// AND is commutative: the key of a gate is its fanin pair sorted in increasing order.
pub fn normalize(mut lit0: Literal, mut lit1: Literal) -> (Literal, Literal) {
    if lit0 > lit1 {
        swap(&mut lit0, &mut lit1);
    }
    (lit0, lit1)
}

/// The hash-consing table, from normalized fanin pairs to the literal of the gate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Strash {
    table: HashMap<(Literal, Literal), Literal>,
}

impl Strash {
    pub fn get(&self, lit0: Literal, lit1: Literal) -> Option<Literal> {
        self.table.get(&normalize(lit0, lit1)).copied()
    }

    pub fn insert(&mut self, lit0: Literal, lit1: Literal, gate: Literal) {
        self.table.insert(normalize(lit0, lit1), gate);
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(Literal, Literal), &Literal)> {
        self.table.iter()
    }
}
