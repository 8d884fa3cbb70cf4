//! Size and shape of an AIG: inputs, outputs, gates, logic depth and inverters.
//!
//! ```rust
//! use aigopt::{Aig, Literal};
//! let mut aig = Aig::new();
//! let a = Literal::new(aig.add_input(), false);
//! let b = Literal::new(aig.add_input(), false);
//! let g = aig.add_and(a, b).unwrap();
//! aig.add_output(!g).unwrap();
//! assert_eq!(aig.metrics().to_string(), "pis=2, pos=1, area=1, depth=1, not=1");
//! ```

use std::fmt::Display;

use log::warn;

use crate::{Aig, AigNode};

/// A snapshot of the metrics of an AIG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Metrics {
    /// Number of primary inputs.
    pub pis: usize,
    /// Number of outputs (duplicates included).
    pub pos: usize,
    /// Number of and gates.
    pub area: usize,
    /// Number of and gates on the longest path from an input to an output.
    pub depth: usize,
    /// Number of nodes used with an inverted polarity somewhere.
    pub not: usize,
}

impl Display for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pis={}, pos={}, area={}, depth={}, not={}",
            self.pis, self.pos, self.area, self.depth, self.not
        )
    }
}

impl Aig {
    /// Computes all the metrics at once.
    pub fn metrics(&self) -> Metrics {
        Metrics {
            pis: self.inputs().len(),
            pos: self.outputs().len(),
            area: self.gate_count(),
            depth: self.depth(),
            not: self.inverter_count(),
        }
    }

    /// Logic depth: inputs and constant have depth 0, a gate is one level above its deepest fanin.
    /// The depth of the AIG is the maximal depth of its outputs.
    ///
    /// The AIG must be acyclic, which only a rewrite in progress can break. A cycle is a bug:
    /// it panics in debug builds and is logged, with a depth of 0, in release builds.
    pub fn depth(&self) -> usize {
        let sort = self.get_topological_sort();
        debug_assert!(sort.is_ok(), "depth of a cyclic AIG: {:?}", sort.as_ref().err());
        let sort = match sort {
            Ok(sort) => sort,
            Err(e) => {
                warn!("cannot compute the depth, reporting 0: {}", e);
                return 0;
            }
        };

        let mut depths = vec![0; self.node_count()];
        for id in sort {
            if let AigNode::And { fanin0, fanin1 } = self.nodes()[id as usize] {
                depths[id as usize] = 1 + depths[fanin0.index()].max(depths[fanin1.index()]);
            }
        }

        self.outputs()
            .iter()
            .map(|output| depths[output.index()])
            .max()
            .unwrap_or(0)
    }

    /// Number of distinct nodes referred to with an inverted literal, either by a gate or by an output.
    ///
    /// This is a structural proxy of the number of NOT gates after technology mapping:
    /// a node needs at most one inverter whatever the number of inverted references.
    pub fn inverter_count(&self) -> usize {
        let mut inverted = vec![false; self.node_count()];
        let fanins = self
            .nodes()
            .iter()
            .filter_map(|node| node.get_fanins())
            .flat_map(|(fanin0, fanin1)| [fanin0, fanin1]);
        for lit in fanins.chain(self.outputs().iter().copied()) {
            if lit.is_inverted() {
                inverted[lit.index()] = true;
            }
        }
        inverted.into_iter().filter(|&used| used).count()
    }
}
