use log::debug;

use crate::{Aig, AigError, Literal, Result};

/// Maps an old literal to the new AIG, through the mapping of its node.
fn resolve(old2new: &[Option<Literal>], lit: Literal) -> Result<Literal> {
    old2new[lit.index()]
        .map(|new| new ^ lit.is_inverted())
        .ok_or_else(|| {
            AigError::InvalidState(format!(
                "literal {} was reached before its node was mapped",
                lit
            ))
        })
}

impl Aig {
    /// Rebuilds the whole AIG from its outputs, in a brand new node store.
    ///
    /// This is the canonicalization of the AIG:
    /// - constants are propagated and trivial gates are removed (same rules as [`Aig::add_and`]),
    /// - structural hashing is recomputed from scratch, so that gates which became identical
    ///   are merged,
    /// - gates which are not reachable from an output are dropped.
    ///
    /// The strategy to do the rebuild is roughly the same as building an AIG from a file:
    /// - create inputs (all of them, in the same order, even if unused)
    /// - create and gates in topological order, starting from the outputs
    /// - register outputs.
    ///
    /// All ids are renumbered, except the constant node. The new AIG replaces the current one
    /// only if the rebuild succeeded.
    ///
    /// ```rust
    /// use aigopt::{Aig, Literal};
    /// let mut aig = Aig::new();
    /// let a = Literal::new(aig.add_input(), false);
    /// let b = Literal::new(aig.add_input(), false);
    /// let _unused = aig.add_and(a, !b).unwrap();
    /// let ab = aig.add_and(a, b).unwrap();
    /// aig.add_output(ab).unwrap();
    /// assert_eq!(aig.gate_count(), 2);
    /// aig.optimize().unwrap();
    /// assert_eq!(aig.gate_count(), 1);
    /// ```
    pub fn optimize(&mut self) -> Result<()> {
        let mut aig = self.rebuild()?;

        // Fanins are built before their gate is simplified away (think of `g & !g`),
        // a second rebuild drops them. It never needs a third one: nothing simplifies anymore.
        let live_gates = aig
            .get_topological_sort()?
            .into_iter()
            .filter(|&id| aig.nodes[id as usize].is_and())
            .count();
        if live_gates < aig.gate_count() {
            debug!("optimize: rebuilding again to drop gates left behind by simplifications");
            aig = aig.rebuild()?;
        }

        aig.check_integrity()?;

        debug!(
            "optimize: {} nodes ({} gates) -> {} nodes ({} gates)",
            self.node_count(),
            self.gate_count(),
            aig.node_count(),
            aig.gate_count()
        );

        // The structural hashing table of the new AIG comes along
        *self = aig;
        Ok(())
    }

    fn rebuild(&self) -> Result<Aig> {
        let mut aig = Aig::new();
        let mut old2new: Vec<Option<Literal>> = vec![None; self.nodes.len()];
        old2new[0] = Some(Literal::FALSE);

        // Adding inputs
        for &id in &self.inputs {
            let new_id = aig.add_input();
            old2new[id as usize] = Some(Literal::new(new_id, false));
        }

        // Adding and gates, fanins first
        for id in self.get_topological_sort()? {
            if old2new[id as usize].is_some() {
                continue;
            }
            let (fanin0, fanin1) = self.nodes[id as usize].get_fanins().ok_or_else(|| {
                AigError::InvalidState(format!("node {} is an unregistered input", id))
            })?;
            let lit0 = resolve(&old2new, fanin0)?;
            let lit1 = resolve(&old2new, fanin1)?;
            old2new[id as usize] = Some(aig.add_and(lit0, lit1)?);
        }

        // Mark outputs
        for &output in &self.outputs {
            aig.add_output(resolve(&old2new, output)?)?;
        }

        Ok(aig)
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use crate::{Aig, AigError, AigNode, FaninId, Literal};

    fn with_inputs(n: usize) -> (Aig, Vec<Literal>) {
        let mut aig = Aig::new();
        let lits = (0..n)
            .map(|_| Literal::new(aig.add_input(), false))
            .collect();
        (aig, lits)
    }

    #[test]
    fn inverted_output_scenario() {
        // aag 3 2 0 1 1 / 2 / 4 / 7 / 6 2 4
        let (mut aig, _) = with_inputs(2);
        let g = aig
            .add_and(Literal::from_raw(2), Literal::from_raw(4))
            .unwrap();
        aig.add_output(g ^ true).unwrap();
        aig.optimize().unwrap();
        assert_eq!(
            aig.metrics().to_string(),
            "pis=2, pos=1, area=1, depth=1, not=1"
        );
    }

    #[test]
    fn dead_logic_elimination() {
        let (mut aig, lits) = with_inputs(3);
        let dead = aig.add_and(lits[0], lits[1]).unwrap();
        let dead2 = aig.add_and(dead, lits[2]).unwrap();
        let live = aig.add_and(!lits[1], lits[2]).unwrap();
        aig.add_output(live).unwrap();
        assert_eq!(aig.gate_count(), 3);

        aig.optimize().unwrap();
        assert_eq!(aig.gate_count(), 1);
        assert_eq!(aig.node_count(), 5);
        // The remaining gate is the live one
        assert_eq!(
            aig.get_node(4),
            Some(&AigNode::and(Literal::new(2, true), Literal::new(3, false)))
        );
        // Old literals must not be reused: the dead ones are simply gone
        assert!(aig.get_node(dead2.node_id()).is_none());
    }

    #[test]
    fn inputs_survive_in_order() {
        let (mut aig, lits) = with_inputs(4);
        let g = aig.add_and(lits[3], lits[1]).unwrap();
        aig.add_output(g).unwrap();
        aig.optimize().unwrap();
        assert_eq!(aig.inputs(), &[1, 2, 3, 4]);
        assert_eq!(
            aig.fanins(aig.outputs()[0]),
            Some((Literal::new(2, false), Literal::new(4, false)))
        );
    }

    #[test]
    fn constants_are_propagated() {
        let (mut aig, lits) = with_inputs(3);
        let g = aig.add_and(lits[0], lits[1]).unwrap();
        let h = aig.add_and(g, lits[2]).unwrap();
        aig.add_output(h).unwrap();
        aig.add_output(!h).unwrap();

        // h = 0 & c
        aig.replace_fanin(h.node_id(), FaninId::Fanin1, Literal::FALSE);
        aig.optimize().unwrap();
        assert_eq!(aig.gate_count(), 0);
        assert_eq!(aig.outputs(), &[Literal::FALSE, Literal::TRUE]);
    }

    #[test]
    fn identical_gates_are_merged() {
        let (mut aig, lits) = with_inputs(3);
        let g1 = aig.add_and(lits[0], lits[1]).unwrap();
        let g2 = aig.add_and(lits[0], lits[2]).unwrap();
        let h = aig.add_and(g1, !g2).unwrap();
        aig.add_output(h).unwrap();

        // g2 becomes a & b, bypassing structural hashing, so h = g1 & !g1
        aig.replace_fanin(g2.node_id(), FaninId::Fanin1, lits[1]);
        aig.optimize().unwrap();
        assert_eq!(aig.gate_count(), 0);
        assert_eq!(aig.outputs(), &[Literal::FALSE]);
    }

    #[test]
    fn sharing_is_preserved() {
        // Diamond: g feeds both h1 and h2
        let (mut aig, lits) = with_inputs(3);
        let g = aig.add_and(lits[0], lits[1]).unwrap();
        let h1 = aig.add_and(g, lits[2]).unwrap();
        let h2 = aig.add_and(!g, !lits[2]).unwrap();
        let top = aig.add_and(!h1, !h2).unwrap();
        aig.add_output(top).unwrap();
        aig.add_output(h1).unwrap();

        aig.optimize().unwrap();
        assert_eq!(aig.gate_count(), 4);
    }

    #[test]
    fn builder_dedupes_against_canonical_graph() {
        let (mut aig, lits) = with_inputs(2);
        let g = aig.add_and(lits[0], lits[1]).unwrap();
        aig.add_output(g).unwrap();
        aig.optimize().unwrap();

        let count = aig.node_count();
        let again = aig.add_and(lits[1], lits[0]).unwrap();
        assert_eq!(again, aig.outputs()[0]);
        assert_eq!(aig.node_count(), count);
    }

    #[test]
    fn optimize_is_idempotent() {
        let (mut aig, lits) = with_inputs(4);
        let g = aig.add_and(lits[0], !lits[1]).unwrap();
        let h = aig.add_and(lits[2], lits[3]).unwrap();
        let k = aig.add_and(!g, h).unwrap();
        let m = aig.add_and(k, lits[0]).unwrap();
        aig.add_output(!m).unwrap();
        aig.add_output(k).unwrap();

        aig.optimize().unwrap();
        let once = aig.clone();
        aig.optimize().unwrap();
        assert_eq!(aig.metrics(), once.metrics());
        assert_eq!(aig.node_count(), once.node_count());
        assert_eq!(aig.truth_tables().unwrap(), once.truth_tables().unwrap());
    }

    #[test]
    fn unregistered_input_is_an_invalid_state() {
        let (mut aig, lits) = with_inputs(1);
        // An input which is not in the list of inputs
        aig.nodes.push(AigNode::Input);
        let ghost = Literal::new(2, false);
        let g = aig.add_and(lits[0], ghost).unwrap();
        aig.add_output(g).unwrap();

        let before = aig.clone();
        assert!(matches!(aig.optimize(), Err(AigError::InvalidState(_))));
        // Nothing changed
        assert_eq!(aig, before);
    }

    #[test]
    fn empty_aig() {
        let mut aig = Aig::new();
        aig.optimize().unwrap();
        assert_eq!(aig, Aig::new());
    }
}
