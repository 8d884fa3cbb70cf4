use crate::{Aig, AigError, AigNode, Literal, NodeId, Result};

impl Aig {
    /// Checking if the AIG structure is correct, that is:
    /// - node 0 is the constant node, and the only one
    /// - inputs listed are exactly the input nodes, without duplicates
    /// - every gate refers to nodes with a strictly smaller id (topological order, hence no cycle)
    /// - every output refers to an existing node
    /// - the structural hashing table is in sync with the gates.
    ///
    /// The library is supposed to maintain integrity of the AIG at any moment, this is called
    /// after each canonicalization and is mostly useful for debug purposes.
    pub fn check_integrity(&self) -> Result<()> {
        if self.nodes.first() != Some(&AigNode::False) {
            return Err(AigError::InvalidState(
                "node 0 is not the constant node".to_string(),
            ));
        }

        // Checking that all nodes are individually fine
        let mut listed = vec![false; self.nodes.len()];
        for &id in &self.inputs {
            match self.nodes.get(id as usize) {
                Some(AigNode::Input) if !listed[id as usize] => listed[id as usize] = true,
                Some(AigNode::Input) => {
                    return Err(AigError::InvalidState(format!(
                        "input {} is listed twice",
                        id
                    )));
                }
                _ => {
                    return Err(AigError::InvalidState(format!(
                        "id={} is listed as an input but node is not an input",
                        id
                    )));
                }
            }
        }
        for (id, node) in self.nodes.iter().enumerate() {
            self.check_node_integrity(id as NodeId, node, listed[id])?;
        }

        // Checking that all outputs are nodes of the AIG
        for output in &self.outputs {
            self.check_fanin_integrity(self.nodes.len() as NodeId, *output)?;
        }

        // Checking structural hashing
        for (&(lit0, lit1), &gate) in self.strash.iter() {
            if gate.is_inverted() || self.fanins(gate) != Some((lit0, lit1)) {
                return Err(AigError::InvalidState(format!(
                    "structural hashing maps ({}, {}) to {} which is not such a gate",
                    lit0, lit1, gate
                )));
            }
        }

        Ok(())
    }

    fn check_node_integrity(&self, id: NodeId, node: &AigNode, listed: bool) -> Result<()> {
        match *node {
            AigNode::False => {
                if id != 0 {
                    return Err(AigError::InvalidState(format!(
                        "id={} but node is the constant node",
                        id
                    )));
                }
            }
            AigNode::Input => {
                if !listed {
                    return Err(AigError::InvalidState(format!(
                        "input {} is not listed as an input",
                        id
                    )));
                }
            }
            AigNode::And { fanin0, fanin1 } => {
                self.check_fanin_integrity(id, fanin0)?;
                self.check_fanin_integrity(id, fanin1)?;
            }
        }
        Ok(())
    }

    /// A fanin must refer to a node placed before its user.
    fn check_fanin_integrity(&self, user: NodeId, fanin: Literal) -> Result<()> {
        if fanin.node_id() >= user {
            return Err(AigError::InvalidState(format!(
                "node {} refers to literal {} which is not placed before it",
                user, fanin
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{Aig, AigNode, FaninId, Literal};

    fn small_aig() -> Aig {
        let mut aig = Aig::new();
        let a = Literal::new(aig.add_input(), false);
        let b = Literal::new(aig.add_input(), false);
        let g = aig.add_and(a, !b).unwrap();
        let h = aig.add_and(g, b).unwrap();
        aig.add_output(!h).unwrap();
        aig
    }

    #[test]
    fn builder_keeps_integrity() {
        let aig = small_aig();
        assert!(aig.check_integrity().is_ok());
        assert!(Aig::new().check_integrity().is_ok());
    }

    #[test]
    fn broken_topological_order() {
        let mut aig = small_aig();
        // Gate 3 now refers to gate 4
        aig.replace_fanin(3, FaninId::Fanin0, Literal::new(4, false));
        assert!(aig.check_integrity().is_err());
    }

    #[test]
    fn broken_strash() {
        let mut aig = small_aig();
        // Same order, but the table still knows the previous fanins
        aig.replace_fanin(4, FaninId::Fanin0, Literal::new(1, false));
        assert!(aig.check_integrity().is_err());
    }

    #[test]
    fn broken_inputs() {
        let mut aig = small_aig();
        aig.inputs.push(1);
        assert!(aig.check_integrity().is_err());

        let mut aig = small_aig();
        aig.inputs.push(3);
        assert!(aig.check_integrity().is_err());

        let mut aig = small_aig();
        aig.nodes.push(AigNode::Input);
        assert!(aig.check_integrity().is_err());

        let mut aig = small_aig();
        aig.nodes.push(AigNode::False);
        assert!(aig.check_integrity().is_err());
    }

    #[test]
    fn broken_output() {
        let mut aig = small_aig();
        aig.outputs.push(Literal::new(12, false));
        assert!(aig.check_integrity().is_err());
    }
}
