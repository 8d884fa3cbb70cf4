//! Writer for the ASCII AIGER format, the counterpart of the parser.

use std::io::Write;

use crate::{Aig, AigNode, Literal, NodeId, Result, aig::error::ParserError};

impl Aig {
    /// AIGER variable of each node: inputs first, in order, then gates by ascending id.
    fn aiger_variables(&self) -> Vec<u32> {
        let mut vars = vec![0; self.nodes.len()];
        let mut next = 1;
        for &id in &self.inputs {
            vars[id as usize] = next;
            next += 1;
        }
        for (id, node) in self.nodes.iter().enumerate() {
            if node.is_and() {
                vars[id] = next;
                next += 1;
            }
        }
        vars
    }

    /// Writes the AIG in the ASCII AIGER format.
    ///
    /// The AIG must be in topological order (which the builder and [`Aig::optimize`] guarantee),
    /// otherwise [`crate::AigError::InvalidState`] is returned and nothing is written.
    /// Dead gates are written too, call [`Aig::optimize`] first to get rid of them.
    pub fn write_ascii(&self, mut writer: impl Write) -> Result<()> {
        self.check_integrity()?;

        let vars = self.aiger_variables();
        let aiger = |lit: Literal| 2 * vars[lit.index()] + lit.is_inverted() as u32;

        let mut out = format!(
            "aag {} {} 0 {} {}\n",
            self.inputs.len() + self.gate_count(),
            self.inputs.len(),
            self.outputs.len(),
            self.gate_count()
        );
        for &id in &self.inputs {
            out.push_str(&format!("{}\n", aiger(Literal::new(id, false))));
        }
        for &output in &self.outputs {
            out.push_str(&format!("{}\n", aiger(output)));
        }
        for (id, node) in self.nodes.iter().enumerate() {
            if let AigNode::And { fanin0, fanin1 } = *node {
                let lhs = aiger(Literal::new(id as NodeId, false));
                let (rhs0, rhs1) = (aiger(fanin0), aiger(fanin1));
                // Conventionally the largest literal comes first
                out.push_str(&format!("{} {} {}\n", lhs, rhs0.max(rhs1), rhs0.min(rhs1)));
            }
        }

        writer
            .write_all(out.as_bytes())
            .map_err(ParserError::from)?;
        Ok(())
    }

    /// Returns the ASCII AIGER representation of the AIG, see [`Aig::write_ascii`].
    ///
    /// ```rust
    /// use aigopt::{Aig, Literal};
    /// let mut aig = Aig::new();
    /// let a = Literal::new(aig.add_input(), false);
    /// let b = Literal::new(aig.add_input(), false);
    /// let g = aig.add_and(a, b).unwrap();
    /// aig.add_output(!g).unwrap();
    /// assert_eq!(aig.to_ascii().unwrap(), "aag 3 2 0 1 1\n2\n4\n7\n6 4 2\n");
    /// ```
    pub fn to_ascii(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_ascii(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
