use crate::{Aig, AigError, AigNode, Literal, Result};

/// Above this, exhaustive simulation gets too big to be useful.
const MAX_EXHAUSTIVE_INPUTS: usize = 16;

/// Value of `lit` given the values of the nodes.
fn value(values: &[u64], lit: Literal) -> u64 {
    if lit.is_inverted() {
        !values[lit.index()]
    } else {
        values[lit.index()]
    }
}

/// The 64 patterns of input `k` (among the first 6) in an exhaustive enumeration.
const BASE_PATTERNS: [u64; 6] = [
    0xaaaa_aaaa_aaaa_aaaa,
    0xcccc_cccc_cccc_cccc,
    0xf0f0_f0f0_f0f0_f0f0,
    0xff00_ff00_ff00_ff00,
    0xffff_0000_ffff_0000,
    0xffff_ffff_0000_0000,
];

impl Aig {
    /// Bit-parallel simulation: evaluates 64 input assignments at once.
    ///
    /// `patterns[k]` holds the 64 values of the `k`-th input. Returns the 64 values of each output.
    pub fn simulate(&self, patterns: &[u64]) -> Result<Vec<u64>> {
        if patterns.len() != self.inputs.len() {
            return Err(AigError::InputCountMismatch {
                expected: self.inputs.len(),
                got: patterns.len(),
            });
        }

        let mut values = vec![0u64; self.nodes.len()];
        for (&id, &pattern) in self.inputs.iter().zip(patterns) {
            values[id as usize] = pattern;
        }
        for id in self.get_topological_sort()? {
            if let AigNode::And { fanin0, fanin1 } = self.nodes[id as usize] {
                values[id as usize] = value(&values, fanin0) & value(&values, fanin1);
            }
        }

        Ok(self
            .outputs
            .iter()
            .map(|&output| value(&values, output))
            .collect())
    }

    /// Evaluates the outputs for a single assignment of the inputs.
    ///
    /// ```rust
    /// use aigopt::{Aig, Literal};
    /// let mut aig = Aig::new();
    /// let a = Literal::new(aig.add_input(), false);
    /// let b = Literal::new(aig.add_input(), false);
    /// let nand = !aig.add_and(a, b).unwrap();
    /// aig.add_output(nand).unwrap();
    /// assert_eq!(aig.evaluate(&[true, true]).unwrap(), vec![false]);
    /// assert_eq!(aig.evaluate(&[true, false]).unwrap(), vec![true]);
    /// ```
    pub fn evaluate(&self, assignment: &[bool]) -> Result<Vec<bool>> {
        let patterns: Vec<u64> = assignment.iter().map(|&b| b as u64).collect();
        Ok(self
            .simulate(&patterns)?
            .into_iter()
            .map(|word| word & 1 == 1)
            .collect())
    }

    /// Truth tables of all the outputs, by exhaustive simulation.
    ///
    /// Bit `j` of the table is the value of the output for the assignment where input `k`
    /// takes bit `k` of `j`. Each table holds `max(1, 2^inputs / 64)` words (bits beyond
    /// `2^inputs` are zero). Two AIGs with the same number of inputs compute
    /// the same functions iff their truth tables are equal.
    pub fn truth_tables(&self) -> Result<Vec<Vec<u64>>> {
        let n = self.inputs.len();
        if n > MAX_EXHAUSTIVE_INPUTS {
            return Err(AigError::TooManyInputs(n));
        }

        let words = if n <= 6 { 1 } else { 1 << (n - 6) };
        let mut tables = vec![Vec::with_capacity(words); self.outputs.len()];
        for word in 0..words {
            let patterns: Vec<u64> = (0..n)
                .map(|k| {
                    if k < 6 {
                        BASE_PATTERNS[k]
                    } else if (word >> (k - 6)) & 1 == 1 {
                        u64::MAX
                    } else {
                        0
                    }
                })
                .collect();
            for (table, output) in tables.iter_mut().zip(self.simulate(&patterns)?) {
                table.push(output);
            }
        }

        // Only the first 2^n bits are meaningful
        if n < 6 {
            let mask = (1u64 << (1 << n)) - 1;
            for table in &mut tables {
                table[0] &= mask;
            }
        }

        Ok(tables)
    }
}
