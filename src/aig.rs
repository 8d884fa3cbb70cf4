//! Module defining the [`Aig`] struct, as well as [`AigNode`], [`Literal`] and some others relevant structs.
//!
//! To simplify a circuit, check [`Aig::optimize`] and [`Aig::rewrite`].

mod canonicalize;
pub mod dot;
pub mod error;
mod integrity;
pub mod literal;
pub mod node;
mod parser;
mod simulate;
pub mod strash;
mod writer;

pub use error::{AigError, ParserError, Result};
pub use literal::Literal;
pub use node::{AigNode, FaninId, NodeId};
use strash::{Strash, simplify_and};

/// A whole AIG: a node store, the ordered inputs and the ordered outputs.
///
/// Nodes are append-only and addressed by their index (their [`NodeId`]). Node 0 is always
/// the constant [`AigNode::False`]. The only way to create and gates is [`Aig::add_and`],
/// which simplifies trivial gates away and hash-conses the others, so that at most one gate
/// exists for a given unordered pair of fanins.
///
/// The store is kept in topological order: the fanins of a gate always have a smaller id
/// than the gate itself.
///
/// ```rust
/// use aigopt::{Aig, Literal};
/// let mut aig = Aig::new();
/// let a = Literal::new(aig.add_input(), false);
/// let b = Literal::new(aig.add_input(), false);
/// let ab = aig.add_and(a, b).unwrap();
/// assert_eq!(aig.add_and(b, a).unwrap(), ab); // same gate
/// assert_eq!(aig.add_and(a, !a).unwrap(), Literal::FALSE); // no gate at all
/// aig.add_output(!ab).unwrap();
/// assert_eq!(aig.gate_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aig {
    nodes: Vec<AigNode>,
    inputs: Vec<NodeId>,
    outputs: Vec<Literal>,
    /// Must always be reset together with the node store.
    strash: Strash,
}

impl Default for Aig {
    fn default() -> Self {
        Self::new()
    }
}

impl Aig {
    /// Create a brand new AIG (constant node [`AigNode::False`] included).
    pub fn new() -> Self {
        Aig {
            nodes: vec![AigNode::False],
            inputs: Vec::new(),
            outputs: Vec::new(),
            strash: Strash::default(),
        }
    }

    /// Retrieves a node from its id.
    pub fn get_node(&self, id: NodeId) -> Option<&AigNode> {
        self.nodes.get(id as usize)
    }

    /// The whole node store, indexed by id.
    pub fn nodes(&self) -> &[AigNode] {
        &self.nodes
    }

    /// Number of nodes, constant node and inputs included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Retrieves inputs id, in order.
    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Retrieves outputs, in order.
    pub fn outputs(&self) -> &[Literal] {
        &self.outputs
    }

    /// Returns the fanins of the gate pointed by `lit`.
    ///
    /// Returns [`None`] if `lit` is inverted or if it does not point at an and gate:
    /// only then the fanins describe the function of the literal itself.
    pub fn fanins(&self, lit: Literal) -> Option<(Literal, Literal)> {
        if lit.is_inverted() {
            return None;
        }
        self.nodes.get(lit.index())?.get_fanins()
    }

    fn check_literal(&self, literal: Literal) -> Result<()> {
        if literal.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(AigError::InvalidReference {
                literal,
                node_count: self.nodes.len(),
            })
        }
    }

    /// Create a new primary input and return its id.
    pub fn add_input(&mut self) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(AigNode::Input);
        self.inputs.push(id);
        id
    }

    /// Returns the literal [`Aig::add_and`] would return, if it can be computed without
    /// creating a new gate (either an algebraic identity applies or the gate already exists).
    pub fn find_and(&self, lit0: Literal, lit1: Literal) -> Option<Literal> {
        simplify_and(lit0, lit1).or_else(|| self.strash.get(lit0, lit1))
    }

    /// Create a new and gate (or retrieve it if a gate with the same fanins already exists).
    ///
    /// Trivial gates are never created: `x & 0`, `1 & x`, `x & 1`, `x & x` and `x & !x`
    /// directly return the simplified literal.
    ///
    /// This will fail if a fanin refers to a node which does not exist.
    pub fn add_and(&mut self, lit0: Literal, lit1: Literal) -> Result<Literal> {
        if let Some(lit) = self.find_and(lit0, lit1) {
            return Ok(lit);
        }

        self.check_literal(lit0)?;
        self.check_literal(lit1)?;

        let (lit0, lit1) = strash::normalize(lit0, lit1);
        let lit = Literal::new(self.nodes.len() as NodeId, false);
        self.nodes.push(AigNode::and(lit0, lit1));
        self.strash.insert(lit0, lit1, lit);
        Ok(lit)
    }

    /// Mark an existing literal as an output. The same literal can be an output several times.
    pub fn add_output(&mut self, lit: Literal) -> Result<()> {
        self.check_literal(lit)?;
        self.outputs.push(lit);
        Ok(())
    }

    /// Number of and gates.
    pub fn gate_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_and()).count()
    }

    /// For each node, the number of gate fanins and outputs referring to it (whatever the polarity).
    pub fn reference_counts(&self) -> Vec<u32> {
        let mut refs = vec![0; self.nodes.len()];
        for node in &self.nodes {
            if let Some((fanin0, fanin1)) = node.get_fanins() {
                refs[fanin0.index()] += 1;
                refs[fanin1.index()] += 1;
            }
        }
        for output in &self.outputs {
            refs[output.index()] += 1;
        }
        refs
    }

    /// Replace the given fanin of a gate by a new literal, bypassing structural hashing.
    ///
    /// The AIG is not canonical anymore after this: it must be followed by [`Aig::optimize`].
    pub(crate) fn replace_fanin(&mut self, parent_id: NodeId, fanin_id: FaninId, lit: Literal) {
        self.nodes[parent_id as usize].set_fanin(fanin_id, lit);
    }

    /// Replace the output at `index` by a new literal.
    pub(crate) fn replace_output(&mut self, index: usize, lit: Literal) {
        self.outputs[index] = lit;
    }

    fn topological_visit(
        &self,
        root: NodeId,
        sort: &mut Vec<NodeId>,
        marks: &mut [Mark],
    ) -> Result<()> {
        let mut stack: Vec<(NodeId, bool)> = vec![(root, false)];

        while let Some((id, last_time)) = stack.pop() {
            // Post order check
            if last_time {
                marks[id as usize] = Mark::Done;
                sort.push(id);
                continue;
            }

            match marks[id as usize] {
                Mark::Done => continue,
                Mark::Open => return Err(AigError::InvalidState("found a cycle".to_string())),
                Mark::Unseen => (),
            }

            marks[id as usize] = Mark::Open;
            stack.push((id, true));

            // Pushing fanin1 first so that fanin0 gets visited first
            if let Some((fanin0, fanin1)) = self.nodes[id as usize].get_fanins() {
                for fanin in [fanin1, fanin0] {
                    if marks[fanin.index()] != Mark::Done {
                        stack.push((fanin.node_id(), false));
                    }
                }
            }
        }

        Ok(())
    }

    /// Returns the nodes reachable from the outputs, fanins first, will error if a cycle is detected.
    ///
    /// The order is the post order of a depth-first search started from each output in turn,
    /// visiting `fanin0` before `fanin1`. It does not rely on the ids being topologically sorted.
    pub fn get_topological_sort(&self) -> Result<Vec<NodeId>> {
        let mut sort = Vec::new();
        let mut marks = vec![Mark::Unseen; self.nodes.len()];
        for output in &self.outputs {
            self.topological_visit(output.node_id(), &mut sort, &mut marks)?;
        }
        Ok(sort)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unseen,
    Open,
    Done,
}
