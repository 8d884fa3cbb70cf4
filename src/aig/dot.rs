//! You can also export AIGs to the Graphviz dot format using [`Aig::to_dot`].
//!
//! ```rust
//! use aigopt::Aig;
//! use aigopt::dot::GraphvizStyle;
//!
//! let aig = Aig::from_file("assets/circuits/half-adder.aag").unwrap();
//! println!("{}", aig.to_dot(GraphvizStyle::default()).unwrap());
//! ```
//!
//! You can then render the graphs using the DOT engine.

use std::{fmt::Display, ops::Add};

use crate::{Aig, AigNode, Literal, Result};

// Definining default global style.
const DEFAULT_RANKDIR: &str = "BT";

// Defining default style for nodes.
const DEFAULT_FALSE_NODE_FORMAT: &str = "[shape=point, label=\"GND\", width=1.5]";
const DEFAULT_INPUT_NODE_FORMAT: &str = "[shape=box]";
const DEFAULT_AND_NODE_FORMAT: &str = "[shape=circle]";
/// See https://stackoverflow.com/questions/50822798/how-to-use-graphviz-to-draw-a-node-pointed-by-an-arrow.
const DEFAULT_OUTPUT_NODE_FORMAT: &str = "[shape=none, height=.0, width=.0]";

// Defining default style for edges.
const DEFAULT_EDGE_ALL_FORMAT: &str = "[arrowsize=0.3]";
const DEFAULT_EDGE_COMPLEMENT_FORMAT: &str = "[headlabel=\"●\", labelangle=.0, labeldistance=1.5]";
const DEFAULT_EDGE_OUTPUT_FORMAT: &str = "[arrowhead=none]";

/// String containing the graphviz node style (you must manually include square brackets).
///
/// See [`GraphvizStyle`] for what kind of nodes can be described.
#[derive(Debug, Clone)]
pub struct GraphvizNodeStyle(pub String);

impl Display for GraphvizNodeStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// String containing the graphviz edge style (you must manually include square brackets).
///
/// See [`GraphvizStyle`] for what kind of edges can be described.
#[derive(Debug, Clone, Default)]
pub struct GraphvizEdgeStyle(pub String);

impl Display for GraphvizEdgeStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for GraphvizEdgeStyle {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        GraphvizEdgeStyle(format!("{}{}", self.0, rhs.0))
    }
}

/// Parameters for Graphviz rendering.
///
/// ### Global parameters
/// - `rankdir`
///
/// ### Nodes
/// The following nodes can be rendered using [`GraphvizNodeStyle`]:
/// - [`AigNode::False`]
/// - [`AigNode::Input`]
/// - [`AigNode::And`]
/// - output (by default, invisible node just to get an arrow).
///
/// ### Edges
/// Edge styles are additive. All edges implement the `edge_all` style. To that can be added:
/// - `edge_complement` if the edge is complemented
/// - `edge_output` if the edge is directed to an output.
#[derive(Debug, Clone)]
pub struct GraphvizStyle {
    // Global
    pub rankdir: String,

    // Nodes
    pub cst_false: GraphvizNodeStyle,
    pub input: GraphvizNodeStyle,
    pub and: GraphvizNodeStyle,
    pub output: GraphvizNodeStyle,

    // Edges
    pub edge_all: GraphvizEdgeStyle,
    pub edge_complement: GraphvizEdgeStyle,
    pub edge_output: GraphvizEdgeStyle,
}

impl Default for GraphvizStyle {
    fn default() -> Self {
        GraphvizStyle {
            rankdir: DEFAULT_RANKDIR.to_string(),

            cst_false: GraphvizNodeStyle(DEFAULT_FALSE_NODE_FORMAT.to_string()),
            input: GraphvizNodeStyle(DEFAULT_INPUT_NODE_FORMAT.to_string()),
            and: GraphvizNodeStyle(DEFAULT_AND_NODE_FORMAT.to_string()),
            output: GraphvizNodeStyle(DEFAULT_OUTPUT_NODE_FORMAT.to_string()),

            edge_all: GraphvizEdgeStyle(DEFAULT_EDGE_ALL_FORMAT.to_string()),
            edge_complement: GraphvizEdgeStyle(DEFAULT_EDGE_COMPLEMENT_FORMAT.to_string()),
            edge_output: GraphvizEdgeStyle(DEFAULT_EDGE_OUTPUT_FORMAT.to_string()),
        }
    }
}

/// An edge from the node of `from` to the graphviz node `to`.
fn edge_decl(from: Literal, to: &str, to_output: bool, graphviz_style: &GraphvizStyle) -> String {
    let mut style = GraphvizEdgeStyle::default();
    if from.is_inverted() {
        style = style + graphviz_style.edge_complement.clone();
    }
    if to_output {
        style = style + graphviz_style.edge_output.clone();
    }
    format!("{} -> {} {}\n", from.node_id(), to, style)
}

impl Aig {
    /// Returns a DOT representation of the logic reachable from the outputs.
    pub fn to_dot(&self, graphviz_style: GraphvizStyle) -> Result<String> {
        let mut decl_edges = String::new();

        // Creating different subgraphs for node declarations
        let mut decl_false_node_optional = "".to_string();
        let mut decl_inputs = format!("subgraph inputs {{\n node {}\n", graphviz_style.input);
        let mut decl_outputs = format!("subgraph outputs {{\n node {}\n", graphviz_style.output);
        let mut decl_ands = format!("subgraph ands {{\n node {}\n", graphviz_style.and);

        // Adding artificial outputs to point to, duplicated outputs get their own arrow
        for (i, &output) in self.outputs.iter().enumerate() {
            let output_id = format!("o{}", i);
            decl_outputs.push_str(&format!("{} [label=\"o{}\"]\n", output_id, i));
            decl_edges.push_str(&edge_decl(output, &output_id, true, &graphviz_style));
        }

        // Index of each input, for labels
        let mut input_index = vec![0; self.nodes.len()];
        for (i, &id) in self.inputs.iter().enumerate() {
            input_index[id as usize] = i;
        }

        // Fanins first, from outputs
        for id in self.get_topological_sort()? {
            match self.nodes[id as usize] {
                AigNode::False => decl_false_node_optional
                    .push_str(&format!("{} {}\n", id, graphviz_style.cst_false)),
                AigNode::Input => decl_inputs.push_str(&format!(
                    "{} [label=\"i{}\"]\n",
                    id, input_index[id as usize]
                )),
                AigNode::And { fanin0, fanin1 } => {
                    decl_ands.push_str(&format!("{} [label=\"\"]\n", id));
                    let to = id.to_string();
                    decl_edges.push_str(&edge_decl(fanin0, &to, false, &graphviz_style));
                    decl_edges.push_str(&edge_decl(fanin1, &to, false, &graphviz_style));
                }
            }
        }

        // Concatenating everything together
        Ok(format!(
            "
strict digraph {{
    rankdir=\"{}\"
    edge {}
    {}
    {}
    }}
    {}
    }}
    {}
    }}
    {}
}}",
            graphviz_style.rankdir,
            graphviz_style.edge_all,
            decl_false_node_optional,
            decl_inputs,
            decl_ands,
            decl_outputs,
            decl_edges
        ))
    }
}
