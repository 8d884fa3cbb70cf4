//! And-Inverter Graphs with structural hashing, canonicalization and local rewriting.
//!
//! ```rust
//! use aigopt::{Aig, RewriteConfig, RewriteStrategy};
//!
//! let mut aig = Aig::from_file("assets/circuits/redundant.aag").unwrap();
//! println!("{}", aig.metrics());
//! aig.rewrite_with(&RewriteConfig::default().with_strategy(RewriteStrategy::CostGated))
//!     .unwrap();
//! println!("{}", aig.metrics());
//! ```

pub mod aig;
pub mod metrics;
pub mod rewrite;

// Re-exporting symbols and modules.
pub use aig::dot;
pub use aig::{Aig, AigError, AigNode, FaninId, Literal, NodeId, ParserError, Result};
pub use metrics::Metrics;
pub use rewrite::{RewriteConfig, RewriteStrategy};
