use thiserror::Error;

use crate::Literal;

/// The result of an AIG operation.
pub type Result<T> = std::result::Result<T, AigError>;

/// Error returned when an AIG operation failed.
#[derive(Debug, Error)]
pub enum AigError {
    /// The literal refers to a node which does not exist (yet).
    /// Always a bug of the caller (or of the circuit file).
    #[error("literal {literal} refers to node {} but the AIG only has {node_count} nodes", .literal.node_id())]
    InvalidReference { literal: Literal, node_count: usize },

    /// The AIG has reached an invalid state. This should never happen.
    /// For example, the canonicalization reached an input which was not registered as such.
    #[error("the AIG has reached an invalid state - this should not happen - error: {0}")]
    InvalidState(String),

    /// Simulation was given a number of input patterns which does not match the inputs.
    #[error("expected {expected} input patterns, got {got}")]
    InputCountMismatch { expected: usize, got: usize },

    /// Exhaustive simulation is limited to small circuits.
    #[error("exhaustive simulation supports at most 16 inputs, the AIG has {0}")]
    TooManyInputs(usize),

    /// Just forwarding a [`ParserError`].
    #[error("{0}")]
    ParserError(#[from] ParserError),
}

/// Error returned when parsing from file failed.
///
/// It is defined here because the `parser` module is private.
#[derive(Debug, Error)]
pub enum ParserError {
    /// All features are not supported (only the ASCII format in fact).
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// Invalid token, something else was expected.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// An IO error occured (file doesn't exist, can't be read, ...).
    #[error("io error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for ParserError {
    fn from(value: std::io::Error) -> Self {
        ParserError::IoError(value.to_string())
    }
}
