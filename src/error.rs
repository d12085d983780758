use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

/// Result type local to blossom-forest.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures reading a graph. Edge numbers in messages are 1-based.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected end of input: missing {what}")]
    MissingToken { what: String },

    #[error("invalid {what} '{token}': {source}")]
    InvalidInteger {
        what: &'static str,
        token: String,
        source: ParseIntError,
    },

    #[error("edge {edge}: invalid weight '{token}': {source}")]
    InvalidWeight {
        edge: usize,
        token: String,
        source: ParseFloatError,
    },

    #[error("edge {edge}: weight {weight} is not finite")]
    NonFiniteWeight { edge: usize, weight: f64 },

    #[error("edge {edge}: vertex {vertex} outside 1..={count}")]
    VertexOutOfRange { edge: usize, vertex: usize, count: usize },

    #[error("edge {edge}: self-loop on vertex {vertex}")]
    SelfLoop { edge: usize, vertex: usize },
}
