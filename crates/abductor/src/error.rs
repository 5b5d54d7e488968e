//! Error types for abductor
//!
//! Graph construction does not use these: an axiom that fails to apply is
//! reported as `None`, and a bad handle is a caller bug that panics. The
//! variants below cover loading, parsing and the inference pipeline.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AbductorError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid axiom '{name}': {reason}")]
    InvalidAxiom { name: String, reason: String },

    #[error("Invalid predicate '{0}'")]
    InvalidPredicate(String),

    #[error("Cannot infer, because of lack of {0}")]
    MissingComponent(&'static str),

    #[error("Timed out during {0}")]
    Timeout(&'static str),
}

pub type Result<T> = std::result::Result<T, AbductorError>;
