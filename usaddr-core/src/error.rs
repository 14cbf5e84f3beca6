//! Error taxonomy of the parsing pipeline.
//!
//! Tokenization and feature generation are total; every failure comes from
//! the tagging step and ends the request. No partial results are returned.

use std::collections::TryReserveError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Empty or inconsistent token sequence reached the tagging adapter.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// No tagging engine is loaded, or it could not be opened.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
    /// The engine reported a decode error.
    #[error("tagging failed: {0}")]
    TaggingFailed(String),
    /// Buffers for the current request could not be allocated.
    #[error("allocation failure: {0}")]
    AllocationFailure(#[from] TryReserveError),
}

/// Errors reported by a tagging engine implementation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cannot read model {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed model: {0}")]
    Malformed(String),
    #[error("decode failed: {0}")]
    Decode(String),
}
