// src/error.rs
use thiserror::Error;

/// Declaration-time errors. Scan-time "no match" and end-of-input are ordinary
/// tokens (negative / zero ids), never errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// Malformed pattern text, reported from `add_token` and never deferred
    /// to scan time.
    #[error("invalid pattern {pattern:?} at position {pos}: {msg}")]
    InvalidPattern {
        pattern: String,
        pos: usize,
        msg: String,
    },

    #[error("token name {0:?} is already declared")]
    DuplicateName(String),

    #[error("unknown token name {0:?}")]
    UnknownTokenName(String),

    /// The registry's id counter is exhausted; ids count down from `MAX_ID`
    /// and must stay above the raw-byte range.
    #[error("token capacity exceeded ({max} declarable token types)")]
    CapacityExceeded { max: usize },
}
