//! Error type for the profiling library
//!
//! The taxonomy is deliberately small: invalid ignore patterns, isolated
//! subscriber failures, malformed trace input, and report output I/O.
//! Unresolvable report rows are skipped, not errored (see `report`).

use thiserror::Error;

/// Errors surfaced by the profiling library
#[derive(Debug, Error)]
pub enum ProfileError {
    /// A line-ignore pattern failed to compile as a regular expression
    #[error("invalid line-ignore pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A hook subscriber reported a failure during dispatch
    #[error("hook subscriber failed: {0}")]
    Subscriber(String),

    /// A recorded trace line could not be decoded
    #[error("malformed trace event at {origin}:{line}: {message}")]
    MalformedTrace {
        origin: String,
        line: usize,
        message: String,
    },

    /// Reading trace input or writing the report artifact failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
