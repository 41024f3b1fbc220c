//! Error kinds for the grammar pipeline (see the error handling table: I/O
//! failures, packed-vector width overflow, suffix-sort invariant violations,
//! out-of-memory recovery, unsupported container versions, and CLI misuse).
//!
//! Every fallible operation in this crate returns `Result<_, GramError>` (or
//! wraps one behind `anyhow::Error` at the CLI boundary). No error is ever
//! discarded: out-of-memory is the only kind that is recovered from locally
//! (by spilling), everything else is fatal and propagates to the caller.

use std::fmt;
use std::io;

/// Errors produced while building, serializing, or walking a grammar.
#[derive(Debug)]
pub enum GramError {
    /// A read, write, or remove call on a file or temporary directory failed.
    Io(io::Error),
    /// A packed integer vector append exceeded its configured bit width.
    WidthOverflow { width: u32, value: u64 },
    /// The suffix-induced sort or rank assignment found a violated invariant
    /// (a terminator compared equal to an internal symbol, or a phrase left
    /// without an assigned rank).
    SortInconsistency(String),
    /// The container's leading compression-level byte is not `1` or `2`.
    UnsupportedVersion(u8),
    /// Bad CLI usage; the message is shown to the user verbatim.
    InvalidCli(String),
}

impl fmt::Display for GramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GramError::Io(e) => write!(f, "I/O failure: {e}"),
            GramError::WidthOverflow { width, value } => {
                write!(f, "packed vector width overflow: {value} does not fit in {width} bits")
            }
            GramError::SortInconsistency(msg) => write!(f, "sort invariant violation: {msg}"),
            GramError::UnsupportedVersion(v) => {
                write!(f, "unsupported container compression level: {v}")
            }
            GramError::InvalidCli(msg) => write!(f, "bad usage: {msg}"),
        }
    }
}

impl std::error::Error for GramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GramError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for GramError {
    fn from(e: io::Error) -> Self {
        GramError::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, GramError>;
