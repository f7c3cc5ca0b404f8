//! Framework error type.
//!
//! Runtime operations (ticking, spawning, drawing) never fail; anomalies are
//! absorbed as no-ops.  `FlowError` covers the few value parsers in this
//! crate; sub-crates define their own error enums for their boundaries.

use thiserror::Error;

/// Errors raised by `flow-core` value parsers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `flow-core` parsers.
pub type FlowResult<T> = Result<T, FlowError>;
