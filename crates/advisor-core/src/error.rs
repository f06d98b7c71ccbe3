//! # Error Types
//!
//! The rule engine has exactly one failure mode: the caller handed it
//! something it cannot evaluate. Adapters map [`AdvisorError::InvalidInput`]
//! to a client error and never retry it.

use thiserror::Error;

/// Top-level error type for the rule engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdvisorError {
    /// Unknown deal source, unknown region, negative or malformed amount,
    /// malformed date, or an out-of-range calendar setting.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl AdvisorError {
    /// Shorthand for building an [`AdvisorError::InvalidInput`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
