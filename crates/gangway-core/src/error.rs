//! Error taxonomy for bridge calls
//!
//! Every failure mode here is recoverable: the dispatcher catches these at
//! the message boundary, emits a diagnostic, and answers with an empty (or
//! null) reply. Nothing in the bridge core aborts the process.

use thiserror::Error;

/// Result type for bridge call paths
pub type CallResult<T> = Result<T, CallError>;

/// Errors raised while servicing a single inbound call
#[derive(Debug, Clone, Error)]
pub enum CallError {
    /// Unknown member, unknown instance, or member-kind mismatch
    #[error("unsupported capability: {0}")]
    Unsupported(String),

    /// Argument count or shape does not match the declared parameters
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A native value could not be encoded into wire form
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl CallError {
    /// Shorthand for an unknown-member failure
    pub fn unknown_member(name: &str) -> Self {
        CallError::Unsupported(format!("no such member: {name}"))
    }

    /// Shorthand for a receiver type mismatch
    pub fn bad_receiver(name: &str) -> Self {
        CallError::Unsupported(format!("receiver does not implement: {name}"))
    }
}
