//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations inside the mining algorithm itself.
/// They are independent of files, configuration sources and the CLI.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("malformed tagged sequence {input:?}: {reason}")]
    MalformedSequence { input: String, reason: String },

    #[error("invalid mining policy: {0}")]
    InvalidPolicy(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
