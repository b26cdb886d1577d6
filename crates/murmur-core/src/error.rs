//! Domain-level error types.

use thiserror::Error;

/// Domain errors - expected, recoverable outcomes returned to the caller
/// for user-facing messaging. Anything else is an internal fault.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Bad credentials")]
    BadCredentials,

    #[error("Post body must not be empty")]
    EmptyBody,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Fallback conversion for repository faults the caller does not handle
/// specifically. Constraint violations are mapped at the call site, where
/// the violated invariant is known.
impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        DomainError::Internal(err.to_string())
    }
}
