use thiserror::Error;

/// Errors surfaced by the domain services.
///
/// `Validation` covers malformed input, `NotFound` unknown ids, and
/// `Integrity` operations that contradict the current state of a resource.
/// `Storage` wraps whatever the persistence layer reports; its details stay
/// out of client-facing messages.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Integrity(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        DomainError::NotFound(message.into())
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        DomainError::Integrity(message.into())
    }
}
