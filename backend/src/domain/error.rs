use thiserror::Error;

/// Errors produced by domain services
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
