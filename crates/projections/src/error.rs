//! Projection error types.

use domain::DomainError;
use store::StoreError;
use thiserror::Error;

/// Errors that can occur while building order views.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// An error occurred in the store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Loading or reading the order entities failed.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl From<domain::OrderError> for ProjectionError {
    fn from(e: domain::OrderError) -> Self {
        ProjectionError::Domain(e.into())
    }
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
