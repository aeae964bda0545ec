//! Domain error types.

use store::StoreError;
use thiserror::Error;

use crate::item::ItemError;
use crate::member::MemberError;
use crate::order::OrderError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Lookup by id found nothing.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// A member with this name already exists.
    #[error("Member already exists: {name}")]
    DuplicateMember { name: String },

    #[error("Member error: {0}")]
    Member(#[from] MemberError),

    #[error("Item error: {0}")]
    Item(#[from] ItemError),

    /// An error occurred in the order aggregate.
    #[error("Order error: {0}")]
    Order(OrderError),
}

impl DomainError {
    /// Reports a unique violation on the member name as a duplicate member.
    pub(crate) fn duplicate_or_store(error: StoreError, name: &str) -> Self {
        if error.is_unique_violation() {
            return DomainError::DuplicateMember {
                name: name.to_string(),
            };
        }
        DomainError::Store(error)
    }
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
