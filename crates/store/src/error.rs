use std::num::TryFromIntError;

use common::ParseStatusError;
use thiserror::Error;

/// Errors that can occur when interacting with the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected an insert or update.
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A foreign key pointed at a row that does not exist.
    #[error("Foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    /// A check constraint rejected a column value.
    #[error("Check constraint violated: {constraint}")]
    CheckViolation { constraint: String },

    /// An update targeted a row that does not exist.
    #[error("{entity} not found: {id}")]
    RowNotFound { entity: &'static str, id: i64 },

    /// A stored integer did not fit the domain type.
    #[error("Conversion error: {0}")]
    Conversion(#[from] TryFromIntError),

    /// A stored status column held an unknown value.
    #[error("Decode error: {0}")]
    Decode(#[from] ParseStatusError),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    /// Maps constraint violations reported by the database to their own
    /// variants, leaving every other error as [`StoreError::Database`].
    pub(crate) fn from_write(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = error {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation { constraint };
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation { constraint };
            }
            if db_err.is_check_violation() {
                return StoreError::CheckViolation { constraint };
            }
        }
        StoreError::Database(error)
    }

    /// Returns true if this error is a unique constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation { .. })
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
