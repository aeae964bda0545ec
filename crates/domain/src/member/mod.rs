//! Member aggregate and its service.

mod entity;
pub(crate) mod service;

pub use entity::{JoinMember, Member};
pub use service::MemberService;

use thiserror::Error;

/// Errors raised by member invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemberError {
    /// Member names must not be blank.
    #[error("Member name must not be empty")]
    EmptyName,

    /// Addresses need a city, street and zipcode.
    #[error("Member address must have city, street and zipcode")]
    IncompleteAddress,
}
