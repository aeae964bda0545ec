//! Order aggregate, its owned delivery and lines, and the order service.

mod aggregate;
mod commands;
mod delivery;
mod line;
mod service;

pub use aggregate::Order;
pub use commands::{PlaceOrder, PlaceOrderLine};
pub use delivery::Delivery;
pub use line::OrderLine;
pub use service::OrderService;

use thiserror::Error;

use crate::item::ItemError;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// An order needs at least one line.
    #[error("Order has no lines")]
    NoLines,

    /// Invalid quantity.
    #[error("Invalid count: {count} (must be greater than 0)")]
    InvalidCount { count: u32 },

    /// The order was cancelled before.
    #[error("Order is already cancelled")]
    AlreadyCancelled,

    /// The delivery has completed, so the order can no longer be cancelled.
    #[error("Order has already been delivered")]
    AlreadyDelivered,

    /// An operation needed an association the fetch plan left out.
    #[error("Association not loaded: {association}")]
    NotLoaded { association: &'static str },

    /// Taking or returning stock for a line failed.
    #[error(transparent)]
    Stock(#[from] ItemError),
}
