//! Catalogue items and their service.

mod entity;
pub(crate) mod service;

pub use entity::{Item, UpdateItem};
pub use service::ItemService;

use common::ItemId;
use thiserror::Error;

/// Errors raised by item invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    /// Removing stock would take the quantity below zero.
    #[error("Not enough stock for item {item_id}: requested {requested}, available {available}")]
    NotEnoughStock {
        item_id: ItemId,
        requested: u32,
        available: u32,
    },

    /// Adding stock would overflow the quantity.
    #[error("Stock overflow for item {item_id}")]
    StockOverflow { item_id: ItemId },

    /// Item names must not be blank.
    #[error("Item name must not be empty")]
    EmptyName,

    /// Prices cannot be negative.
    #[error("Invalid price: {price} (must not be negative)")]
    NegativePrice { price: i64 },
}
