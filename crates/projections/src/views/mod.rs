//! Listing views returned to callers.
//!
//! Field names are part of the listing contract and are fixed with serde
//! renames.

mod order;
mod summary;

pub use order::{OrderItemView, OrderView};
pub use summary::OrderSummaryView;
