//! Read-only order listings.
//!
//! This crate builds the order list views from the store:
//! - [`OrderView`] / [`OrderItemView`] with the wire field names the listing
//!   contract fixes, and [`OrderSummaryView`] without items
//! - [`QueryStrategy`], four interchangeable ways to fetch the same views,
//!   trading query count against transferred rows
//! - [`OrderViewAssembler`], the stable group-by that folds flat join rows
//!   back into one view per order
//! - [`OrderQueryService`], which runs a strategy in a read transaction

pub mod assembler;
pub mod error;
pub mod service;
pub mod strategy;
pub mod views;

pub use assembler::OrderViewAssembler;
pub use error::{ProjectionError, Result};
pub use service::OrderQueryService;
pub use strategy::QueryStrategy;
pub use views::{OrderItemView, OrderSummaryView, OrderView};
