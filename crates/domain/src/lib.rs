//! Domain layer for the bookshop.
//!
//! This crate provides:
//! - Entities with their invariants: [`Member`], [`Item`], [`Order`] with its
//!   [`OrderLine`]s and [`Delivery`]
//! - Explicit association loading through [`FetchPlan`]
//! - Transactional services: [`MemberService`], [`ItemService`], [`OrderService`]

pub mod error;
pub mod fetch;
pub mod item;
pub mod member;
pub mod order;

pub use error::{DomainError, Result};
pub use fetch::{FetchPlan, load_order, load_orders};
pub use item::{Item, ItemError, ItemService, UpdateItem};
pub use member::{JoinMember, Member, MemberError, MemberService};
pub use order::{
    Delivery, Order, OrderError, OrderLine, OrderService, PlaceOrder, PlaceOrderLine,
};
