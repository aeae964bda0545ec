//! Relational persistence for the bookshop.
//!
//! The store is reached through transactions: [`Store::begin`] hands out a
//! [`StoreTx`] that implements every repository trait, and nothing it does is
//! visible to other transactions until [`StoreTx::commit`]. Two backends are
//! provided: [`InMemoryStore`] for tests and [`PostgresStore`] for real use.
//!
//! Every statement a transaction issues is recorded on the store's
//! [`QueryCounter`], which is how callers verify the query cost of a fetch
//! strategy.

pub mod config;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod record;
pub mod stats;
pub mod store;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use query::OrderSearch;
pub use record::{
    DeliveryRecord, FlatItemColumns, ItemRecord, MemberRecord, NewDelivery, NewItem, NewMember,
    NewOrder, NewOrderLine, OrderFlatRow, OrderHeaderRow, OrderItemRow, OrderLineRecord,
    OrderRecord,
};
pub use stats::QueryCounter;
pub use store::{
    ItemRepository, MemberRepository, OrderQueryRepository, OrderRepository, Store, StoreTx,
};
