//! Interchangeable ways of fetching order views.
//!
//! Every strategy returns the same views for the same data. They differ in
//! how many statements they issue for `N` listed orders with `M_i` lines:
//!
//! | Strategy | Statements |
//! |---|---|
//! | [`QueryStrategy::EntityGraph`] | `1 + 3N + ΣM_i` |
//! | [`QueryStrategy::PerOrderCollection`] | `1 + N` |
//! | [`QueryStrategy::Batched`] | `2` |
//! | [`QueryStrategy::Flat`] | `1` |

mod batched;
mod entity_graph;
mod flat;
mod per_order;

use std::fmt;
use std::str::FromStr;

use store::{ItemRepository, MemberRepository, OrderQueryRepository, OrderRepository, OrderSearch};

use crate::Result;
use crate::views::OrderView;

/// How order views are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryStrategy {
    /// Loads order entities through the full fetch plan, one statement per
    /// association. Only for small result sets.
    EntityGraph,

    /// One statement for the orders with member and delivery joined, then one
    /// item statement per order.
    PerOrderCollection,

    /// One statement for the orders, one IN-list statement for all their
    /// items, joined in memory.
    Batched,

    /// One outer-joined statement, regrouped in memory. Paging happens after
    /// regrouping.
    Flat,
}

impl QueryStrategy {
    pub const ALL: [QueryStrategy; 4] = [
        QueryStrategy::EntityGraph,
        QueryStrategy::PerOrderCollection,
        QueryStrategy::Batched,
        QueryStrategy::Flat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStrategy::EntityGraph => "entity_graph",
            QueryStrategy::PerOrderCollection => "per_order_collection",
            QueryStrategy::Batched => "batched",
            QueryStrategy::Flat => "flat",
        }
    }

    /// Fetches the views for `search` inside an open transaction.
    pub async fn fetch<T>(&self, tx: &mut T, search: &OrderSearch) -> Result<Vec<OrderView>>
    where
        T: MemberRepository + ItemRepository + OrderRepository + OrderQueryRepository + ?Sized,
    {
        match self {
            QueryStrategy::EntityGraph => entity_graph::fetch(tx, search).await,
            QueryStrategy::PerOrderCollection => per_order::fetch(tx, search).await,
            QueryStrategy::Batched => batched::fetch(tx, search).await,
            QueryStrategy::Flat => flat::fetch(tx, search).await,
        }
    }
}

impl fmt::Display for QueryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown strategy name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStrategy(pub String);

impl fmt::Display for UnknownStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown query strategy: {}", self.0)
    }
}

impl std::error::Error for UnknownStrategy {}

impl FromStr for QueryStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        QueryStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}
