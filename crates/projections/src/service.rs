//! Entry point for order listings.

use store::{OrderQueryRepository, OrderSearch, Store, StoreTx};

use crate::Result;
use crate::strategy::QueryStrategy;
use crate::views::{OrderSummaryView, OrderView};

/// Service running order listings against a store.
///
/// Each call runs in its own transaction, so a listing sees one consistent
/// snapshot whatever strategy is used.
pub struct OrderQueryService<S: Store> {
    store: S,
}

impl<S: Store> OrderQueryService<S> {
    /// Creates a new query service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists orders with their items using `strategy`.
    ///
    /// The logged `queries` field is the change in the store's shared
    /// counter, so statements from overlapping calls on the same store are
    /// included in it.
    #[tracing::instrument(skip(self, strategy), fields(strategy = %strategy))]
    pub async fn find_orders(
        &self,
        strategy: QueryStrategy,
        search: &OrderSearch,
    ) -> Result<Vec<OrderView>> {
        let before = self.store.queries().count();

        let mut tx = self.store.begin().await?;
        let views = strategy.fetch(&mut tx, search).await?;
        tx.commit().await?;

        let queries = self.store.queries().count().saturating_sub(before);
        metrics::counter!("order_views_built_total", "strategy" => strategy.as_str())
            .increment(views.len() as u64);
        tracing::debug!(orders = views.len(), queries, "order views built");

        Ok(views)
    }

    /// Lists orders without items in a single statement.
    #[tracing::instrument(skip(self))]
    pub async fn find_order_summaries(&self, search: &OrderSearch) -> Result<Vec<OrderSummaryView>> {
        let mut tx = self.store.begin().await?;
        let rows = tx.find_order_headers(search).await?;
        tx.commit().await?;

        tracing::debug!(orders = rows.len(), "order summaries built");
        Ok(rows.into_iter().map(OrderSummaryView::from).collect())
    }
}
