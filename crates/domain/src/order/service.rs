//! Order service providing placing, cancelling and loading of orders.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use common::{ItemId, OrderId, OrderStatus};
use store::{ItemRepository, OrderRepository, OrderSearch, Store, StoreTx};

use crate::error::{DomainError, Result};
use crate::fetch::{FetchPlan, load_order, load_orders};
use crate::item::{Item, service::load_item};
use crate::member::service::load_member;

use super::{Delivery, Order, OrderError, OrderLine, PlaceOrder};

/// Service for placing and cancelling orders.
///
/// Every call runs in its own transaction; on any error the transaction is
/// dropped and nothing it wrote, stock changes included, is kept.
pub struct OrderService<S: Store> {
    store: S,
}

impl<S: Store> OrderService<S> {
    /// Creates a new order service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Places an order and returns its id.
    ///
    /// Each line is priced at the item's current price and its count is
    /// taken out of stock. The delivery ships to the member's address.
    #[tracing::instrument(skip(self, cmd), fields(member_id = %cmd.member_id, lines = cmd.lines.len()))]
    pub async fn order(&self, cmd: PlaceOrder) -> Result<OrderId> {
        if cmd.lines.is_empty() {
            return Err(OrderError::NoLines.into());
        }

        let mut tx = self.store.begin().await?;
        let member = load_member(&mut tx, cmd.member_id).await?;

        let mut items: BTreeMap<ItemId, Item> = BTreeMap::new();
        let mut lines = Vec::with_capacity(cmd.lines.len());
        for requested in &cmd.lines {
            let item = cached_item(&mut tx, &mut items, requested.item_id).await?;
            let price = item.price();
            lines.push(OrderLine::create(item, price, requested.count)?);
        }

        let delivery = Delivery::ready(member.address().clone());
        let order = Order::create(&member, delivery, lines)?;

        let order_id = tx.insert_order(&order.to_new_order()?).await?;
        for item in items.values() {
            tx.update_item_stock(item.id(), item.stock_quantity())
                .await?;
        }
        tx.commit().await?;

        metrics::counter!("orders_placed_total").increment(1);
        tracing::info!(order_id = %order_id, "order placed");
        Ok(order_id)
    }

    /// Cancels an order and returns its lines' units to stock.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<()> {
        let mut tx = self.store.begin().await?;
        let plan = FetchPlan::none().with_delivery().with_lines();
        let mut order = load_order(&mut tx, order_id, &plan).await?;

        order.cancel()?;

        let mut items: BTreeMap<ItemId, Item> = BTreeMap::new();
        for line in order.lines()? {
            let item = cached_item(&mut tx, &mut items, line.item_id()).await?;
            line.cancel(item)?;
        }

        for item in items.values() {
            tx.update_item_stock(item.id(), item.stock_quantity())
                .await?;
        }
        tx.update_order_status(order_id, OrderStatus::Cancelled)
            .await?;
        tx.commit().await?;

        metrics::counter!("orders_cancelled_total").increment(1);
        tracing::info!(order_id = %order_id, "order cancelled");
        Ok(())
    }

    /// Loads an order with every association.
    #[tracing::instrument(skip(self))]
    pub async fn find_order(&self, order_id: OrderId) -> Result<Order> {
        let mut tx = self.store.begin().await?;
        load_order(&mut tx, order_id, &FetchPlan::full()).await
    }

    /// Lists orders, loading the associations named in `plan`.
    #[tracing::instrument(skip(self))]
    pub async fn find_orders(&self, search: &OrderSearch, plan: &FetchPlan) -> Result<Vec<Order>> {
        let mut tx = self.store.begin().await?;
        load_orders(&mut tx, search, plan).await
    }
}

/// Returns the item from `items`, loading it on first use so that several
/// lines for the same item share one stock count.
async fn cached_item<'a, T: ItemRepository + ?Sized>(
    tx: &mut T,
    items: &'a mut BTreeMap<ItemId, Item>,
    id: ItemId,
) -> Result<&'a mut Item> {
    match items.entry(id) {
        Entry::Occupied(entry) => Ok(entry.into_mut()),
        Entry::Vacant(entry) => Ok(entry.insert(load_item(tx, id).await?)),
    }
}

impl From<OrderError> for DomainError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::Stock(item) => DomainError::Item(item),
            other => DomainError::Order(other),
        }
    }
}
