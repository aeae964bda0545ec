//! Explicit association loading for orders.
//!
//! A [`FetchPlan`] names which associations of an order are resolved. Each
//! named association costs one query per order (and the line items one
//! query per line), so the full plan over `N` orders with `M_i` lines costs
//! `1 + 3N + ΣM_i` queries. Associations outside the plan are never loaded
//! and their accessors report `NotLoaded`.

use common::OrderId;
use store::{ItemRepository, MemberRepository, OrderRepository, OrderSearch};

use crate::error::{DomainError, Result};
use crate::item::Item;
use crate::member::Member;
use crate::order::{Delivery, Order, OrderLine};

/// Which associations of an order to load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchPlan {
    member: bool,
    delivery: bool,
    lines: bool,
    line_items: bool,
}

impl FetchPlan {
    /// Loads the order rows only.
    pub fn none() -> Self {
        Self::default()
    }

    /// Loads every association.
    pub fn full() -> Self {
        Self {
            member: true,
            delivery: true,
            lines: true,
            line_items: true,
        }
    }

    pub fn with_member(mut self) -> Self {
        self.member = true;
        self
    }

    pub fn with_delivery(mut self) -> Self {
        self.delivery = true;
        self
    }

    pub fn with_lines(mut self) -> Self {
        self.lines = true;
        self
    }

    /// Loads the item of every line. Implies [`FetchPlan::with_lines`].
    pub fn with_line_items(mut self) -> Self {
        self.lines = true;
        self.line_items = true;
        self
    }

    pub fn loads_member(&self) -> bool {
        self.member
    }

    pub fn loads_delivery(&self) -> bool {
        self.delivery
    }

    pub fn loads_lines(&self) -> bool {
        self.lines
    }

    pub fn loads_line_items(&self) -> bool {
        self.line_items
    }
}

/// Loads the orders matching `search`, resolving the associations in `plan`.
#[tracing::instrument(skip(tx))]
pub async fn load_orders<T>(tx: &mut T, search: &OrderSearch, plan: &FetchPlan) -> Result<Vec<Order>>
where
    T: MemberRepository + ItemRepository + OrderRepository + ?Sized,
{
    let records = tx.find_orders(search).await?;
    let mut orders = Vec::with_capacity(records.len());

    for record in records {
        let mut order = Order::from(record);
        resolve(tx, &mut order, plan).await?;
        orders.push(order);
    }

    tracing::debug!(orders = orders.len(), "orders loaded");
    Ok(orders)
}

/// Loads one order by id, resolving the associations in `plan`.
pub async fn load_order<T>(tx: &mut T, id: OrderId, plan: &FetchPlan) -> Result<Order>
where
    T: MemberRepository + ItemRepository + OrderRepository + ?Sized,
{
    let record = tx.find_order(id).await?.ok_or(DomainError::NotFound {
        entity: "Order",
        id: id.as_i64(),
    })?;

    let mut order = Order::from(record);
    resolve(tx, &mut order, plan).await?;
    Ok(order)
}

async fn resolve<T>(tx: &mut T, order: &mut Order, plan: &FetchPlan) -> Result<()>
where
    T: MemberRepository + ItemRepository + OrderRepository + ?Sized,
{
    if plan.loads_member() {
        let id = order.member_id();
        let member = tx.find_member(id).await?.ok_or(DomainError::NotFound {
            entity: "Member",
            id: id.as_i64(),
        })?;
        order.attach_member(Member::from(member));
    }

    if plan.loads_delivery()
        && let Some(id) = order.delivery_id()
    {
        let delivery = tx.find_delivery(id).await?.ok_or(DomainError::NotFound {
            entity: "Delivery",
            id: id.as_i64(),
        })?;
        order.attach_delivery(Delivery::from(delivery));
    }

    if plan.loads_lines()
        && let Some(id) = order.id()
    {
        let lines = tx.find_order_lines(id).await?;
        order.attach_lines(lines.into_iter().map(OrderLine::from).collect());
    }

    if plan.loads_line_items()
        && let Some(lines) = order.lines_mut()
    {
        for line in lines.iter_mut() {
            let id = line.item_id();
            let item = tx.find_item(id).await?.ok_or(DomainError::NotFound {
                entity: "Item",
                id: id.as_i64(),
            })?;
            line.attach_item(Item::from(item));
        }
    }

    Ok(())
}
