//! Row-shaped records exchanged with the store.
//!
//! `*Record` types mirror a single table row. `New*` types carry what an
//! insert needs before the store has assigned an id. The `*Row` types are the
//! read-only shapes returned by the order listing queries.

use chrono::{DateTime, Utc};
use common::{
    Address, DeliveryId, DeliveryStatus, ItemId, MemberId, Money, OrderId, OrderLineId,
    OrderStatus,
};

/// A row of the `members` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    pub id: MemberId,
    pub name: String,
    pub address: Address,
}

/// A member to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub name: String,
    pub address: Address,
}

/// A row of the `items` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub id: ItemId,
    pub name: String,
    pub price: Money,
    pub stock_quantity: u32,
}

/// An item to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub price: Money,
    pub stock_quantity: u32,
}

/// A row of the `deliveries` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRecord {
    pub id: DeliveryId,
    pub address: Address,
    pub status: DeliveryStatus,
}

/// A delivery to insert along with its order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDelivery {
    pub address: Address,
    pub status: DeliveryStatus,
}

/// A row of the `orders` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub id: OrderId,
    pub member_id: MemberId,
    pub delivery_id: DeliveryId,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
}

/// A row of the `order_items` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineRecord {
    pub id: OrderLineId,
    pub order_id: OrderId,
    pub item_id: ItemId,
    pub order_price: Money,
    pub count: u32,
}

/// A line to insert along with its order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderLine {
    pub item_id: ItemId,
    pub order_price: Money,
    pub count: u32,
}

/// An order to insert. The delivery and lines are written in the same
/// transaction and share the order's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub member_id: MemberId,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub delivery: NewDelivery,
    pub lines: Vec<NewOrderLine>,
}

/// An order joined with its member and delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderHeaderRow {
    pub order_id: OrderId,
    pub member_name: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub address: Address,
}

/// An order line joined with its item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRow {
    pub order_id: OrderId,
    pub item_name: String,
    pub order_price: Money,
    pub count: u32,
}

/// Item columns of a flat row; absent when the order has no lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatItemColumns {
    pub item_name: String,
    pub order_price: Money,
    pub count: u32,
}

/// One row of the order/member/delivery/line/item outer join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFlatRow {
    pub order_id: OrderId,
    pub member_name: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub address: Address,
    pub item: Option<FlatItemColumns>,
}

impl OrderFlatRow {
    /// Splits the row into its order-level part and its item part.
    pub fn into_parts(self) -> (OrderHeaderRow, Option<FlatItemColumns>) {
        (
            OrderHeaderRow {
                order_id: self.order_id,
                member_name: self.member_name,
                order_date: self.order_date,
                status: self.status,
                address: self.address,
            },
            self.item,
        )
    }
}
