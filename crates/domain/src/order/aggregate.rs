//! Order aggregate implementation.

use chrono::{DateTime, Utc};
use common::{DeliveryId, MemberId, Money, OrderId, OrderStatus};
use serde::Serialize;
use store::{NewOrder, OrderRecord};

use super::{Delivery, OrderError, OrderLine};
use crate::member::Member;

/// Order aggregate root.
///
/// The delivery and lines belong to the order. The member, delivery and
/// lines are only present when they were loaded, either because the order
/// was just created or because the fetch plan named them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    /// Store id; `None` until persisted.
    id: Option<OrderId>,

    member_id: MemberId,
    member: Option<Member>,

    /// Store id of the delivery; `None` until persisted.
    delivery_id: Option<DeliveryId>,
    delivery: Option<Delivery>,

    lines: Option<Vec<OrderLine>>,

    order_date: DateTime<Utc>,
    status: OrderStatus,
}

impl Order {
    /// Creates a new order for `member`, shipped via `delivery`.
    ///
    /// Stock has already been taken by [`OrderLine::create`].
    pub fn create(
        member: &Member,
        delivery: Delivery,
        lines: Vec<OrderLine>,
    ) -> Result<Self, OrderError> {
        if lines.is_empty() {
            return Err(OrderError::NoLines);
        }

        Ok(Self {
            id: None,
            member_id: member.id(),
            member: Some(member.clone()),
            delivery_id: None,
            delivery: Some(delivery),
            lines: Some(lines),
            order_date: Utc::now(),
            status: OrderStatus::Ordered,
        })
    }

    /// Marks the order cancelled.
    ///
    /// Requires the delivery to be loaded. Returning stock is done per line
    /// with [`OrderLine::cancel`].
    pub fn cancel(&mut self) -> Result<(), OrderError> {
        if self.delivery()?.is_completed() {
            return Err(OrderError::AlreadyDelivered);
        }
        if self.status == OrderStatus::Cancelled {
            return Err(OrderError::AlreadyCancelled);
        }

        self.status = OrderStatus::Cancelled;
        Ok(())
    }

    /// Sum of the line totals. Requires the lines to be loaded.
    pub fn total_price(&self) -> Result<Money, OrderError> {
        Ok(self.lines()?.iter().map(OrderLine::total_price).sum())
    }

    pub fn id(&self) -> Option<OrderId> {
        self.id
    }

    pub fn member_id(&self) -> MemberId {
        self.member_id
    }

    pub fn delivery_id(&self) -> Option<DeliveryId> {
        self.delivery_id
    }

    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn member(&self) -> Result<&Member, OrderError> {
        self.member.as_ref().ok_or(OrderError::NotLoaded {
            association: "member",
        })
    }

    pub fn delivery(&self) -> Result<&Delivery, OrderError> {
        self.delivery.as_ref().ok_or(OrderError::NotLoaded {
            association: "delivery",
        })
    }

    pub fn lines(&self) -> Result<&[OrderLine], OrderError> {
        self.lines.as_deref().ok_or(OrderError::NotLoaded {
            association: "lines",
        })
    }

    pub(crate) fn lines_mut(&mut self) -> Option<&mut Vec<OrderLine>> {
        self.lines.as_mut()
    }

    pub(crate) fn attach_member(&mut self, member: Member) {
        self.member = Some(member);
    }

    pub(crate) fn attach_delivery(&mut self, delivery: Delivery) {
        self.delivery = Some(delivery);
    }

    pub(crate) fn attach_lines(&mut self, lines: Vec<OrderLine>) {
        self.lines = Some(lines);
    }

    /// Builds the insert for a freshly created order.
    pub(crate) fn to_new_order(&self) -> Result<NewOrder, OrderError> {
        Ok(NewOrder {
            member_id: self.member_id,
            order_date: self.order_date,
            status: self.status,
            delivery: self.delivery()?.to_new(),
            lines: self.lines()?.iter().map(OrderLine::to_new).collect(),
        })
    }
}

impl From<OrderRecord> for Order {
    fn from(record: OrderRecord) -> Self {
        Self {
            id: Some(record.id),
            member_id: record.member_id,
            member: None,
            delivery_id: Some(record.delivery_id),
            delivery: None,
            lines: None,
            order_date: record.order_date,
            status: record.status,
        }
    }
}
