//! Order commands.

use common::{ItemId, MemberId};

/// One requested line of a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceOrderLine {
    pub item_id: ItemId,
    pub count: u32,
}

/// Command to place an order for a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOrder {
    /// The member placing the order.
    pub member_id: MemberId,

    /// Requested items, in the order the lines should be stored.
    pub lines: Vec<PlaceOrderLine>,
}

impl PlaceOrder {
    /// Creates a new PlaceOrder command with no lines.
    pub fn new(member_id: MemberId) -> Self {
        Self {
            member_id,
            lines: Vec::new(),
        }
    }

    /// Creates a command for a single item.
    pub fn single(member_id: MemberId, item_id: ItemId, count: u32) -> Self {
        Self::new(member_id).line(item_id, count)
    }

    /// Appends a line.
    pub fn line(mut self, item_id: ItemId, count: u32) -> Self {
        self.lines.push(PlaceOrderLine { item_id, count });
        self
    }
}
