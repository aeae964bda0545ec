use chrono::{DateTime, Utc};
use common::{Address, OrderId, OrderStatus};
use serde::{Deserialize, Serialize};
use store::OrderHeaderRow;

/// An order in a listing without its items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryView {
    pub order_id: OrderId,
    #[serde(rename = "name")]
    pub member_name: String,
    pub order_date: DateTime<Utc>,
    #[serde(rename = "orderStatus")]
    pub status: OrderStatus,
    pub address: Address,
}

impl From<OrderHeaderRow> for OrderSummaryView {
    fn from(row: OrderHeaderRow) -> Self {
        Self {
            order_id: row.order_id,
            member_name: row.member_name,
            order_date: row.order_date,
            status: row.status,
            address: row.address,
        }
    }
}
