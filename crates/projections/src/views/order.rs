use chrono::{DateTime, Utc};
use common::{Address, Money, OrderId, OrderStatus};
use serde::{Deserialize, Serialize};
use store::{FlatItemColumns, OrderHeaderRow, OrderItemRow};

/// One purchased item in an order listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub item_name: String,
    pub order_price: Money,
    pub count: u32,
}

impl From<OrderItemRow> for OrderItemView {
    fn from(row: OrderItemRow) -> Self {
        Self {
            item_name: row.item_name,
            order_price: row.order_price,
            count: row.count,
        }
    }
}

impl From<FlatItemColumns> for OrderItemView {
    fn from(columns: FlatItemColumns) -> Self {
        Self {
            item_name: columns.item_name,
            order_price: columns.order_price,
            count: columns.count,
        }
    }
}

/// An order in a listing, with its member, delivery address and items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub order_id: OrderId,

    /// Name of the member who placed the order.
    #[serde(rename = "name")]
    pub member_name: String,

    pub order_date: DateTime<Utc>,

    #[serde(rename = "orderStatus")]
    pub status: OrderStatus,

    /// Delivery address.
    pub address: Address,

    #[serde(rename = "orderItems")]
    pub items: Vec<OrderItemView>,
}

impl OrderView {
    /// Creates a view from its order-level columns and items.
    pub fn from_header(header: OrderHeaderRow, items: Vec<OrderItemView>) -> Self {
        Self {
            order_id: header.order_id,
            member_name: header.member_name,
            order_date: header.order_date,
            status: header.status,
            address: header.address,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn serialises_with_listing_field_names() {
        let view = OrderView {
            order_id: OrderId::new(4),
            member_name: "userA".to_string(),
            order_date: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
            status: OrderStatus::Ordered,
            address: Address::new("Seoul", "1", "1111"),
            items: vec![OrderItemView {
                item_name: "JPA1 BOOK".to_string(),
                order_price: Money::new(10000),
                count: 1,
            }],
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "orderId": 4,
                "name": "userA",
                "orderDate": "2024-05-01T09:30:00Z",
                "orderStatus": "ORDERED",
                "address": { "city": "Seoul", "street": "1", "zipcode": "1111" },
                "orderItems": [
                    { "itemName": "JPA1 BOOK", "orderPrice": 10000, "count": 1 }
                ]
            })
        );
    }
}
