use std::collections::HashMap;

use common::OrderId;
use store::{OrderQueryRepository, OrderSearch};

use crate::Result;
use crate::views::{OrderItemView, OrderView};

pub(super) async fn fetch<T>(tx: &mut T, search: &OrderSearch) -> Result<Vec<OrderView>>
where
    T: OrderQueryRepository + ?Sized,
{
    let headers = tx.find_order_headers(search).await?;
    let ids: Vec<OrderId> = headers.iter().map(|h| h.order_id).collect();

    // Issued even for an empty id list so the cost stays at two statements.
    let rows = tx.find_order_item_rows_in(&ids).await?;

    let mut items_by_order: HashMap<OrderId, Vec<OrderItemView>> = HashMap::new();
    for row in rows {
        items_by_order
            .entry(row.order_id)
            .or_default()
            .push(row.into());
    }

    Ok(headers
        .into_iter()
        .map(|header| {
            let items = items_by_order.remove(&header.order_id).unwrap_or_default();
            OrderView::from_header(header, items)
        })
        .collect())
}
