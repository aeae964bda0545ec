use store::{OrderQueryRepository, OrderSearch};

use crate::Result;
use crate::views::{OrderItemView, OrderView};

pub(super) async fn fetch<T>(tx: &mut T, search: &OrderSearch) -> Result<Vec<OrderView>>
where
    T: OrderQueryRepository + ?Sized,
{
    let headers = tx.find_order_headers(search).await?;
    let mut views = Vec::with_capacity(headers.len());

    for header in headers {
        let rows = tx.find_order_item_rows(header.order_id).await?;
        let items = rows.into_iter().map(OrderItemView::from).collect();
        views.push(OrderView::from_header(header, items));
    }

    Ok(views)
}
