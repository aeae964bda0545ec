use store::{OrderQueryRepository, OrderSearch};

use crate::Result;
use crate::assembler::OrderViewAssembler;
use crate::views::OrderView;

pub(super) async fn fetch<T>(tx: &mut T, search: &OrderSearch) -> Result<Vec<OrderView>>
where
    T: OrderQueryRepository + ?Sized,
{
    let rows = tx.find_order_flat_rows(search).await?;
    let row_count = rows.len();

    // Paging raw rows would split an order's items, so page the views.
    let views = search.page(OrderViewAssembler::assemble(rows));

    tracing::trace!(rows = row_count, orders = views.len(), "flat rows regrouped");
    Ok(views)
}
