use domain::{FetchPlan, Order, load_orders};
use store::{ItemRepository, MemberRepository, OrderRepository, OrderSearch};

use crate::Result;
use crate::views::{OrderItemView, OrderView};

pub(super) async fn fetch<T>(tx: &mut T, search: &OrderSearch) -> Result<Vec<OrderView>>
where
    T: MemberRepository + ItemRepository + OrderRepository + ?Sized,
{
    let orders = load_orders(tx, search, &FetchPlan::full()).await?;
    orders.iter().map(to_view).collect()
}

fn to_view(order: &Order) -> Result<OrderView> {
    let mut items = Vec::new();
    for line in order.lines()? {
        let item_name = line
            .item()
            .map(|item| item.name().to_string())
            .ok_or(domain::OrderError::NotLoaded {
                association: "line item",
            })?;
        items.push(OrderItemView {
            item_name,
            order_price: line.order_price(),
            count: line.count(),
        });
    }

    let order_id = order.id().ok_or(domain::OrderError::NotLoaded {
        association: "id",
    })?;

    Ok(OrderView {
        order_id,
        member_name: order.member()?.name().to_string(),
        order_date: order.order_date(),
        status: order.status(),
        address: order.delivery()?.address().clone(),
        items,
    })
}
