use common::{ItemId, Money, OrderLineId};
use serde::Serialize;
use store::{NewOrderLine, OrderLineRecord};

use super::OrderError;
use crate::item::Item;

/// One purchased item within an order, priced when the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    id: Option<OrderLineId>,
    item_id: ItemId,
    item: Option<Item>,
    order_price: Money,
    count: u32,
}

impl OrderLine {
    /// Creates a line for `count` units of `item` at `order_price`, taking
    /// the units out of the item's stock.
    pub fn create(item: &mut Item, order_price: Money, count: u32) -> Result<Self, OrderError> {
        if count == 0 {
            return Err(OrderError::InvalidCount { count });
        }
        item.remove_stock(count)?;

        Ok(Self {
            id: None,
            item_id: item.id(),
            item: Some(item.clone()),
            order_price,
            count,
        })
    }

    /// Returns this line's units to the item's stock.
    pub fn cancel(&self, item: &mut Item) -> Result<(), OrderError> {
        item.add_stock(self.count)?;
        Ok(())
    }

    pub fn id(&self) -> Option<OrderLineId> {
        self.id
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    /// The purchased item, if it was loaded.
    pub fn item(&self) -> Option<&Item> {
        self.item.as_ref()
    }

    pub fn order_price(&self) -> Money {
        self.order_price
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn total_price(&self) -> Money {
        self.order_price.multiply(self.count)
    }

    pub(crate) fn attach_item(&mut self, item: Item) {
        self.item = Some(item);
    }

    pub(crate) fn to_new(&self) -> NewOrderLine {
        NewOrderLine {
            item_id: self.item_id,
            order_price: self.order_price,
            count: self.count,
        }
    }
}

impl From<OrderLineRecord> for OrderLine {
    fn from(record: OrderLineRecord) -> Self {
        Self {
            id: Some(record.id),
            item_id: record.item_id,
            item: None,
            order_price: record.order_price,
            count: record.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use store::ItemRecord;

    use super::*;
    use crate::item::ItemError;

    fn book(stock: u32) -> Item {
        Item::from(ItemRecord {
            id: ItemId::new(1),
            name: "JPA1 BOOK".to_string(),
            price: Money::new(10000),
            stock_quantity: stock,
        })
    }

    #[test]
    fn create_takes_stock_and_prices_line() {
        let mut item = book(10);
        let line = OrderLine::create(&mut item, Money::new(10000), 3).unwrap();

        assert_eq!(item.stock_quantity(), 7);
        assert_eq!(line.count(), 3);
        assert_eq!(line.total_price(), Money::new(30000));
        assert_eq!(line.item().map(Item::name), Some("JPA1 BOOK"));
    }

    #[test]
    fn create_rejects_zero_count() {
        let mut item = book(10);
        let err = OrderLine::create(&mut item, Money::new(10000), 0).unwrap_err();

        assert_eq!(err, OrderError::InvalidCount { count: 0 });
        assert_eq!(item.stock_quantity(), 10);
    }

    #[test]
    fn create_fails_on_short_stock() {
        let mut item = book(1);
        let err = OrderLine::create(&mut item, Money::new(10000), 2).unwrap_err();

        assert!(matches!(
            err,
            OrderError::Stock(ItemError::NotEnoughStock { requested: 2, .. })
        ));
    }

    #[test]
    fn total_price_saturates_for_huge_prices() {
        let mut item = book(10);
        let line = OrderLine::create(&mut item, Money::new(i64::MAX / 2 + 1), 2).unwrap();

        assert_eq!(line.total_price(), Money::new(i64::MAX));
    }

    #[test]
    fn cancel_restores_stock() {
        let mut item = book(5);
        let line = OrderLine::create(&mut item, Money::new(10000), 5).unwrap();
        assert_eq!(item.stock_quantity(), 0);

        line.cancel(&mut item).unwrap();
        assert_eq!(item.stock_quantity(), 5);
    }
}
