use common::{ItemId, Money};
use serde::Serialize;
use store::{ItemRecord, NewItem};

use super::ItemError;

/// A book on sale, with its current price and stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    id: ItemId,
    name: String,
    price: Money,
    stock_quantity: u32,
}

impl Item {
    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn stock_quantity(&self) -> u32 {
        self.stock_quantity
    }

    /// Increases stock by `quantity`.
    pub fn add_stock(&mut self, quantity: u32) -> Result<(), ItemError> {
        self.stock_quantity = self
            .stock_quantity
            .checked_add(quantity)
            .ok_or(ItemError::StockOverflow { item_id: self.id })?;
        Ok(())
    }

    /// Decreases stock by `quantity`.
    ///
    /// Fails without changing anything if less than `quantity` is in stock.
    pub fn remove_stock(&mut self, quantity: u32) -> Result<(), ItemError> {
        self.stock_quantity =
            self.stock_quantity
                .checked_sub(quantity)
                .ok_or(ItemError::NotEnoughStock {
                    item_id: self.id,
                    requested: quantity,
                    available: self.stock_quantity,
                })?;
        Ok(())
    }

    /// Applies an edit of name, price and stock.
    pub fn apply(&mut self, update: UpdateItem) -> Result<(), ItemError> {
        validate(&update.name, update.price)?;
        self.name = update.name;
        self.price = update.price;
        self.stock_quantity = update.stock_quantity;
        Ok(())
    }

    pub(crate) fn to_record(&self) -> ItemRecord {
        ItemRecord {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            stock_quantity: self.stock_quantity,
        }
    }
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            price: record.price,
            stock_quantity: record.stock_quantity,
        }
    }
}

pub(crate) fn validate(name: &str, price: Money) -> Result<(), ItemError> {
    if name.trim().is_empty() {
        return Err(ItemError::EmptyName);
    }
    if price.is_negative() {
        return Err(ItemError::NegativePrice {
            price: price.amount(),
        });
    }
    Ok(())
}

pub(crate) fn validate_new(item: &NewItem) -> Result<(), ItemError> {
    validate(&item.name, item.price)
}

/// Replacement values for an item's editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateItem {
    pub name: String,
    pub price: Money,
    pub stock_quantity: u32,
}

impl UpdateItem {
    /// Creates a new UpdateItem.
    pub fn new(name: impl Into<String>, price: Money, stock_quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            stock_quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(stock: u32) -> Item {
        Item::from(ItemRecord {
            id: ItemId::new(7),
            name: "JPA1 BOOK".to_string(),
            price: Money::new(10000),
            stock_quantity: stock,
        })
    }

    #[test]
    fn remove_stock_decrements() {
        let mut item = book(10);
        item.remove_stock(4).unwrap();
        assert_eq!(item.stock_quantity(), 6);
    }

    #[test]
    fn remove_stock_to_exactly_zero() {
        let mut item = book(3);
        item.remove_stock(3).unwrap();
        assert_eq!(item.stock_quantity(), 0);
    }

    #[test]
    fn remove_more_than_available_fails_unchanged() {
        let mut item = book(2);
        let err = item.remove_stock(3).unwrap_err();

        assert_eq!(
            err,
            ItemError::NotEnoughStock {
                item_id: ItemId::new(7),
                requested: 3,
                available: 2,
            }
        );
        assert_eq!(item.stock_quantity(), 2);
    }

    #[test]
    fn add_stock_overflow_is_rejected() {
        let mut item = book(u32::MAX);
        assert!(matches!(
            item.add_stock(1),
            Err(ItemError::StockOverflow { .. })
        ));
    }

    #[test]
    fn apply_validates_before_changing() {
        let mut item = book(5);

        let err = item
            .apply(UpdateItem::new("JPA1 BOOK", Money::new(-1), 9))
            .unwrap_err();
        assert_eq!(err, ItemError::NegativePrice { price: -1 });
        assert_eq!(item.stock_quantity(), 5);

        item.apply(UpdateItem::new("JPA1 BOOK 2nd ed.", Money::new(12000), 9))
            .unwrap();
        assert_eq!(item.name(), "JPA1 BOOK 2nd ed.");
        assert_eq!(item.price(), Money::new(12000));
        assert_eq!(item.stock_quantity(), 9);
    }
}
