//! Catalogue maintenance.

use common::ItemId;
use store::{ItemRepository, NewItem, Store, StoreTx};

use crate::error::{DomainError, Result};

use super::{Item, UpdateItem, entity::validate_new};

/// Service for registering and editing catalogue items.
pub struct ItemService<S: Store> {
    store: S,
}

impl<S: Store> ItemService<S> {
    /// Creates a new item service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers a new item and returns its id.
    #[tracing::instrument(skip(self, item), fields(name = %item.name))]
    pub async fn save_item(&self, item: NewItem) -> Result<ItemId> {
        validate_new(&item)?;
        let mut tx = self.store.begin().await?;
        let id = tx.insert_item(&item).await?;
        tx.commit().await?;

        tracing::debug!(item_id = %id, "item saved");
        Ok(id)
    }

    /// Returns every item ordered by id.
    #[tracing::instrument(skip(self))]
    pub async fn find_items(&self) -> Result<Vec<Item>> {
        let mut tx = self.store.begin().await?;
        let items = tx.find_all_items().await?;
        Ok(items.into_iter().map(Item::from).collect())
    }

    /// Loads an item by id.
    #[tracing::instrument(skip(self))]
    pub async fn find_one(&self, id: ItemId) -> Result<Item> {
        let mut tx = self.store.begin().await?;
        load_item(&mut tx, id).await
    }

    /// Replaces an item's name, price and stock.
    #[tracing::instrument(skip(self, update))]
    pub async fn update_item(&self, id: ItemId, update: UpdateItem) -> Result<Item> {
        let mut tx = self.store.begin().await?;
        let mut item = load_item(&mut tx, id).await?;
        item.apply(update)?;

        tx.update_item(&item.to_record()).await?;
        tx.commit().await?;
        Ok(item)
    }
}

pub(crate) async fn load_item<T: ItemRepository + ?Sized>(tx: &mut T, id: ItemId) -> Result<Item> {
    tx.find_item(id)
        .await?
        .map(Item::from)
        .ok_or(DomainError::NotFound {
            entity: "Item",
            id: id.as_i64(),
        })
}
