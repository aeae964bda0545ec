use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{DeliveryId, ItemId, MemberId, OrderId, OrderLineId, OrderStatus};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    DeliveryRecord, FlatItemColumns, ItemRecord, MemberRecord, NewItem, NewMember, NewOrder,
    OrderFlatRow, OrderHeaderRow, OrderItemRow, OrderLineRecord, OrderRecord, OrderSearch,
    QueryCounter, Result, StoreError,
    store::{
        ItemRepository, MemberRepository, OrderQueryRepository, OrderRepository, Store, StoreTx,
    },
};

const MEMBER_NAME_UNIQUE: &str = "members_name_key";
const ORDER_MEMBER_FK: &str = "orders_member_id_fkey";
const LINE_ITEM_FK: &str = "order_items_item_id_fkey";
const LINE_COUNT_CHECK: &str = "order_items_count_check";

#[derive(Debug, Clone, Default)]
struct Sequences {
    member: i64,
    item: i64,
    delivery: i64,
    order: i64,
    line: i64,
}

fn next(sequence: &mut i64) -> i64 {
    *sequence += 1;
    *sequence
}

#[derive(Debug, Clone, Default)]
struct Tables {
    members: BTreeMap<MemberId, MemberRecord>,
    items: BTreeMap<ItemId, ItemRecord>,
    deliveries: BTreeMap<DeliveryId, DeliveryRecord>,
    orders: BTreeMap<OrderId, OrderRecord>,
    lines: BTreeMap<OrderLineId, OrderLineRecord>,
    sequences: Sequences,
}

impl Tables {
    fn header(&self, order: &OrderRecord) -> Result<OrderHeaderRow> {
        let member = self
            .members
            .get(&order.member_id)
            .ok_or(StoreError::RowNotFound {
                entity: "Member",
                id: order.member_id.as_i64(),
            })?;
        let delivery = self
            .deliveries
            .get(&order.delivery_id)
            .ok_or(StoreError::RowNotFound {
                entity: "Delivery",
                id: order.delivery_id.as_i64(),
            })?;

        Ok(OrderHeaderRow {
            order_id: order.id,
            member_name: member.name.clone(),
            order_date: order.order_date,
            status: order.status,
            address: delivery.address.clone(),
        })
    }

    /// Orders matching the search filters, by ascending id, unpaged.
    fn matching_orders<'a>(
        &'a self,
        search: &'a OrderSearch,
    ) -> impl Iterator<Item = &'a OrderRecord> + 'a {
        self.orders.values().filter(move |order| {
            self.members
                .get(&order.member_id)
                .is_some_and(|member| search.matches(&member.name, order.status))
        })
    }

    fn item_rows(&self, order_id: OrderId) -> Result<Vec<OrderItemRow>> {
        self.lines
            .values()
            .filter(|line| line.order_id == order_id)
            .map(|line| {
                let item = self.items.get(&line.item_id).ok_or(StoreError::RowNotFound {
                    entity: "Item",
                    id: line.item_id.as_i64(),
                })?;
                Ok(OrderItemRow {
                    order_id: line.order_id,
                    item_name: item.name.clone(),
                    order_price: line.order_price,
                    count: line.count,
                })
            })
            .collect()
    }

    fn name_taken_by_other(&self, name: &str, except: Option<MemberId>) -> bool {
        self.members
            .values()
            .any(|m| m.name == name && Some(m.id) != except)
    }
}

/// In-memory store implementation for testing.
///
/// Transactions lock the whole table set and work on a private copy that
/// replaces the shared tables on commit, so concurrent transactions are
/// serialised.
///
/// Enforces the unique member name, the order and line foreign keys and the
/// positive line count. Stock cannot go negative since it is a `u32`.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
    counter: QueryCounter,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all tables and resets id sequences.
    pub async fn clear(&self) {
        *self.tables.lock().await = Tables::default();
    }
}

#[async_trait]
impl Store for InMemoryStore {
    type Tx = InMemoryTx;

    async fn begin(&self) -> Result<Self::Tx> {
        let guard = self.tables.clone().lock_owned().await;
        let working = guard.clone();
        Ok(InMemoryTx {
            guard,
            working,
            counter: self.counter.clone(),
        })
    }

    fn queries(&self) -> &QueryCounter {
        &self.counter
    }
}

/// Transaction over an [`InMemoryStore`].
pub struct InMemoryTx {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
    counter: QueryCounter,
}

#[async_trait]
impl StoreTx for InMemoryTx {
    async fn commit(self) -> Result<()> {
        let InMemoryTx {
            mut guard, working, ..
        } = self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl MemberRepository for InMemoryTx {
    async fn insert_member(&mut self, member: &NewMember) -> Result<MemberId> {
        self.counter.record("insert_member");
        if self.working.name_taken_by_other(&member.name, None) {
            return Err(StoreError::UniqueViolation {
                constraint: MEMBER_NAME_UNIQUE.to_string(),
            });
        }

        let id = MemberId::new(next(&mut self.working.sequences.member));
        self.working.members.insert(
            id,
            MemberRecord {
                id,
                name: member.name.clone(),
                address: member.address.clone(),
            },
        );
        Ok(id)
    }

    async fn find_member(&mut self, id: MemberId) -> Result<Option<MemberRecord>> {
        self.counter.record("find_member");
        Ok(self.working.members.get(&id).cloned())
    }

    async fn find_all_members(&mut self) -> Result<Vec<MemberRecord>> {
        self.counter.record("find_all_members");
        Ok(self.working.members.values().cloned().collect())
    }

    async fn find_members_by_name(&mut self, name: &str) -> Result<Vec<MemberRecord>> {
        self.counter.record("find_members_by_name");
        Ok(self
            .working
            .members
            .values()
            .filter(|m| m.name == name)
            .cloned()
            .collect())
    }

    async fn update_member_name(&mut self, id: MemberId, name: &str) -> Result<()> {
        self.counter.record("update_member_name");
        if !self.working.members.contains_key(&id) {
            return Err(StoreError::RowNotFound {
                entity: "Member",
                id: id.as_i64(),
            });
        }
        if self.working.name_taken_by_other(name, Some(id)) {
            return Err(StoreError::UniqueViolation {
                constraint: MEMBER_NAME_UNIQUE.to_string(),
            });
        }
        if let Some(member) = self.working.members.get_mut(&id) {
            member.name = name.to_string();
        }
        Ok(())
    }
}

#[async_trait]
impl ItemRepository for InMemoryTx {
    async fn insert_item(&mut self, item: &NewItem) -> Result<ItemId> {
        self.counter.record("insert_item");
        let id = ItemId::new(next(&mut self.working.sequences.item));
        self.working.items.insert(
            id,
            ItemRecord {
                id,
                name: item.name.clone(),
                price: item.price,
                stock_quantity: item.stock_quantity,
            },
        );
        Ok(id)
    }

    async fn find_item(&mut self, id: ItemId) -> Result<Option<ItemRecord>> {
        self.counter.record("find_item");
        Ok(self.working.items.get(&id).cloned())
    }

    async fn find_all_items(&mut self) -> Result<Vec<ItemRecord>> {
        self.counter.record("find_all_items");
        Ok(self.working.items.values().cloned().collect())
    }

    async fn update_item(&mut self, item: &ItemRecord) -> Result<()> {
        self.counter.record("update_item");
        let stored = self
            .working
            .items
            .get_mut(&item.id)
            .ok_or(StoreError::RowNotFound {
                entity: "Item",
                id: item.id.as_i64(),
            })?;
        *stored = item.clone();
        Ok(())
    }

    async fn update_item_stock(&mut self, id: ItemId, stock_quantity: u32) -> Result<()> {
        self.counter.record("update_item_stock");
        let stored = self
            .working
            .items
            .get_mut(&id)
            .ok_or(StoreError::RowNotFound {
                entity: "Item",
                id: id.as_i64(),
            })?;
        stored.stock_quantity = stock_quantity;
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemoryTx {
    async fn insert_order(&mut self, order: &NewOrder) -> Result<OrderId> {
        let tables = &mut self.working;

        self.counter.record("insert_delivery");
        let delivery_id = DeliveryId::new(next(&mut tables.sequences.delivery));
        tables.deliveries.insert(
            delivery_id,
            DeliveryRecord {
                id: delivery_id,
                address: order.delivery.address.clone(),
                status: order.delivery.status,
            },
        );

        self.counter.record("insert_order");
        if !tables.members.contains_key(&order.member_id) {
            return Err(StoreError::ForeignKeyViolation {
                constraint: ORDER_MEMBER_FK.to_string(),
            });
        }
        let order_id = OrderId::new(next(&mut tables.sequences.order));
        tables.orders.insert(
            order_id,
            OrderRecord {
                id: order_id,
                member_id: order.member_id,
                delivery_id,
                order_date: order.order_date,
                status: order.status,
            },
        );

        for line in &order.lines {
            self.counter.record("insert_order_line");
            if !tables.items.contains_key(&line.item_id) {
                return Err(StoreError::ForeignKeyViolation {
                    constraint: LINE_ITEM_FK.to_string(),
                });
            }
            if line.count == 0 {
                return Err(StoreError::CheckViolation {
                    constraint: LINE_COUNT_CHECK.to_string(),
                });
            }
            let line_id = OrderLineId::new(next(&mut tables.sequences.line));
            tables.lines.insert(
                line_id,
                OrderLineRecord {
                    id: line_id,
                    order_id,
                    item_id: line.item_id,
                    order_price: line.order_price,
                    count: line.count,
                },
            );
        }

        Ok(order_id)
    }

    async fn find_order(&mut self, id: OrderId) -> Result<Option<OrderRecord>> {
        self.counter.record("find_order");
        Ok(self.working.orders.get(&id).cloned())
    }

    async fn find_orders(&mut self, search: &OrderSearch) -> Result<Vec<OrderRecord>> {
        self.counter.record("find_orders");
        Ok(search.page(self.working.matching_orders(search).cloned()))
    }

    async fn find_delivery(&mut self, id: DeliveryId) -> Result<Option<DeliveryRecord>> {
        self.counter.record("find_delivery");
        Ok(self.working.deliveries.get(&id).cloned())
    }

    async fn find_order_lines(&mut self, order_id: OrderId) -> Result<Vec<OrderLineRecord>> {
        self.counter.record("find_order_lines");
        Ok(self
            .working
            .lines
            .values()
            .filter(|line| line.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn update_order_status(&mut self, id: OrderId, status: OrderStatus) -> Result<()> {
        self.counter.record("update_order_status");
        let order = self
            .working
            .orders
            .get_mut(&id)
            .ok_or(StoreError::RowNotFound {
                entity: "Order",
                id: id.as_i64(),
            })?;
        order.status = status;
        Ok(())
    }
}

#[async_trait]
impl OrderQueryRepository for InMemoryTx {
    async fn find_order_headers(&mut self, search: &OrderSearch) -> Result<Vec<OrderHeaderRow>> {
        self.counter.record("find_order_headers");
        let tables = &self.working;
        search
            .page(tables.matching_orders(search))
            .into_iter()
            .map(|order| tables.header(order))
            .collect()
    }

    async fn find_order_item_rows(&mut self, order_id: OrderId) -> Result<Vec<OrderItemRow>> {
        self.counter.record("find_order_item_rows");
        self.working.item_rows(order_id)
    }

    async fn find_order_item_rows_in(
        &mut self,
        order_ids: &[OrderId],
    ) -> Result<Vec<OrderItemRow>> {
        self.counter.record("find_order_item_rows_in");
        let mut rows = Vec::new();
        for line in self.working.lines.values() {
            if order_ids.contains(&line.order_id) {
                let item = self
                    .working
                    .items
                    .get(&line.item_id)
                    .ok_or(StoreError::RowNotFound {
                        entity: "Item",
                        id: line.item_id.as_i64(),
                    })?;
                rows.push(OrderItemRow {
                    order_id: line.order_id,
                    item_name: item.name.clone(),
                    order_price: line.order_price,
                    count: line.count,
                });
            }
        }
        Ok(rows)
    }

    async fn find_order_flat_rows(&mut self, search: &OrderSearch) -> Result<Vec<OrderFlatRow>> {
        self.counter.record("find_order_flat_rows");
        let tables = &self.working;
        let mut rows = Vec::new();

        for order in tables.matching_orders(search) {
            let header = tables.header(order)?;
            let items = tables.item_rows(order.id)?;

            if items.is_empty() {
                rows.push(flat_row(&header, None));
            }
            for item in items {
                let columns = FlatItemColumns {
                    item_name: item.item_name,
                    order_price: item.order_price,
                    count: item.count,
                };
                rows.push(flat_row(&header, Some(columns)));
            }
        }

        Ok(rows)
    }
}

fn flat_row(header: &OrderHeaderRow, item: Option<FlatItemColumns>) -> OrderFlatRow {
    OrderFlatRow {
        order_id: header.order_id,
        member_name: header.member_name.clone(),
        order_date: header.order_date,
        status: header.status,
        address: header.address.clone(),
        item,
    }
}
