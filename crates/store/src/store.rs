use async_trait::async_trait;
use common::{DeliveryId, ItemId, MemberId, OrderId, OrderStatus};

use crate::{
    DeliveryRecord, ItemRecord, MemberRecord, NewItem, NewMember, NewOrder, OrderFlatRow,
    OrderHeaderRow, OrderItemRow, OrderLineRecord, OrderRecord, OrderSearch, QueryCounter, Result,
};

/// Data access for members.
#[async_trait]
pub trait MemberRepository: Send {
    /// Inserts a member and returns its assigned id.
    ///
    /// Fails with `UniqueViolation` if the name is already taken.
    async fn insert_member(&mut self, member: &NewMember) -> Result<MemberId>;

    /// Finds a member by id.
    async fn find_member(&mut self, id: MemberId) -> Result<Option<MemberRecord>>;

    /// Returns all members ordered by id.
    async fn find_all_members(&mut self) -> Result<Vec<MemberRecord>>;

    /// Returns the members with exactly this name.
    async fn find_members_by_name(&mut self, name: &str) -> Result<Vec<MemberRecord>>;

    /// Renames a member.
    ///
    /// Fails with `RowNotFound` for an unknown id and `UniqueViolation` if
    /// another member already has the name.
    async fn update_member_name(&mut self, id: MemberId, name: &str) -> Result<()>;
}

/// Data access for catalogue items.
#[async_trait]
pub trait ItemRepository: Send {
    /// Inserts an item and returns its assigned id.
    async fn insert_item(&mut self, item: &NewItem) -> Result<ItemId>;

    /// Finds an item by id.
    async fn find_item(&mut self, id: ItemId) -> Result<Option<ItemRecord>>;

    /// Returns all items ordered by id.
    async fn find_all_items(&mut self) -> Result<Vec<ItemRecord>>;

    /// Overwrites name, price and stock of an existing item.
    async fn update_item(&mut self, item: &ItemRecord) -> Result<()>;

    /// Overwrites the stock of an existing item.
    async fn update_item_stock(&mut self, id: ItemId, stock_quantity: u32) -> Result<()>;
}

/// Data access for the order aggregate and its owned rows.
#[async_trait]
pub trait OrderRepository: Send {
    /// Inserts an order together with its delivery and lines.
    async fn insert_order(&mut self, order: &NewOrder) -> Result<OrderId>;

    /// Finds an order row by id.
    async fn find_order(&mut self, id: OrderId) -> Result<Option<OrderRecord>>;

    /// Returns the order rows matching a search, paged.
    async fn find_orders(&mut self, search: &OrderSearch) -> Result<Vec<OrderRecord>>;

    /// Finds a delivery by id.
    async fn find_delivery(&mut self, id: DeliveryId) -> Result<Option<DeliveryRecord>>;

    /// Returns the lines of one order in insertion order.
    async fn find_order_lines(&mut self, order_id: OrderId) -> Result<Vec<OrderLineRecord>>;

    /// Changes the status of an order.
    async fn update_order_status(&mut self, id: OrderId, status: OrderStatus) -> Result<()>;
}

/// Read-only queries backing the order listing views.
#[async_trait]
pub trait OrderQueryRepository: Send {
    /// Orders joined with their member and delivery, paged.
    async fn find_order_headers(&mut self, search: &OrderSearch) -> Result<Vec<OrderHeaderRow>>;

    /// Item rows of a single order.
    async fn find_order_item_rows(&mut self, order_id: OrderId) -> Result<Vec<OrderItemRow>>;

    /// Item rows of every listed order, in a single statement.
    ///
    /// An empty id list still issues the statement and returns no rows.
    async fn find_order_item_rows_in(&mut self, order_ids: &[OrderId])
    -> Result<Vec<OrderItemRow>>;

    /// One row per (order, line) pair, outer-joined so orders without lines
    /// yield a single row with no item columns. Paging is ignored.
    async fn find_order_flat_rows(&mut self, search: &OrderSearch) -> Result<Vec<OrderFlatRow>>;
}

/// A unit of work against the store.
///
/// Dropping a transaction without committing discards everything it wrote.
#[async_trait]
pub trait StoreTx:
    MemberRepository + ItemRepository + OrderRepository + OrderQueryRepository + Send
{
    /// Makes the transaction's writes visible.
    async fn commit(self) -> Result<()>;

    /// Discards the transaction's writes.
    async fn rollback(self) -> Result<()>;
}

/// A store that hands out transactions.
///
/// All implementations must be cheap to clone and thread-safe.
#[async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    /// The transaction type of this backend.
    type Tx: StoreTx;

    /// Starts a transaction.
    async fn begin(&self) -> Result<Self::Tx>;

    /// Returns the statement counter shared by all transactions.
    fn queries(&self) -> &QueryCounter;
}
