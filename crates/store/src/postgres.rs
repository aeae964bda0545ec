use async_trait::async_trait;
use common::{
    Address, DeliveryId, DeliveryStatus, ItemId, MemberId, Money, OrderId, OrderLineId,
    OrderStatus,
};
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};

use crate::{
    DeliveryRecord, FlatItemColumns, ItemRecord, MemberRecord, NewItem, NewMember, NewOrder,
    OrderFlatRow, OrderHeaderRow, OrderItemRow, OrderLineRecord, OrderRecord, OrderSearch,
    QueryCounter, Result, StoreConfig, StoreError,
    store::{
        ItemRepository, MemberRepository, OrderQueryRepository, OrderRepository, Store, StoreTx,
    },
};

/// PostgreSQL-backed store implementation.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
    counter: QueryCounter,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            counter: QueryCounter::new(),
        }
    }

    /// Opens a pool from configuration and wraps it.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let pool = config.connect().await?;
        tracing::info!(
            max_connections = config.max_connections,
            "connected to database"
        );
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for PostgresStore {
    type Tx = PostgresTx;

    async fn begin(&self) -> Result<Self::Tx> {
        let tx = self.pool.begin().await?;
        Ok(PostgresTx {
            tx,
            counter: self.counter.clone(),
        })
    }

    fn queries(&self) -> &QueryCounter {
        &self.counter
    }
}

/// Transaction over a [`PostgresStore`].
///
/// Dropping it without calling [`StoreTx::commit`] rolls back.
pub struct PostgresTx {
    tx: Transaction<'static, Postgres>,
    counter: QueryCounter,
}

fn count_column(row: &PgRow, column: &str) -> Result<u32> {
    Ok(u32::try_from(row.try_get::<i64, _>(column)?)?)
}

fn address_columns(row: &PgRow) -> Result<Address> {
    Ok(Address::new(
        row.try_get::<String, _>("city")?,
        row.try_get::<String, _>("street")?,
        row.try_get::<String, _>("zipcode")?,
    ))
}

fn order_status(row: &PgRow) -> Result<OrderStatus> {
    Ok(row.try_get::<String, _>("status")?.parse()?)
}

fn row_to_member(row: PgRow) -> Result<MemberRecord> {
    Ok(MemberRecord {
        id: MemberId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        address: address_columns(&row)?,
    })
}

fn row_to_item(row: PgRow) -> Result<ItemRecord> {
    Ok(ItemRecord {
        id: ItemId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        price: Money::new(row.try_get("price")?),
        stock_quantity: count_column(&row, "stock_quantity")?,
    })
}

fn row_to_delivery(row: PgRow) -> Result<DeliveryRecord> {
    let status: DeliveryStatus = row.try_get::<String, _>("status")?.parse()?;
    Ok(DeliveryRecord {
        id: DeliveryId::new(row.try_get("id")?),
        address: address_columns(&row)?,
        status,
    })
}

fn row_to_order(row: PgRow) -> Result<OrderRecord> {
    Ok(OrderRecord {
        id: OrderId::new(row.try_get("id")?),
        member_id: MemberId::new(row.try_get("member_id")?),
        delivery_id: DeliveryId::new(row.try_get("delivery_id")?),
        order_date: row.try_get("order_date")?,
        status: order_status(&row)?,
    })
}

fn row_to_line(row: PgRow) -> Result<OrderLineRecord> {
    Ok(OrderLineRecord {
        id: OrderLineId::new(row.try_get("id")?),
        order_id: OrderId::new(row.try_get("order_id")?),
        item_id: ItemId::new(row.try_get("item_id")?),
        order_price: Money::new(row.try_get("order_price")?),
        count: count_column(&row, "count")?,
    })
}

fn row_to_header(row: &PgRow) -> Result<OrderHeaderRow> {
    Ok(OrderHeaderRow {
        order_id: OrderId::new(row.try_get("order_id")?),
        member_name: row.try_get("member_name")?,
        order_date: row.try_get("order_date")?,
        status: order_status(row)?,
        address: address_columns(row)?,
    })
}

fn row_to_item_row(row: PgRow) -> Result<OrderItemRow> {
    Ok(OrderItemRow {
        order_id: OrderId::new(row.try_get("order_id")?),
        item_name: row.try_get("item_name")?,
        order_price: Money::new(row.try_get("order_price")?),
        count: count_column(&row, "count")?,
    })
}

fn row_to_flat(row: PgRow) -> Result<OrderFlatRow> {
    let header = row_to_header(&row)?;
    let item_name: Option<String> = row.try_get("item_name")?;
    let order_price: Option<i64> = row.try_get("order_price")?;
    let count: Option<i64> = row.try_get("count")?;

    let item = match (item_name, order_price, count) {
        (Some(item_name), Some(order_price), Some(count)) => Some(FlatItemColumns {
            item_name,
            order_price: Money::new(order_price),
            count: u32::try_from(count)?,
        }),
        _ => None,
    };

    Ok(OrderFlatRow {
        order_id: header.order_id,
        member_name: header.member_name,
        order_date: header.order_date,
        status: header.status,
        address: header.address,
        item,
    })
}

#[async_trait]
impl StoreTx for PostgresTx {
    async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[async_trait]
impl MemberRepository for PostgresTx {
    #[tracing::instrument(skip(self, member), fields(name = %member.name))]
    async fn insert_member(&mut self, member: &NewMember) -> Result<MemberId> {
        self.counter.record("insert_member");
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO members (name, city, street, zipcode)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&member.name)
        .bind(member.address.city())
        .bind(member.address.street())
        .bind(member.address.zipcode())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(StoreError::from_write)?;

        Ok(MemberId::new(id))
    }

    async fn find_member(&mut self, id: MemberId) -> Result<Option<MemberRecord>> {
        self.counter.record("find_member");
        let row = sqlx::query("SELECT id, name, city, street, zipcode FROM members WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&mut *self.tx)
            .await?;

        row.map(row_to_member).transpose()
    }

    async fn find_all_members(&mut self) -> Result<Vec<MemberRecord>> {
        self.counter.record("find_all_members");
        let rows = sqlx::query("SELECT id, name, city, street, zipcode FROM members ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await?;

        rows.into_iter().map(row_to_member).collect()
    }

    async fn find_members_by_name(&mut self, name: &str) -> Result<Vec<MemberRecord>> {
        self.counter.record("find_members_by_name");
        let rows = sqlx::query(
            "SELECT id, name, city, street, zipcode FROM members WHERE name = $1 ORDER BY id",
        )
        .bind(name)
        .fetch_all(&mut *self.tx)
        .await?;

        rows.into_iter().map(row_to_member).collect()
    }

    async fn update_member_name(&mut self, id: MemberId, name: &str) -> Result<()> {
        self.counter.record("update_member_name");
        let result = sqlx::query("UPDATE members SET name = $2 WHERE id = $1")
            .bind(id.as_i64())
            .bind(name)
            .execute(&mut *self.tx)
            .await
            .map_err(StoreError::from_write)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound {
                entity: "Member",
                id: id.as_i64(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ItemRepository for PostgresTx {
    async fn insert_item(&mut self, item: &NewItem) -> Result<ItemId> {
        self.counter.record("insert_item");
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO items (name, price, stock_quantity) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&item.name)
        .bind(item.price.amount())
        .bind(i64::from(item.stock_quantity))
        .fetch_one(&mut *self.tx)
        .await
        .map_err(StoreError::from_write)?;

        Ok(ItemId::new(id))
    }

    async fn find_item(&mut self, id: ItemId) -> Result<Option<ItemRecord>> {
        self.counter.record("find_item");
        let row = sqlx::query("SELECT id, name, price, stock_quantity FROM items WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&mut *self.tx)
            .await?;

        row.map(row_to_item).transpose()
    }

    async fn find_all_items(&mut self) -> Result<Vec<ItemRecord>> {
        self.counter.record("find_all_items");
        let rows = sqlx::query("SELECT id, name, price, stock_quantity FROM items ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await?;

        rows.into_iter().map(row_to_item).collect()
    }

    async fn update_item(&mut self, item: &ItemRecord) -> Result<()> {
        self.counter.record("update_item");
        let result = sqlx::query(
            "UPDATE items SET name = $2, price = $3, stock_quantity = $4 WHERE id = $1",
        )
        .bind(item.id.as_i64())
        .bind(&item.name)
        .bind(item.price.amount())
        .bind(i64::from(item.stock_quantity))
        .execute(&mut *self.tx)
        .await
        .map_err(StoreError::from_write)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound {
                entity: "Item",
                id: item.id.as_i64(),
            });
        }
        Ok(())
    }

    async fn update_item_stock(&mut self, id: ItemId, stock_quantity: u32) -> Result<()> {
        self.counter.record("update_item_stock");
        let result = sqlx::query("UPDATE items SET stock_quantity = $2 WHERE id = $1")
            .bind(id.as_i64())
            .bind(i64::from(stock_quantity))
            .execute(&mut *self.tx)
            .await
            .map_err(StoreError::from_write)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound {
                entity: "Item",
                id: id.as_i64(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for PostgresTx {
    #[tracing::instrument(skip(self, order), fields(member_id = %order.member_id, lines = order.lines.len()))]
    async fn insert_order(&mut self, order: &NewOrder) -> Result<OrderId> {
        self.counter.record("insert_delivery");
        let delivery_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO deliveries (city, street, zipcode, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(order.delivery.address.city())
        .bind(order.delivery.address.street())
        .bind(order.delivery.address.zipcode())
        .bind(order.delivery.status.as_str())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(StoreError::from_write)?;

        self.counter.record("insert_order");
        let order_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (member_id, delivery_id, order_date, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(order.member_id.as_i64())
        .bind(delivery_id)
        .bind(order.order_date)
        .bind(order.status.as_str())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(StoreError::from_write)?;

        for line in &order.lines {
            self.counter.record("insert_order_line");
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, item_id, order_price, count)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(order_id)
            .bind(line.item_id.as_i64())
            .bind(line.order_price.amount())
            .bind(i64::from(line.count))
            .execute(&mut *self.tx)
            .await
            .map_err(StoreError::from_write)?;
        }

        Ok(OrderId::new(order_id))
    }

    async fn find_order(&mut self, id: OrderId) -> Result<Option<OrderRecord>> {
        self.counter.record("find_order");
        let row = sqlx::query(
            "SELECT id, member_id, delivery_id, order_date, status FROM orders WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&mut *self.tx)
        .await?;

        row.map(row_to_order).transpose()
    }

    async fn find_orders(&mut self, search: &OrderSearch) -> Result<Vec<OrderRecord>> {
        self.counter.record("find_orders");
        let rows = sqlx::query(
            r#"
            SELECT o.id, o.member_id, o.delivery_id, o.order_date, o.status
            FROM orders o
            JOIN members m ON m.id = o.member_id
            WHERE ($1::TEXT IS NULL OR m.name = $1)
              AND ($2::TEXT IS NULL OR o.status = $2)
            ORDER BY o.id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(search.member_name.as_deref())
        .bind(search.status.map(|s| s.as_str()))
        .bind(search.sql_limit())
        .bind(search.sql_offset())
        .fetch_all(&mut *self.tx)
        .await?;

        rows.into_iter().map(row_to_order).collect()
    }

    async fn find_delivery(&mut self, id: DeliveryId) -> Result<Option<DeliveryRecord>> {
        self.counter.record("find_delivery");
        let row = sqlx::query(
            "SELECT id, city, street, zipcode, status FROM deliveries WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&mut *self.tx)
        .await?;

        row.map(row_to_delivery).transpose()
    }

    async fn find_order_lines(&mut self, order_id: OrderId) -> Result<Vec<OrderLineRecord>> {
        self.counter.record("find_order_lines");
        let rows = sqlx::query(
            r#"
            SELECT id, order_id, item_id, order_price, count
            FROM order_items
            WHERE order_id = $1
            ORDER BY id
            "#,
        )
        .bind(order_id.as_i64())
        .fetch_all(&mut *self.tx)
        .await?;

        rows.into_iter().map(row_to_line).collect()
    }

    async fn update_order_status(&mut self, id: OrderId, status: OrderStatus) -> Result<()> {
        self.counter.record("update_order_status");
        let result = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
            .bind(id.as_i64())
            .bind(status.as_str())
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound {
                entity: "Order",
                id: id.as_i64(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl OrderQueryRepository for PostgresTx {
    async fn find_order_headers(&mut self, search: &OrderSearch) -> Result<Vec<OrderHeaderRow>> {
        self.counter.record("find_order_headers");
        let rows = sqlx::query(
            r#"
            SELECT o.id AS order_id, m.name AS member_name, o.order_date, o.status,
                   d.city, d.street, d.zipcode
            FROM orders o
            JOIN members m ON m.id = o.member_id
            JOIN deliveries d ON d.id = o.delivery_id
            WHERE ($1::TEXT IS NULL OR m.name = $1)
              AND ($2::TEXT IS NULL OR o.status = $2)
            ORDER BY o.id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(search.member_name.as_deref())
        .bind(search.status.map(|s| s.as_str()))
        .bind(search.sql_limit())
        .bind(search.sql_offset())
        .fetch_all(&mut *self.tx)
        .await?;

        rows.iter().map(row_to_header).collect()
    }

    async fn find_order_item_rows(&mut self, order_id: OrderId) -> Result<Vec<OrderItemRow>> {
        self.counter.record("find_order_item_rows");
        let rows = sqlx::query(
            r#"
            SELECT oi.order_id, i.name AS item_name, oi.order_price, oi.count
            FROM order_items oi
            JOIN items i ON i.id = oi.item_id
            WHERE oi.order_id = $1
            ORDER BY oi.id
            "#,
        )
        .bind(order_id.as_i64())
        .fetch_all(&mut *self.tx)
        .await?;

        rows.into_iter().map(row_to_item_row).collect()
    }

    async fn find_order_item_rows_in(
        &mut self,
        order_ids: &[OrderId],
    ) -> Result<Vec<OrderItemRow>> {
        self.counter.record("find_order_item_rows_in");
        let ids: Vec<i64> = order_ids.iter().map(|id| id.as_i64()).collect();
        let rows = sqlx::query(
            r#"
            SELECT oi.order_id, i.name AS item_name, oi.order_price, oi.count
            FROM order_items oi
            JOIN items i ON i.id = oi.item_id
            WHERE oi.order_id = ANY($1)
            ORDER BY oi.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&mut *self.tx)
        .await?;

        rows.into_iter().map(row_to_item_row).collect()
    }

    async fn find_order_flat_rows(&mut self, search: &OrderSearch) -> Result<Vec<OrderFlatRow>> {
        self.counter.record("find_order_flat_rows");
        let rows = sqlx::query(
            r#"
            SELECT o.id AS order_id, m.name AS member_name, o.order_date, o.status,
                   d.city, d.street, d.zipcode,
                   i.name AS item_name, oi.order_price, oi.count
            FROM orders o
            JOIN members m ON m.id = o.member_id
            JOIN deliveries d ON d.id = o.delivery_id
            LEFT JOIN order_items oi ON oi.order_id = o.id
            LEFT JOIN items i ON i.id = oi.item_id
            WHERE ($1::TEXT IS NULL OR m.name = $1)
              AND ($2::TEXT IS NULL OR o.status = $2)
            ORDER BY o.id, oi.id
            "#,
        )
        .bind(search.member_name.as_deref())
        .bind(search.status.map(|s| s.as_str()))
        .fetch_all(&mut *self.tx)
        .await?;

        rows.into_iter().map(row_to_flat).collect()
    }
}
