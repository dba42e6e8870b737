//! Order repository.
//!
//! Order creation is the one multi-row write in the system: the
//! availability check, the order row, and its line items all happen inside a
//! single transaction so a checkout either lands completely or not at all.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use tavola_core::{Category, MenuItemId, OrderId, OrderItemId, OrderStatus};

use super::RepositoryError;
use crate::models::{MenuItem, Order, OrderItem};
use crate::validation::NewOrder;

const ORDER_COLUMNS: &str =
    "id, customer_name, phone, address, notes, total, status, created_at, updated_at";
const MENU_COLUMNS: &str =
    "id, name, description, price, image, category, is_available, created_at, updated_at";

/// Errors from order creation.
#[derive(Debug, thiserror::Error)]
pub enum OrderCreateError {
    /// One or more referenced menu items are unknown or currently
    /// unavailable. Nothing was persisted.
    #[error("unavailable menu items")]
    Unavailable(Vec<MenuItemId>),

    /// The underlying store failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for OrderCreateError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Flat row of an order item joined with its (possibly deleted) menu item.
#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: OrderItemId,
    order_id: OrderId,
    menu_item_id: MenuItemId,
    quantity: i32,
    price: Decimal,
    mi_id: Option<MenuItemId>,
    mi_name: Option<String>,
    mi_description: Option<String>,
    mi_price: Option<Decimal>,
    mi_image: Option<String>,
    mi_category: Option<Category>,
    mi_is_available: Option<bool>,
    mi_created_at: Option<DateTime<Utc>>,
    mi_updated_at: Option<DateTime<Utc>>,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        let menu_item = match (
            row.mi_id,
            row.mi_name,
            row.mi_description,
            row.mi_price,
            row.mi_category,
            row.mi_is_available,
            row.mi_created_at,
            row.mi_updated_at,
        ) {
            (
                Some(id),
                Some(name),
                Some(description),
                Some(price),
                Some(category),
                Some(is_available),
                Some(created_at),
                Some(updated_at),
            ) => Some(MenuItem {
                id,
                name,
                description,
                price,
                image: row.mi_image,
                category,
                is_available,
                created_at,
                updated_at,
            }),
            _ => None,
        };

        Self {
            id: row.id,
            order_id: row.order_id,
            menu_item_id: row.menu_item_id,
            quantity: row.quantity,
            price: row.price,
            menu_item,
        }
    }
}

/// Repository for order operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List orders newest-first, optionally filtered by status, items
    /// expanded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, RepositoryError> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {ORDER_COLUMNS} FROM orders"));
        if let Some(status) = status {
            query.push(" WHERE status = ");
            query.push_bind(status);
        }
        query.push(" ORDER BY created_at DESC");

        let mut orders = query.build_query_as::<Order>().fetch_all(self.pool).await?;

        let ids: Vec<Uuid> = orders.iter().map(|order| order.id.as_uuid()).collect();
        let mut items = self.load_items(&ids).await?;
        for order in &mut orders {
            order.items = items.remove(&order.id).unwrap_or_default();
        }

        Ok(orders)
    }

    /// Get one order by id, items expanded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let order =
            sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        let Some(mut order) = order else {
            return Ok(None);
        };

        order.items = self
            .load_items(&[order.id.as_uuid()])
            .await?
            .remove(&order.id)
            .unwrap_or_default();

        Ok(Some(order))
    }

    /// Persist a validated checkout as one atomic unit.
    ///
    /// Every referenced menu item must exist and be currently available;
    /// otherwise the whole order is rejected and nothing is written. Line
    /// items capture the submitted snapshot prices.
    ///
    /// # Errors
    ///
    /// Returns [`OrderCreateError::Unavailable`] naming the offending menu
    /// item ids, or a repository error.
    pub async fn create(&self, new: NewOrder) -> Result<Order, OrderCreateError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        // Availability check and inserts share the transaction, closing the
        // window between the check and the write.
        let ids: Vec<Uuid> = new
            .items
            .iter()
            .map(|item| item.menu_item_id.as_uuid())
            .collect();
        let menu_items =
            sqlx::query_as::<_, MenuItem>(&format!(
                "SELECT {MENU_COLUMNS} FROM menu_item WHERE id = ANY($1)"
            ))
            .bind(&ids)
            .fetch_all(&mut *tx)
            .await?;
        let by_id: HashMap<MenuItemId, MenuItem> = menu_items
            .into_iter()
            .map(|item| (item.id, item))
            .collect();

        let mut rejected: Vec<MenuItemId> = new
            .items
            .iter()
            .map(|item| item.menu_item_id)
            .filter(|id| !by_id.get(id).is_some_and(|item| item.is_available))
            .collect();
        if !rejected.is_empty() {
            rejected.sort_by_key(MenuItemId::as_uuid);
            rejected.dedup();
            return Err(OrderCreateError::Unavailable(rejected));
        }

        let mut order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders (customer_name, phone, address, notes, total, status) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {ORDER_COLUMNS}"
        ))
        .bind(&new.customer_name)
        .bind(&new.phone)
        .bind(&new.address)
        .bind(&new.notes)
        .bind(new.total)
        .bind(OrderStatus::Pending)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(new.items.len());
        for (position, item) in new.items.iter().enumerate() {
            let (id,): (OrderItemId,) = sqlx::query_as(
                "INSERT INTO order_item (order_id, menu_item_id, quantity, price, position) \
                 VALUES ($1, $2, $3, $4, $5) RETURNING id",
            )
            .bind(order.id)
            .bind(item.menu_item_id)
            .bind(item.quantity)
            .bind(item.price)
            .bind(i32::try_from(position).unwrap_or(i32::MAX))
            .fetch_one(&mut *tx)
            .await?;

            items.push(OrderItem {
                id,
                order_id: order.id,
                menu_item_id: item.menu_item_id,
                quantity: item.quantity,
                price: item.price,
                menu_item: by_id.get(&item.menu_item_id).cloned(),
            });
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        order.items = items;
        Ok(order)
    }

    /// Set an order's status, returning the updated order with items.
    ///
    /// Transition legality is the caller's concern; this is a plain write.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = $2, updated_at = now() WHERE id = $1 \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?;

        let mut order = order.ok_or(RepositoryError::NotFound)?;
        order.items = self
            .load_items(&[order.id.as_uuid()])
            .await?
            .remove(&order.id)
            .unwrap_or_default();

        Ok(order)
    }

    /// Hard-delete an order; line items cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Load the expanded line items for a set of orders, in submission
    /// order. Menu items deleted since the order was placed come back as
    /// `None`.
    async fn load_items(
        &self,
        order_ids: &[Uuid],
    ) -> Result<HashMap<OrderId, Vec<OrderItem>>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT oi.id, oi.order_id, oi.menu_item_id, oi.quantity, oi.price, \
                    mi.id AS mi_id, mi.name AS mi_name, mi.description AS mi_description, \
                    mi.price AS mi_price, mi.image AS mi_image, mi.category AS mi_category, \
                    mi.is_available AS mi_is_available, mi.created_at AS mi_created_at, \
                    mi.updated_at AS mi_updated_at \
             FROM order_item oi \
             LEFT JOIN menu_item mi ON mi.id = oi.menu_item_id \
             WHERE oi.order_id = ANY($1) \
             ORDER BY oi.position",
        )
        .bind(order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            by_order
                .entry(row.order_id)
                .or_default()
                .push(OrderItem::from(row));
        }

        Ok(by_order)
    }
}
