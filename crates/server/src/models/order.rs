//! Order and line-item models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tavola_core::{MenuItemId, OrderId, OrderItemId, OrderStatus};

use super::menu_item::MenuItem;

/// A customer's persisted purchase request.
///
/// Created exactly once at checkout; only the status changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub notes: Option<String>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Line items, hydrated separately from the `order_item` table.
    #[sqlx(skip)]
    pub items: Vec<OrderItem>,
}

/// A quantity of one menu item captured at a fixed price within an order.
///
/// `menu_item_id` is a snapshot reference: the expanded `menu_item` is
/// `None` when the catalog row has since been deleted, and `price` stays
/// immune to later catalog edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub menu_item_id: MenuItemId,
    pub quantity: i32,
    pub price: Decimal,
    pub menu_item: Option<MenuItem>,
}
