//! Menu item model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tavola_core::{Category, MenuItemId};

/// A sellable dish or drink in the catalog.
///
/// Serializes in the camelCase wire format the storefront consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub category: Category,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
