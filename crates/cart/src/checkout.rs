//! Building the checkout submission.
//!
//! Checkout turns the cart plus the customer's delivery details into the
//! body of `POST /api/orders`. The cart itself is left untouched: callers
//! clear it only after the server accepts the order, so a rejected checkout
//! can be retried without re-entering items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tavola_core::MenuItemId;

use crate::storage::CartStorage;
use crate::store::CartStore;

/// Customer-entered delivery details.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One submitted line: the menu item reference, quantity, and snapshot price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
    pub price: Decimal,
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<CheckoutItem>,
    pub total: Decimal,
}

/// Errors building a checkout submission.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// Checkout of an empty cart is meaningless.
    #[error("cart is empty")]
    EmptyCart,
}

impl CheckoutRequest {
    /// Build the submission from the current cart contents.
    ///
    /// The per-line prices are the cart's snapshot prices and the total is
    /// computed by the shared totals calculator, so the server's
    /// total-consistency check accepts exactly what honest clients send.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] when the cart has no lines.
    pub fn from_cart<S: CartStorage>(
        cart: &CartStore<S>,
        details: CustomerDetails,
        delivery_fee: Decimal,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let items = cart
            .lines()
            .iter()
            .map(|line| CheckoutItem {
                menu_item_id: line.item.id,
                quantity: line.quantity,
                price: line.item.price,
            })
            .collect();

        let totals = cart.totals(delivery_fee);

        Ok(Self {
            customer_name: details.customer_name,
            phone: details.phone,
            address: details.address,
            notes: details.notes,
            items,
            total: totals.total,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::store::test_support::snapshot;

    fn details() -> CustomerDetails {
        CustomerDetails {
            customer_name: "Ada Lovelace".to_owned(),
            phone: "+1 555 0100".to_owned(),
            address: "12 Analytical Way".to_owned(),
            notes: None,
        }
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let cart = CartStore::new(MemoryStorage::new());
        let result = CheckoutRequest::from_cart(&cart, details(), Decimal::ZERO);
        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[test]
    fn test_request_carries_snapshot_prices_and_computed_total() {
        let mut cart = CartStore::new(MemoryStorage::new());
        let a = snapshot("Grilled Ribeye Steak", "42.99");
        let b = snapshot("Artisan Lemonade", "5.99");
        cart.add(a.clone());
        cart.add(b.clone());
        cart.add(b.clone());

        let request = CheckoutRequest::from_cart(&cart, details(), Decimal::ZERO).unwrap();

        assert_eq!(request.items.len(), 2);
        assert_eq!(request.items[0].menu_item_id, a.id);
        assert_eq!(request.items[0].quantity, 1);
        assert_eq!(request.items[0].price, a.price);
        assert_eq!(request.items[1].quantity, 2);

        // subtotal 54.97, tax 5.497, free delivery
        assert_eq!(request.total, "60.467".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_building_request_leaves_cart_untouched() {
        let mut cart = CartStore::new(MemoryStorage::new());
        cart.add(snapshot("Pan-Seared Salmon", "32.99"));

        let _ = CheckoutRequest::from_cart(&cart, details(), Decimal::ZERO).unwrap();

        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_wire_format_matches_order_api() {
        let mut cart = CartStore::new(MemoryStorage::new());
        cart.add(snapshot("Chicken Parmesan", "24.99"));

        let request = CheckoutRequest::from_cart(&cart, details(), Decimal::ZERO).unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert!(json.get("customerName").is_some());
        assert!(json["items"][0].get("menuItemId").is_some());
        assert!(json.get("notes").is_none());
    }
}
