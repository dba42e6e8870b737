//! The cart store: ordered lines of (menu item snapshot, quantity).
//!
//! Mutations are synchronous, single-threaded, and infallible from the
//! caller's point of view; every mutation rewrites the persisted snapshot
//! through the [`CartStorage`] seam. A persistence failure is logged and the
//! in-memory cart stays intact.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tavola_core::{CartTotals, Category, MenuItemId};

use crate::storage::CartStorage;

/// The menu item details captured when the customer added it to the cart.
///
/// This is a snapshot of the catalog row as fetched; later catalog edits do
/// not follow it. The carried price is what running totals are computed
/// from, and what checkout submits as the per-line price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemSnapshot {
    pub id: MenuItemId,
    pub name: String,
    pub price: Decimal,
    pub category: Category,
    pub image: Option<String>,
    pub is_available: bool,
}

/// One cart line: a snapshot plus a positive quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(rename = "menuItem")]
    pub item: MenuItemSnapshot,
    pub quantity: u32,
}

impl CartLine {
    /// Line total: snapshot price x quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.item.price * Decimal::from(self.quantity)
    }
}

/// Client-resident cart.
///
/// Order of lines reflects insertion order. The persisted snapshot is read
/// once at construction and rewritten after every mutation.
pub struct CartStore<S: CartStorage> {
    lines: Vec<CartLine>,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Create a cart backed by `storage`, restoring any persisted lines.
    ///
    /// An unreadable slot is treated as an empty cart rather than an error,
    /// matching the recover-and-continue behavior customers expect.
    pub fn new(storage: S) -> Self {
        let lines = match storage.load() {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!("failed to restore persisted cart, starting empty: {e}");
                Vec::new()
            }
        };
        Self { lines, storage }
    }

    /// Add one of `item` to the cart.
    ///
    /// An existing line for the same menu item id is incremented by 1;
    /// otherwise a new line with quantity 1 is appended.
    pub fn add(&mut self, item: MenuItemSnapshot) {
        match self.lines.iter_mut().find(|line| line.item.id == item.id) {
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine { item, quantity: 1 }),
        }
        self.persist();
    }

    /// Remove the line for `id`. No-op when absent.
    pub fn remove(&mut self, id: MenuItemId) {
        self.lines.retain(|line| line.item.id != id);
        self.persist();
    }

    /// Set the quantity for `id`.
    ///
    /// A quantity of zero behaves as [`remove`](Self::remove); an absent id
    /// is a no-op. No upper bound is enforced here - the server re-validates
    /// quantities at checkout.
    pub fn set_quantity(&mut self, id: MenuItemId, quantity: u32) {
        if quantity == 0 {
            self.remove(id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|line| line.item.id == id) {
            line.quantity = quantity;
        }
        self.persist();
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.persist();
    }

    /// The cart lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of items (sum of quantities).
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of line totals, from the carried snapshot prices.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Running totals for display.
    #[must_use]
    pub fn totals(&self, delivery_fee: Decimal) -> CartTotals {
        CartTotals::calculate(self.subtotal(), delivery_fee)
    }

    fn persist(&self) {
        if let Err(e) = self.storage.save(&self.lines) {
            tracing::warn!("failed to persist cart: {e}");
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::MenuItemSnapshot;
    use tavola_core::{Category, MenuItemId};

    /// Build an available MAIN_COURSE snapshot with a fresh id.
    #[allow(clippy::unwrap_used)]
    pub fn snapshot(name: &str, price: &str) -> MenuItemSnapshot {
        MenuItemSnapshot {
            id: MenuItemId::generate(),
            name: name.to_owned(),
            price: price.parse().unwrap(),
            category: Category::MainCourse,
            image: None,
            is_available: true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::test_support::snapshot;
    use super::*;
    use crate::storage::MemoryStorage;

    fn cart() -> CartStore<MemoryStorage> {
        CartStore::new(MemoryStorage::new())
    }

    #[test]
    fn test_add_twice_merges_into_one_line() {
        let mut cart = cart();
        let item = snapshot("Chicken Parmesan", "24.99");

        cart.add(item.clone());
        cart.add(item);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn test_add_distinct_items_appends_in_order() {
        let mut cart = cart();
        let first = snapshot("Truffle Mushroom Soup", "12.99");
        let second = snapshot("Crispy Calamari", "14.99");

        cart.add(first.clone());
        cart.add(second.clone());

        assert_eq!(cart.lines()[0].item.id, first.id);
        assert_eq!(cart.lines()[1].item.id, second.id);
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let mut cart = cart();
        cart.add(snapshot("Creme Brulee", "9.99"));

        cart.remove(MenuItemId::generate());

        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = cart();
        let item = snapshot("House Red Wine", "12.99");
        cart.add(item.clone());

        cart.set_quantity(item.id, 0);

        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_absent_id_is_noop() {
        let mut cart = cart();
        cart.set_quantity(MenuItemId::generate(), 5);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_overwrites() {
        let mut cart = cart();
        let item = snapshot("Grilled Ribeye Steak", "42.99");
        cart.add(item.clone());

        cart.set_quantity(item.id, 4);

        assert_eq!(cart.lines()[0].quantity, 4);
        assert_eq!(cart.total_items(), 4);
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut cart = cart();
        cart.add(snapshot("Lobster Thermidor", "58.99"));
        cart.add(snapshot("Chocolate Lava Cake", "10.99"));

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn test_subtotal_uses_snapshot_prices() {
        let mut cart = cart();
        let a = snapshot("Pan-Seared Salmon", "32.99");
        let b = snapshot("Artisan Lemonade", "5.99");
        cart.add(a.clone());
        cart.add(a);
        cart.add(b);

        assert_eq!(cart.subtotal(), "71.97".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_mutations_persist_across_store_instances() {
        let storage = MemoryStorage::new();
        let item = snapshot("Truffle Mushroom Soup", "12.99");

        let mut cart = CartStore::new(&storage);
        cart.add(item.clone());
        cart.add(item.clone());
        drop(cart);

        let restored = CartStore::new(&storage);
        assert_eq!(restored.lines().len(), 1);
        assert_eq!(restored.lines()[0].quantity, 2);
        assert_eq!(restored.lines()[0].item.id, item.id);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let line = CartLine {
            item: snapshot("Crispy Calamari", "14.99"),
            quantity: 2,
        };
        let json = serde_json::to_value(&line).unwrap();

        assert!(json.get("menuItem").is_some());
        assert!(json["menuItem"].get("isAvailable").is_some());
        assert!(json["menuItem"].get("is_available").is_none());
    }
}
