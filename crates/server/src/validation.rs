//! Request payload validation.
//!
//! Every mutating payload is checked field by field before any storage
//! access; failures carry the offending field names so callers can surface
//! inline form errors. Bounds mirror the published API contract: names up to
//! 100 characters, descriptions 500, addresses 500, notes 1000, prices
//! positive and at most 10000, order quantities 1-100.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tavola_core::{CartTotals, Category, Email, MenuItemId, round_for_display};

/// Loose phone-number shape: digits with optional leading `+` and common
/// separators. Length bounds are checked separately.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s().-]+$").expect("Invalid regex"));

const MAX_MENU_PRICE: u32 = 10_000;
const MAX_ORDER_ITEM_QUANTITY: u32 = 100;

/// Validation failures keyed by field name.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_owned()).or_default().push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return `value` when no failures were recorded, otherwise `self`.
    ///
    /// # Errors
    ///
    /// Returns the accumulated field errors.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }

    /// Fields that failed, for assertions and logging.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }
}

fn check_length(errors: &mut FieldErrors, field: &str, value: &str, min: usize, max: usize) {
    let len = value.chars().count();
    if len < min {
        errors.push(field, format!("{field} is required"));
    } else if len > max {
        errors.push(field, format!("{field} must be at most {max} characters"));
    }
}

fn check_price(errors: &mut FieldErrors, field: &str, price: Decimal) {
    if price <= Decimal::ZERO {
        errors.push(field, "price must be positive");
    } else if price > Decimal::from(MAX_MENU_PRICE) {
        errors.push(field, "price too high");
    }
}

fn check_image_url(errors: &mut FieldErrors, image: Option<&str>) {
    if let Some(image) = image
        && url::Url::parse(image).is_err()
    {
        errors.push("image", "invalid image URL");
    }
}

// =============================================================================
// Menu items
// =============================================================================

/// Body of `POST /api/menu`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuItemPayload {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    pub category: Category,
    #[serde(default)]
    pub is_available: Option<bool>,
}

/// A validated new catalog row.
#[derive(Debug, Clone)]
pub struct NewMenuItem {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub category: Category,
    pub is_available: bool,
}

impl CreateMenuItemPayload {
    /// Validate the payload.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] naming every failed field.
    pub fn validate(self) -> Result<NewMenuItem, FieldErrors> {
        let mut errors = FieldErrors::new();

        check_length(&mut errors, "name", &self.name, 1, 100);
        check_length(&mut errors, "description", &self.description, 1, 500);
        check_price(&mut errors, "price", self.price);
        check_image_url(&mut errors, self.image.as_deref());

        errors.into_result(NewMenuItem {
            name: self.name,
            description: self.description,
            price: self.price,
            image: self.image,
            category: self.category,
            is_available: self.is_available.unwrap_or(true),
        })
    }
}

/// Body of `PUT /api/menu/{id}`: all fields optional, unspecified fields
/// keep their previous values. `image` distinguishes absent (keep) from
/// explicit `null` (clear).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuItemPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    #[serde(default, with = "double_option")]
    pub image: Option<Option<String>>,
    pub category: Option<Category>,
    pub is_available: Option<bool>,
}

/// Validated partial update.
#[derive(Debug, Clone, Default)]
pub struct MenuItemChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image: Option<Option<String>>,
    pub category: Option<Category>,
    pub is_available: Option<bool>,
}

impl UpdateMenuItemPayload {
    /// Validate the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] naming every failed field.
    pub fn validate(self) -> Result<MenuItemChanges, FieldErrors> {
        let mut errors = FieldErrors::new();

        if let Some(name) = &self.name {
            check_length(&mut errors, "name", name, 1, 100);
        }
        if let Some(description) = &self.description {
            check_length(&mut errors, "description", description, 1, 500);
        }
        if let Some(price) = self.price {
            check_price(&mut errors, "price", price);
        }
        if let Some(Some(image)) = &self.image {
            check_image_url(&mut errors, Some(image));
        }

        errors.into_result(MenuItemChanges {
            name: self.name,
            description: self.description,
            price: self.price,
            image: self.image,
            category: self.category,
            is_available: self.is_available,
        })
    }
}

/// Serde helper keeping `"image": null` distinguishable from an absent key.
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer).map(Some)
    }
}

// =============================================================================
// Orders
// =============================================================================

/// One submitted line item of `POST /api/orders`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
    pub price: Decimal,
}

/// Body of `POST /api/orders`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItemPayload>,
    pub total: Decimal,
}

/// A validated, internally consistent order submission.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub notes: Option<String>,
    pub items: Vec<NewOrderItem>,
    pub total: Decimal,
}

/// A validated line item.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub menu_item_id: MenuItemId,
    pub quantity: i32,
    pub price: Decimal,
}

impl CreateOrderPayload {
    /// Validate the payload, including the total-consistency invariant:
    /// the submitted total must equal the recomputed
    /// subtotal + tax + delivery after rounding both to 2 decimal places.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] naming every failed field.
    pub fn validate(self, delivery_fee: Decimal) -> Result<NewOrder, FieldErrors> {
        let mut errors = FieldErrors::new();

        check_length(&mut errors, "customerName", &self.customer_name, 1, 100);
        check_length(&mut errors, "phone", &self.phone, 5, 20);
        if !self.phone.is_empty() && !PHONE_RE.is_match(&self.phone) {
            errors.push("phone", "phone is not a valid phone number");
        }
        check_length(&mut errors, "address", &self.address, 5, 500);
        if let Some(notes) = &self.notes
            && notes.chars().count() > 1000
        {
            errors.push("notes", "notes must be at most 1000 characters");
        }

        if self.items.is_empty() {
            errors.push("items", "at least one item is required");
        }
        let mut items = Vec::with_capacity(self.items.len());
        for item in &self.items {
            if item.quantity == 0 {
                errors.push("items", "quantity must be positive");
            } else if item.quantity > MAX_ORDER_ITEM_QUANTITY {
                errors.push("items", "quantity too high");
            }
            if item.price <= Decimal::ZERO {
                errors.push("items", "price must be positive");
            }
            items.push(NewOrderItem {
                menu_item_id: item.menu_item_id,
                quantity: i32::try_from(item.quantity).unwrap_or(i32::MAX),
                price: item.price,
            });
        }

        if self.total <= Decimal::ZERO {
            errors.push("total", "total must be positive");
        } else if errors.is_empty() {
            // Only check consistency once the parts themselves are sane.
            let subtotal: Decimal = self
                .items
                .iter()
                .map(|item| item.price * Decimal::from(item.quantity))
                .sum();
            let expected = CartTotals::calculate(subtotal, delivery_fee).total;
            if round_for_display(expected) != round_for_display(self.total) {
                errors.push("total", "total does not match the submitted items");
            }
        }

        errors.into_result(NewOrder {
            customer_name: self.customer_name,
            phone: self.phone,
            address: self.address,
            notes: self.notes,
            items,
            total: self.total,
        })
    }
}

// =============================================================================
// Admin session
// =============================================================================

/// Body of `POST /api/admin/login`.
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// Validated login credentials.
#[derive(Debug)]
pub struct LoginCredentials {
    pub email: Email,
    pub password: String,
}

impl LoginPayload {
    /// Validate the payload.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] naming every failed field.
    pub fn validate(self) -> Result<LoginCredentials, FieldErrors> {
        let mut errors = FieldErrors::new();

        let email = match Email::parse(&self.email) {
            Ok(email) => Some(email),
            Err(e) => {
                errors.push("email", e.to_string());
                None
            }
        };
        if self.password.is_empty() {
            errors.push("password", "password is required");
        }

        match email {
            Some(email) if errors.is_empty() => Ok(LoginCredentials {
                email,
                password: self.password,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn order_payload() -> CreateOrderPayload {
        // 2x $12.99 + 1x $5.99 -> subtotal $31.97, tax $3.197, total $35.167
        CreateOrderPayload {
            customer_name: "Ada Lovelace".to_owned(),
            phone: "+1 (555) 010-0123".to_owned(),
            address: "12 Analytical Way, Londontown".to_owned(),
            notes: None,
            items: vec![
                OrderItemPayload {
                    menu_item_id: MenuItemId::generate(),
                    quantity: 2,
                    price: dec("12.99"),
                },
                OrderItemPayload {
                    menu_item_id: MenuItemId::generate(),
                    quantity: 1,
                    price: dec("5.99"),
                },
            ],
            total: dec("35.167"),
        }
    }

    #[test]
    fn test_valid_order_passes() {
        let order = order_payload().validate(Decimal::ZERO).unwrap();
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.total, dec("35.167"));
    }

    #[test]
    fn test_order_accepts_rounded_total() {
        let mut payload = order_payload();
        payload.total = dec("35.17");
        assert!(payload.validate(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_order_rejects_mismatched_total() {
        let mut payload = order_payload();
        payload.total = dec("20.00");
        let errors = payload.validate(Decimal::ZERO).unwrap_err();
        assert_eq!(errors.fields(), vec!["total"]);
    }

    #[test]
    fn test_order_rejects_empty_items() {
        let mut payload = order_payload();
        payload.items.clear();
        let errors = payload.validate(Decimal::ZERO).unwrap_err();
        assert!(errors.fields().contains(&"items"));
    }

    #[test]
    fn test_order_rejects_zero_and_excessive_quantity() {
        let mut payload = order_payload();
        payload.items[0].quantity = 0;
        assert!(payload.validate(Decimal::ZERO).is_err());

        let mut payload = order_payload();
        payload.items[0].quantity = 101;
        assert!(payload.validate(Decimal::ZERO).is_err());
    }

    #[test]
    fn test_order_rejects_bad_phone() {
        let mut payload = order_payload();
        payload.phone = "call me maybe".to_owned();
        let errors = payload.validate(Decimal::ZERO).unwrap_err();
        assert!(errors.fields().contains(&"phone"));
    }

    #[test]
    fn test_order_rejects_oversized_fields() {
        let mut payload = order_payload();
        payload.customer_name = "x".repeat(101);
        payload.notes = Some("x".repeat(1001));
        let errors = payload.validate(Decimal::ZERO).unwrap_err();
        assert!(errors.fields().contains(&"customerName"));
        assert!(errors.fields().contains(&"notes"));
    }

    #[test]
    fn test_order_applies_delivery_fee_below_threshold() {
        // 1x $5.99 -> subtotal 5.99, tax 0.599, delivery 4.99
        let payload = CreateOrderPayload {
            items: vec![OrderItemPayload {
                menu_item_id: MenuItemId::generate(),
                quantity: 1,
                price: dec("5.99"),
            }],
            total: dec("11.58"),
            ..order_payload()
        };
        assert!(payload.validate(dec("4.99")).is_ok());
    }

    #[test]
    fn test_menu_item_valid() {
        let payload = CreateMenuItemPayload {
            name: "Truffle Mushroom Soup".to_owned(),
            description: "Creamy wild mushroom soup with truffle oil".to_owned(),
            price: dec("12.99"),
            image: Some("https://images.example.com/soup.jpg".to_owned()),
            category: Category::Appetizer,
            is_available: None,
        };
        let item = payload.validate().unwrap();
        assert!(item.is_available);
    }

    #[test]
    fn test_menu_item_rejects_bad_fields() {
        let payload = CreateMenuItemPayload {
            name: String::new(),
            description: "ok".to_owned(),
            price: dec("10001"),
            image: Some("not a url".to_owned()),
            category: Category::Dessert,
            is_available: Some(false),
        };
        let errors = payload.validate().unwrap_err();
        assert_eq!(errors.fields(), vec!["image", "name", "price"]);
    }

    #[test]
    fn test_menu_update_distinguishes_absent_from_null_image() {
        let absent: UpdateMenuItemPayload = serde_json::from_str(r#"{"name":"New"}"#).unwrap();
        assert!(absent.image.is_none());

        let cleared: UpdateMenuItemPayload = serde_json::from_str(r#"{"image":null}"#).unwrap();
        assert_eq!(cleared.image, Some(None));

        let replaced: UpdateMenuItemPayload =
            serde_json::from_str(r#"{"image":"https://images.example.com/new.jpg"}"#).unwrap();
        assert_eq!(
            replaced.image,
            Some(Some("https://images.example.com/new.jpg".to_owned()))
        );
    }

    #[test]
    fn test_login_rejects_malformed_email() {
        let payload = LoginPayload {
            email: "not-an-email".to_owned(),
            password: "hunter2!".to_owned(),
        };
        let errors = payload.validate().unwrap_err();
        assert_eq!(errors.fields(), vec!["email"]);
    }

    #[test]
    fn test_login_rejects_empty_password() {
        let payload = LoginPayload {
            email: "staff@tavola.example".to_owned(),
            password: String::new(),
        };
        let errors = payload.validate().unwrap_err();
        assert_eq!(errors.fields(), vec!["password"]);
    }
}
