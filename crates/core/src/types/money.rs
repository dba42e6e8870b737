//! Money arithmetic for carts and orders.
//!
//! All amounts are [`rust_decimal::Decimal`] - binary floating point never
//! touches a price. Stored and compared values keep full precision; rounding
//! to two decimal places happens only at presentation time via
//! [`round_for_display`] / [`format_price`].

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Tax rate applied to every order subtotal (10%).
#[must_use]
pub fn tax_rate() -> Decimal {
    Decimal::new(10, 2)
}

/// Subtotal at or above which delivery is free ($25.00).
#[must_use]
pub fn free_delivery_threshold() -> Decimal {
    Decimal::new(25, 0)
}

/// Totals computed from a cart or order subtotal.
///
/// Produced by [`CartTotals::calculate`]; the same subtotal always yields
/// the same totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Sum of line-item price x quantity.
    pub subtotal: Decimal,
    /// `subtotal` x the fixed tax rate.
    pub tax: Decimal,
    /// Flat delivery fee, waived at the free-delivery threshold.
    pub delivery: Decimal,
    /// `subtotal + tax + delivery`.
    pub total: Decimal,
}

impl CartTotals {
    /// Compute totals for a subtotal.
    ///
    /// `delivery_fee` is the configured flat fee charged below the
    /// free-delivery threshold; the observed configuration ships with 0.
    #[must_use]
    pub fn calculate(subtotal: Decimal, delivery_fee: Decimal) -> Self {
        let tax = subtotal * tax_rate();
        let delivery = if subtotal >= free_delivery_threshold() {
            Decimal::ZERO
        } else {
            delivery_fee
        };
        let total = subtotal + tax + delivery;

        Self {
            subtotal,
            tax,
            delivery,
            total,
        }
    }
}

/// Whether a subtotal qualifies for free delivery.
#[must_use]
pub fn qualifies_for_free_delivery(subtotal: Decimal) -> bool {
    subtotal >= free_delivery_threshold()
}

/// Amount still needed to reach free delivery (zero once qualified).
#[must_use]
pub fn remaining_for_free_delivery(subtotal: Decimal) -> Decimal {
    (free_delivery_threshold() - subtotal).max(Decimal::ZERO)
}

/// Round an amount to two decimal places for presentation or comparison.
///
/// Midpoints round away from zero ($0.005 displays as $0.01).
#[must_use]
pub fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount for display, e.g. `$19.99`.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    format!("${:.2}", round_for_display(amount))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_totals_formula() {
        let totals = CartTotals::calculate(dec("40"), Decimal::ZERO);
        assert_eq!(totals.subtotal, dec("40"));
        assert_eq!(totals.tax, dec("4.0"));
        assert_eq!(totals.delivery, Decimal::ZERO);
        assert_eq!(totals.total, dec("44.0"));
    }

    #[test]
    fn test_totals_idempotent() {
        let subtotal = dec("17.43");
        let first = CartTotals::calculate(subtotal, dec("3.50"));
        let second = CartTotals::calculate(subtotal, dec("3.50"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_delivery_fee_below_threshold() {
        let totals = CartTotals::calculate(dec("24.99"), dec("4.99"));
        assert_eq!(totals.delivery, dec("4.99"));
        assert_eq!(totals.total, dec("24.99") + dec("2.4990") + dec("4.99"));
    }

    #[test]
    fn test_free_delivery_at_threshold() {
        let totals = CartTotals::calculate(dec("25.00"), dec("4.99"));
        assert_eq!(totals.delivery, Decimal::ZERO);
    }

    #[test]
    fn test_zero_subtotal() {
        let totals = CartTotals::calculate(Decimal::ZERO, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn test_spec_scenario() {
        // 2x $12.99 + 1x $5.99
        let subtotal = dec("12.99") * dec("2") + dec("5.99");
        assert_eq!(subtotal, dec("31.97"));

        let totals = CartTotals::calculate(subtotal, Decimal::ZERO);
        assert_eq!(totals.tax, dec("3.1970"));
        assert_eq!(totals.delivery, Decimal::ZERO);
        assert_eq!(totals.total, dec("35.167"));
        assert_eq!(format_price(totals.total), "$35.17");
    }

    #[test]
    fn test_remaining_for_free_delivery() {
        assert_eq!(remaining_for_free_delivery(dec("20")), dec("5"));
        assert_eq!(remaining_for_free_delivery(dec("30")), Decimal::ZERO);
        assert!(qualifies_for_free_delivery(dec("25")));
        assert!(!qualifies_for_free_delivery(dec("24.99")));
    }

    #[test]
    fn test_round_for_display_midpoint() {
        assert_eq!(round_for_display(dec("35.167")), dec("35.17"));
        assert_eq!(round_for_display(dec("1.005")), dec("1.01"));
    }

    #[test]
    fn test_format_price_pads_zeroes() {
        assert_eq!(format_price(dec("5")), "$5.00");
        assert_eq!(format_price(dec("12.9")), "$12.90");
    }
}
