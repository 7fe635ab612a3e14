//! # Money Module
//!
//! Provides the `Money` type used for prices, order totals and shipping
//! costs.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Floating point:   0.1 + 0.2 = 0.30000000000000004                     │
//! │                                                                         │
//! │  Storage:          every amount column is INTEGER and ends in _cents   │
//! │                    products.unit_price_cents      1250  → 12.50        │
//! │                    orders.total_amount_cents      3700  → 37.00        │
//! │                    shipping_rates.cost_cents       590  →  5.90        │
//! │                                                                         │
//! │  Money wraps those integers so sums and line totals stay exact         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use digicheese_core::money::Money;
//!
//! let comte = Money::from_cents(1250);
//! let line_total = comte.multiply_quantity(3);
//! let with_shipping = line_total + Money::from_cents(590);
//!
//! assert_eq!(with_shipping.to_string(), "43.40");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in euro cents.
///
/// Serializes as a bare integer, the same shape as the `*_cents` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from euros and cents.
    ///
    /// ## Example
    /// ```rust
    /// use digicheese_core::money::Money;
    ///
    /// assert_eq!(Money::from_euros(12, 50).cents(), 1250);
    /// assert_eq!(Money::from_euros(-3, 20).cents(), -320);
    /// ```
    #[inline]
    pub const fn from_euros(euros: i64, cents: i64) -> Self {
        if euros < 0 {
            Money(euros * 100 - cents)
        } else {
            Money(euros * 100 + cents)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-euro part (truncated toward zero).
    #[inline]
    pub const fn euros(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cent part, always 0-99.
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a line quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Product: Comté 18 mois   12.50
    /// Quantity: 3
    ///      │
    ///      ▼
    /// multiply_quantity(3) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// OrderItemWithProduct.line_total_cents = 3750
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Addition that returns `None` instead of overflowing.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Sums amounts, or `None` if the total overflows.
    ///
    /// ## Example
    /// ```rust
    /// use digicheese_core::money::Money;
    ///
    /// let lines = [Money::from_cents(4980), Money::from_cents(1890)];
    /// assert_eq!(Money::checked_sum(lines), Some(Money::from_cents(6870)));
    ///
    /// let huge = [Money::from_cents(i64::MAX), Money::from_cents(1)];
    /// assert_eq!(Money::checked_sum(huge), None);
    /// ```
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Money> {
        amounts
            .into_iter()
            .try_fold(Money::zero(), Money::checked_add)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Formats as `12.50` (no currency symbol, dot separator).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.euros().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<i64> for Money {
    fn from(cents: i64) -> Self {
        Money(cents)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.euros(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1250).to_string(), "12.50");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(250);

        assert_eq!((a + b).cents(), 1250);
        assert_eq!((a - b).cents(), 750);
        assert_eq!((a * 3).cents(), 3000);

        let mut total = Money::zero();
        total += a;
        total += b;
        assert_eq!(total.cents(), 1250);
    }

    #[test]
    fn test_sum_of_line_totals() {
        let lines = [(1250, 2), (890, 1), (450, 4)];
        let total: Money = lines
            .iter()
            .map(|&(price, qty)| Money::from_cents(price).multiply_quantity(qty))
            .sum();
        assert_eq!(total.cents(), 2500 + 890 + 1800);
    }

    #[test]
    fn test_checked_operations() {
        let price = Money::from_cents(2490);
        assert_eq!(price.checked_add(Money::from_cents(10)), Some(Money::from_cents(2500)));

        let max_lines = [Money::from_cents(i64::MAX / 2), Money::from_cents(i64::MAX / 2)];
        assert!(Money::checked_sum(max_lines).is_some());
        let overflowing = [Money::from_cents(5_000_000_000_000_000_000), Money::from_cents(5_000_000_000_000_000_000)];
        assert_eq!(Money::checked_sum(overflowing), None);
        assert_eq!(Money::checked_sum(Vec::new()), Some(Money::zero()));
    }

    #[test]
    fn test_serializes_as_plain_integer() {
        let json = serde_json::to_string(&Money::from_cents(590)).unwrap();
        assert_eq!(json, "590");
        let back: Money = serde_json::from_str("590").unwrap();
        assert_eq!(back, Money::from_cents(590));
    }
}
