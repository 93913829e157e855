//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing line profits as floats:                                        │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ profit report drifts             │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Stored, summed and multiplied as i64 cents.                          │
//! │    sum(line_profit) == sum(unit_profit × quantity) exactly.             │
//! │                                                                         │
//! │  Floats only exist on the wire (see [`decimal`]), converted once.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mercado_core::money::Money;
//!
//! let unit_profit = Money::from_cents(300); // R$3.00
//! let line_profit = unit_profit.checked_mul_quantity(2);
//! assert_eq!(line_profit, Some(Money::from_cents(600)));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (centavos).
///
/// ## Design Decisions
/// - **i64 (signed)**: unit profit can be negative (selling below cost)
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serde**: serializes as raw cents; use [`decimal`] for the HTTP wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use mercado_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // R$10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (reais) portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity, or `None` if the product does not
    /// fit in i64 cents.
    ///
    /// ## User Workflow
    /// ```text
    /// Sale line: unit profit R$3.00, quantity 2
    ///      │
    ///      ▼
    /// checked_mul_quantity(2) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line profit: R$6.00 (server-computed, caller value ignored)
    /// ```
    ///
    /// ```rust
    /// use mercado_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(i64::MAX).checked_mul_quantity(2), None);
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Decimal major units, for the wire and for display.
    #[inline]
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money as `R$10.99`. Debugging and logs only.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}R${}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
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
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Wire Format
// =============================================================================

/// Serde adapters carrying `Money` as a decimal number of major units.
///
/// The store's clients send and expect amounts like `10.5`. Conversion
/// happens exactly once, here, rounding half away from zero to the cent.
///
/// ```rust
/// use mercado_core::money::{decimal, Money};
///
/// assert_eq!(decimal::to_money(10.5), Some(Money::from_cents(1050)));
/// assert_eq!(decimal::to_money(0.1 + 0.2), Some(Money::from_cents(30)));
/// assert_eq!(decimal::to_money(f64::NAN), None);
/// ```
pub mod decimal {
    use super::Money;
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Largest magnitude accepted from the wire (keeps `× 100` exact in f64).
    const MAX_MAJOR: f64 = 1e13;

    /// Converts decimal major units to Money, rejecting non-finite and
    /// out-of-range values.
    pub fn to_money(value: f64) -> Option<Money> {
        if !value.is_finite() || value.abs() > MAX_MAJOR {
            return None;
        }
        Some(Money::from_cents((value * 100.0).round() as i64))
    }

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(money.as_decimal())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let value = f64::deserialize(deserializer)?;
        to_money(value).ok_or_else(|| de::Error::custom("amount must be a finite number"))
    }

    /// Same adapter for optional amounts (`null` or absent → `None`).
    ///
    /// Pair with `#[serde(default)]` so an absent key deserializes.
    pub mod option {
        use super::super::Money;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            money: &Option<Money>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match money {
                Some(m) => serializer.serialize_some(&m.as_decimal()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Money>, D::Error> {
            match Option::<f64>::deserialize(deserializer)? {
                Some(value) => super::to_money(value)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom("amount must be a finite number")),
                None => Ok(None),
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
