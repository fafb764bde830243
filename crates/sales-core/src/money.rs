//! # Money Module
//!
//! Provides the `Money` type for stored monetary values (targets, achieved
//! figures, fixed bonus amounts).
//!
//! ## Integer Storage, Exact Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  STORED FIGURES                       DERIVED FIGURES                   │
//! │                                                                         │
//! │  sales_target      Money (cents)      sales_rate     Decimal (%)        │
//! │  achieved_sales    Money (cents) ──►  sales_bonus    Decimal (major)    │
//! │  per_new_customer  Money (cents)      fixed_bonus    Decimal (major)    │
//! │                                                                         │
//! │  Integer cents never drift.           Decimal is exact: no rounding     │
//! │                                       until the caller asks for cents.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sales_core::money::Money;
//!
//! let achieved = Money::from_major_minor(90_000, 0); // $90,000.00
//! assert_eq!(achieved.cents(), 9_000_000);
//! assert_eq!(achieved.to_decimal().to_string(), "90000.00");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: Validation rejects negatives for targets; the type
///   itself stays signed so differences (target - achieved) are expressible
/// - **Single field tuple struct**: Zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use sales_core::money::Money;
    ///
    /// let fee = Money::from_cents(50_000); // Represents $500.00
    /// assert_eq!(fee.cents(), 50_000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -$5.50, not -$4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
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

    /// Returns the exact value in major units as a `Decimal`.
    ///
    /// ## Example
    /// ```rust
    /// use sales_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.to_decimal().to_string(), "10.99");
    /// ```
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Adds two amounts, `None` on `i64` overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Converts a major-unit decimal into cents using Bankers Rounding.
    ///
    /// ## Bankers Rounding (Round Half to Even)
    /// ```text
    /// 10.005 → 10.00   (0 is even)
    /// 10.015 → 10.02   (2 is even)
    /// 10.0151 → 10.02  (not a tie, nearest)
    /// ```
    /// Used only at the edges (export, display). Bonus arithmetic itself is
    /// never rounded.
    ///
    /// ## Errors
    /// `CoreError::AmountOverflow` when the rounded value exceeds `i64` cents.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use sales_core::money::Money;
    ///
    /// let bonus = Decimal::new(10005, 3); // 10.005
    /// assert_eq!(Money::from_decimal_rounded(bonus).unwrap().cents(), 1000);
    /// ```
    pub fn from_decimal_rounded(amount: Decimal) -> CoreResult<Money> {
        let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
        rounded.rescale(2);

        i64::try_from(rounded.mantissa())
            .map(Money)
            .map_err(|_| CoreError::AmountOverflow {
                amount: amount.to_string(),
            })
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and the text report. The dashboard formats its own
/// values to handle localization.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summing team figures (`targets.iter().map(|t| t.achieved_sales).sum()`).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
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
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_to_decimal_is_exact() {
        assert_eq!(Money::from_cents(1).to_decimal(), Decimal::new(1, 2));
        assert_eq!(
            Money::from_major_minor(90_000, 0).to_decimal(),
            Decimal::from(90_000)
        );
    }

    #[test]
    fn test_from_decimal_rounded_uses_bankers_rounding() {
        let half_down = Money::from_decimal_rounded(Decimal::new(10005, 3)).unwrap();
        assert_eq!(half_down.cents(), 1000);

        let half_up = Money::from_decimal_rounded(Decimal::new(10015, 3)).unwrap();
        assert_eq!(half_up.cents(), 1002);

        let whole = Money::from_decimal_rounded(Decimal::from(3600)).unwrap();
        assert_eq!(whole.cents(), 360_000);
    }

    #[test]
    fn test_from_decimal_rounded_overflow() {
        let huge = Decimal::from(i64::MAX);
        assert!(matches!(
            Money::from_decimal_rounded(huge),
            Err(CoreError::AmountOverflow { .. })
        ));
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        assert_eq!(a.checked_add(b), Some(Money::from_cents(1500)));
        assert_eq!(Money::from_cents(i64::MAX).checked_add(b), None);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }
}
