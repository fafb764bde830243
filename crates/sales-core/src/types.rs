//! # Domain Types
//!
//! Core domain types used throughout the sales bonus engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Target      │   │   BonusTier     │   │   FixedBonus    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  sales_person   │   │  metric         │   │  key            │       │
//! │  │  period         │   │  min_rate       │   │  value (Money)  │       │
//! │  │  *_target       │   │  max_rate?      │   │                 │       │
//! │  │  achieved_*     │   │  bonus_rate     │   │                 │       │
//! │  └────────┬────────┘   └────────┬────────┘   └────────┬────────┘       │
//! │           └─────────────────────┼─────────────────────┘                │
//! │                                 ▼                                       │
//! │                      ┌─────────────────────┐                           │
//! │                      │  BonusCalculation   │  (derived, never stored)  │
//! │                      │  total = sales +    │                           │
//! │                      │  collection + fixed │                           │
//! │                      └─────────────────────┘                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Units
//! - Stored money: [`Money`] (integer cents)
//! - Configured rates and bounds: [`Percentage`] (basis points)
//! - Derived rates and bonus amounts: `Decimal` (exact, unrounded)

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Percentage
// =============================================================================

/// A configured percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 8000 bps = 80% (a tier boundary), 400 bps = 4% (a commission rate)
///
/// Integer storage keeps tier boundaries exact in the database and in
/// comparisons; conversion to `Decimal` is lossless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percentage(u32);

impl Percentage {
    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percentage(bps)
    }

    /// Creates a percentage from a whole-number percent (80 → 80%).
    ///
    /// Saturates at `u32::MAX` bps for absurdly large inputs.
    #[inline]
    pub const fn from_percent(pct: u32) -> Self {
        Percentage(pct.saturating_mul(100))
    }

    /// Creates a percentage from a fractional percent (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        Percentage((pct * 100.0).round() as u32)
    }

    /// Returns the value in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the value in percent, exactly (8025 bps → 80.25).
    #[inline]
    pub fn as_decimal(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 2)
    }

    /// Returns the value as a multiplier, exactly (400 bps → 0.04).
    #[inline]
    pub fn as_fraction(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 4)
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percentage(0)
    }

    /// Checks if the percentage is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Percentage::zero()
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_decimal().normalize())
    }
}

// =============================================================================
// Period
// =============================================================================

/// A calendar month over which targets and achievements are measured.
///
/// Textual form is `YYYY-MM` (e.g. `2024-03`), which is also how it is
/// serialized and stored. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Creates a period, validating the month and year range.
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::OutOfRange {
                field: "period month".to_string(),
                min: 1,
                max: 12,
            });
        }

        if !(1900..=9999).contains(&year) {
            return Err(ValidationError::OutOfRange {
                field: "period year".to_string(),
                min: 1900,
                max: 9999,
            });
        }

        Ok(Period { year, month })
    }

    /// The period containing the given instant.
    pub fn containing(at: DateTime<Utc>) -> Self {
        Period {
            year: at.year(),
            month: at.month(),
        }
    }

    /// Calendar year.
    #[inline]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month (1-12).
    #[inline]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// First day of the period.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// The following period (December rolls into January).
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Period {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Period {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidFormat {
            field: "period".to_string(),
            reason: format!("expected YYYY-MM, got '{}'", s),
        };

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Period::new(year, month)
    }
}

impl TryFrom<String> for Period {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

// =============================================================================
// Metric
// =============================================================================

/// Which tier schedule a [`BonusTier`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Tiers applied to the sales achievement rate.
    Sales,
    /// Tiers applied to the collection achievement rate.
    Collection,
}

impl Metric {
    /// Lowercase name as stored in the database.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Metric::Sales => "sales",
            Metric::Collection => "collection",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Target
// =============================================================================

/// A salesperson's goals and actuals for one period.
///
/// One record per `(sales_person_id, period)`. Targets are set at the start
/// of the period; `achieved_*` fields are recorded during and after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Target {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The salesperson this target belongs to (UUID).
    pub sales_person_id: String,

    /// Measurement period.
    #[ts(as = "String")]
    pub period: Period,

    /// Sales goal for the period.
    pub sales_target: Money,

    /// Sales actually closed in the period.
    pub achieved_sales: Money,

    /// Collection goal for the period.
    pub collection_target: Money,

    /// Payments actually collected in the period.
    pub achieved_collection: Money,

    /// Units goal.
    pub unit_target: i64,

    /// Units actually sold.
    pub achieved_units: i64,

    /// New customer goal.
    pub new_customer_target: i64,

    /// New customers actually acquired. Drives the fixed bonus.
    pub achieved_new_customers: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Target {
    /// Creates an empty target record (all figures zero) for a period.
    pub fn new(sales_person_id: impl Into<String>, period: Period) -> Self {
        let now = Utc::now();
        Target {
            id: uuid::Uuid::new_v4().to_string(),
            sales_person_id: sales_person_id.into(),
            period,
            sales_target: Money::zero(),
            achieved_sales: Money::zero(),
            collection_target: Money::zero(),
            achieved_collection: Money::zero(),
            unit_target: 0,
            achieved_units: 0,
            new_customer_target: 0,
            achieved_new_customers: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sales achievement in percent (0 when the sales target is 0).
    pub fn sales_rate(&self) -> Decimal {
        achievement_rate(self.achieved_sales.cents(), self.sales_target.cents())
    }

    /// Collection achievement in percent (0 when the collection target is 0).
    pub fn collection_rate(&self) -> Decimal {
        achievement_rate(
            self.achieved_collection.cents(),
            self.collection_target.cents(),
        )
    }

    /// Unit achievement in percent (0 when the unit target is 0).
    pub fn unit_rate(&self) -> Decimal {
        achievement_rate(self.achieved_units, self.unit_target)
    }

    /// New customer achievement in percent (0 when the target is 0).
    pub fn new_customer_rate(&self) -> Decimal {
        achievement_rate(self.achieved_new_customers, self.new_customer_target)
    }
}

/// Achieved amount divided by target amount, in percent.
///
/// A zero target yields a zero rate instead of a division error. Inputs are
/// integers in a common unit (cents or counts) so the ratio is unit-free.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use sales_core::types::achievement_rate;
///
/// assert_eq!(achievement_rate(90_000, 100_000), Decimal::from(90));
/// assert_eq!(achievement_rate(90_000, 0), Decimal::ZERO);
/// ```
pub fn achievement_rate(achieved: i64, target: i64) -> Decimal {
    if target == 0 {
        return Decimal::ZERO;
    }

    Decimal::from(achieved) * Decimal::ONE_HUNDRED / Decimal::from(target)
}

// =============================================================================
// Bonus Tier
// =============================================================================

/// One band of a piecewise commission schedule.
///
/// The band covers the half-open achievement interval `[min_rate, max_rate)`.
/// `max_rate = None` means the band is unbounded above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BonusTier {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Schedule this band belongs to.
    pub metric: Metric,

    /// Inclusive lower bound of the achievement rate.
    pub min_rate: Percentage,

    /// Exclusive upper bound of the achievement rate, `None` if unbounded.
    pub max_rate: Option<Percentage>,

    /// Commission applied to the achieved amount when the rate falls here.
    pub bonus_rate: Percentage,
}

impl BonusTier {
    /// Creates a tier with a fresh ID.
    pub fn new(
        metric: Metric,
        min_rate: Percentage,
        max_rate: Option<Percentage>,
        bonus_rate: Percentage,
    ) -> Self {
        BonusTier {
            id: uuid::Uuid::new_v4().to_string(),
            metric,
            min_rate,
            max_rate,
            bonus_rate,
        }
    }

    /// Whether `rate` (in percent) lies in `[min_rate, max_rate)`.
    pub fn contains(&self, rate: Decimal) -> bool {
        self.contains_with(rate, false)
    }

    /// Like [`contains`](Self::contains), optionally ignoring `max_rate`.
    pub fn contains_with(&self, rate: Decimal, unbounded_above: bool) -> bool {
        if rate < self.min_rate.as_decimal() {
            return false;
        }

        match self.max_rate {
            Some(max) if !unbounded_above => rate < max.as_decimal(),
            _ => true,
        }
    }
}

// =============================================================================
// Fixed Bonus
// =============================================================================

/// A flat, period-independent bonus amount keyed by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FixedBonus {
    /// Configuration key, e.g. `per_new_customer`.
    pub key: String,

    /// Amount paid per unit of the keyed quantity.
    pub value: Money,

    /// Human-readable label for the settings screen.
    pub description: Option<String>,
}

impl FixedBonus {
    pub fn new(key: impl Into<String>, value: Money) -> Self {
        FixedBonus {
            key: key.into(),
            value,
            description: None,
        }
    }
}

// =============================================================================
// Bonus Calculation
// =============================================================================

/// Breakdown of the bonus owed to one salesperson for one period.
///
/// Derived and transient: it is recomputed from the target and the
/// configuration snapshot whenever needed. All amounts are exact major
/// currency units; callers round for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BonusCalculation {
    /// `sales_bonus + collection_bonus + fixed_bonus`.
    #[ts(type = "string")]
    pub total: Decimal,

    #[ts(type = "string")]
    pub sales_bonus: Decimal,

    #[ts(type = "string")]
    pub collection_bonus: Decimal,

    #[ts(type = "string")]
    pub fixed_bonus: Decimal,

    pub details: BonusDetails,
}

/// Inputs and intermediate values that produced a [`BonusCalculation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BonusDetails {
    /// Sales achievement rate in percent.
    #[ts(type = "string")]
    pub sales_rate: Decimal,

    /// Index of the matched band in the ascending sales schedule, `None` if
    /// the rate is below every band.
    pub sales_tier: Option<usize>,

    /// Commission applied to achieved sales (zero when no band matched).
    pub sales_bonus_rate: Percentage,

    /// Collection achievement rate in percent.
    #[ts(type = "string")]
    pub collection_rate: Decimal,

    /// Index of the matched band in the ascending collection schedule.
    pub collection_tier: Option<usize>,

    /// Commission applied to achieved collection.
    pub collection_bonus_rate: Percentage,

    /// New customers counted towards the fixed bonus.
    pub new_customers: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_conversions() {
        let rate = Percentage::from_bps(825);
        assert_eq!(rate.as_decimal(), Decimal::new(825, 2));
        assert_eq!(rate.as_fraction(), Decimal::new(825, 4));
        assert_eq!(Percentage::from_percent(80).bps(), 8000);
        assert_eq!(Percentage::from_percentage(8.25).bps(), 825);
        assert_eq!(Percentage::from_percent(u32::MAX).bps(), u32::MAX);
        assert_eq!(Percentage::from_bps(400).to_string(), "4%");
    }

    #[test]
    fn test_period_parse_and_display() {
        let period: Period = "2024-03".parse().unwrap();
        assert_eq!(period.year(), 2024);
        assert_eq!(period.month(), 3);
        assert_eq!(period.to_string(), "2024-03");

        assert!("2024-13".parse::<Period>().is_err());
        assert!("2024-3".parse::<Period>().is_err());
        assert!("March".parse::<Period>().is_err());
    }

    #[test]
    fn test_period_next_and_order() {
        let dec = Period::new(2023, 12).unwrap();
        let jan = dec.next();
        assert_eq!(jan, Period::new(2024, 1).unwrap());
        assert!(dec < jan);
        assert_eq!(jan.first_day(), NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn test_period_serde_as_string() {
        let period = Period::new(2024, 7).unwrap();
        let json = serde_json::to_string(&period).unwrap();
        assert_eq!(json, "\"2024-07\"");

        let back: Period = serde_json::from_str(&json).unwrap();
        assert_eq!(back, period);
        assert!(serde_json::from_str::<Period>("\"2024-00\"").is_err());
    }

    #[test]
    fn test_achievement_rate_zero_target() {
        assert_eq!(achievement_rate(5_000, 0), Decimal::ZERO);
        assert_eq!(achievement_rate(0, 0), Decimal::ZERO);
        assert_eq!(achievement_rate(60_000, 50_000), Decimal::from(120));
    }

    #[test]
    fn test_target_rates() {
        let mut target = Target::new("sp", Period::new(2024, 1).unwrap());
        target.unit_target = 40;
        target.achieved_units = 10;
        target.new_customer_target = 4;
        target.achieved_new_customers = 3;

        assert_eq!(target.unit_rate(), Decimal::from(25));
        assert_eq!(target.new_customer_rate(), Decimal::from(75));
        assert_eq!(target.sales_rate(), Decimal::ZERO);
    }

    #[test]
    fn test_tier_contains_half_open() {
        let tier = BonusTier::new(
            Metric::Sales,
            Percentage::from_percent(80),
            Some(Percentage::from_percent(100)),
            Percentage::from_percent(4),
        );

        assert!(tier.contains(Decimal::from(80)));
        assert!(tier.contains(Decimal::new(9999, 2)));
        assert!(!tier.contains(Decimal::from(100)));
        assert!(!tier.contains(Decimal::new(7999, 2)));
        assert!(tier.contains_with(Decimal::from(150), true));
    }

    #[test]
    fn test_calculation_serializes_camel_case() {
        let calc = BonusCalculation {
            total: Decimal::from(1),
            sales_bonus: Decimal::from(1),
            collection_bonus: Decimal::ZERO,
            fixed_bonus: Decimal::ZERO,
            details: BonusDetails {
                sales_rate: Decimal::from(90),
                sales_tier: None,
                sales_bonus_rate: Percentage::zero(),
                collection_rate: Decimal::ZERO,
                collection_tier: Some(0),
                collection_bonus_rate: Percentage::zero(),
                new_customers: 0,
            },
        };

        let json = serde_json::to_value(&calc).unwrap();
        assert!(json.get("salesBonus").is_some());
        assert!(json["details"].get("salesTier").is_some());
        assert!(json["details"]["salesTier"].is_null());
        assert_eq!(json["details"]["collectionTier"], 0);
    }
}
