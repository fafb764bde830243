//! # Bonus Calculator
//!
//! Converts one salesperson's period achievements plus the organization's
//! tier / fixed-bonus configuration into a [`BonusCalculation`].
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        compute_bonus()                                  │
//! │                                                                         │
//! │  Target                         BonusConfig (snapshot)                  │
//! │  ├── achieved_sales ─┐          ├── sales_tiers      (asc min_rate)     │
//! │  ├── sales_target ───┼─► rate ─►│   find_tier ──► bonus_rate            │
//! │  │                   │          │                                       │
//! │  ├── achieved_coll ──┐          ├── collection_tiers (asc min_rate)     │
//! │  ├── coll_target ────┼─► rate ─►│   find_tier ──► bonus_rate            │
//! │  │                              │                                       │
//! │  └── new_customers ────────────►└── fixed["per_new_customer"]           │
//! │                                                                         │
//! │  sales_bonus      = achieved_sales      × sales bonus_rate              │
//! │  collection_bonus = achieved_collection × collection bonus_rate         │
//! │  fixed_bonus      = new_customers       × per_new_customer              │
//! │  total            = sum of the three                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tier Boundaries
//! Bands are half-open `[min_rate, max_rate)`. The last band of a schedule
//! (highest `min_rate`) is open-ended regardless of its `max_rate`, so an
//! over-achievement never falls off the top. A rate below the first band
//! matches nothing and earns no tier bonus. When bands overlap, the first
//! band in ascending `min_rate` order wins.
//!
//! A zero target has no achievement to measure: its rate is 0 and it
//! matches no band, so it earns no tier bonus whatever was achieved.
//!
//! ## Example
//! ```rust
//! use sales_core::bonus::{compute_bonus, BonusConfig};
//! use sales_core::money::Money;
//! use sales_core::types::{BonusTier, FixedBonus, Metric, Percentage, Period, Target};
//! use rust_decimal::Decimal;
//!
//! let config = BonusConfig::new(
//!     vec![
//!         BonusTier::new(Metric::Sales, Percentage::from_percent(0), Some(Percentage::from_percent(100)), Percentage::from_percent(4)),
//!     ],
//!     vec![FixedBonus::new("per_new_customer", Money::from_major_minor(500, 0))],
//! );
//!
//! let mut target = Target::new("550e8400-e29b-41d4-a716-446655440000", Period::new(2024, 1).unwrap());
//! target.sales_target = Money::from_major_minor(100_000, 0);
//! target.achieved_sales = Money::from_major_minor(90_000, 0);
//! target.achieved_new_customers = 3;
//!
//! let calc = compute_bonus(&target, &config).unwrap();
//! assert_eq!(calc.sales_bonus, Decimal::from(3600));
//! assert_eq!(calc.fixed_bonus, Decimal::from(1500));
//! assert_eq!(calc.total, Decimal::from(5100));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, trace};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{BonusCalculation, BonusDetails, BonusTier, FixedBonus, Metric, Percentage, Target};
use crate::validation::validate_target;
use crate::PER_NEW_CUSTOMER_KEY;

// =============================================================================
// Configuration Snapshot
// =============================================================================

/// The commission schedules and fixed bonuses in force for a calculation.
///
/// Built fresh from storage (or tests) and handed to the calculator by
/// reference; the calculator never mutates or retains it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusConfig {
    sales_tiers: Vec<BonusTier>,
    collection_tiers: Vec<BonusTier>,
    fixed_bonuses: BTreeMap<String, FixedBonus>,
}

impl BonusConfig {
    /// Builds a configuration from flat lists as stored.
    ///
    /// Tiers are routed to their schedule by [`Metric`] and sorted by
    /// `min_rate`. The sort is stable: tiers with equal `min_rate` keep the
    /// order they were given in. If two fixed bonuses share a key the later
    /// one wins.
    pub fn new(tiers: Vec<BonusTier>, fixed_bonuses: Vec<FixedBonus>) -> Self {
        let (mut sales_tiers, mut collection_tiers): (Vec<_>, Vec<_>) = tiers
            .into_iter()
            .partition(|tier| tier.metric == Metric::Sales);

        sales_tiers.sort_by_key(|tier| tier.min_rate);
        collection_tiers.sort_by_key(|tier| tier.min_rate);

        let fixed_bonuses = fixed_bonuses
            .into_iter()
            .map(|bonus| (bonus.key.clone(), bonus))
            .collect();

        BonusConfig {
            sales_tiers,
            collection_tiers,
            fixed_bonuses,
        }
    }

    /// Sales schedule, ascending by `min_rate`.
    pub fn sales_tiers(&self) -> &[BonusTier] {
        &self.sales_tiers
    }

    /// Collection schedule, ascending by `min_rate`.
    pub fn collection_tiers(&self) -> &[BonusTier] {
        &self.collection_tiers
    }

    /// Schedule for one metric.
    pub fn tiers_for(&self, metric: Metric) -> &[BonusTier] {
        match metric {
            Metric::Sales => &self.sales_tiers,
            Metric::Collection => &self.collection_tiers,
        }
    }

    /// Looks up a fixed bonus by key.
    pub fn fixed_bonus(&self, key: &str) -> Option<&FixedBonus> {
        self.fixed_bonuses.get(key)
    }

    /// All fixed bonuses, ordered by key.
    pub fn fixed_bonuses(&self) -> impl Iterator<Item = &FixedBonus> {
        self.fixed_bonuses.values()
    }

    /// Amount paid per new customer; zero when not configured.
    pub fn per_new_customer(&self) -> Money {
        self.fixed_bonus(PER_NEW_CUSTOMER_KEY)
            .map(|bonus| bonus.value)
            .unwrap_or_default()
    }
}

// =============================================================================
// Tier Lookup
// =============================================================================

/// Finds the band for `rate` in an ascending schedule.
///
/// Returns the index of the first band with `min_rate <= rate < max_rate`,
/// treating the last band as unbounded above. `None` when the rate is below
/// every band or the schedule is empty.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use sales_core::bonus::find_tier;
/// use sales_core::types::{BonusTier, Metric, Percentage};
///
/// let tiers = vec![
///     BonusTier::new(Metric::Sales, Percentage::from_percent(50), Some(Percentage::from_percent(100)), Percentage::from_percent(3)),
///     BonusTier::new(Metric::Sales, Percentage::from_percent(100), Some(Percentage::from_percent(120)), Percentage::from_percent(5)),
/// ];
///
/// assert_eq!(find_tier(&tiers, Decimal::from(10)), None);
/// assert_eq!(find_tier(&tiers, Decimal::from(75)), Some(0));
/// assert_eq!(find_tier(&tiers, Decimal::from(180)), Some(1));
/// ```
pub fn find_tier(tiers: &[BonusTier], rate: Decimal) -> Option<usize> {
    let last = tiers.len().checked_sub(1)?;

    tiers
        .iter()
        .enumerate()
        .find(|(index, tier)| tier.contains_with(rate, *index == last))
        .map(|(index, _)| index)
}

/// Band for one metric; a zero target never matches.
fn lookup_tier(tiers: &[BonusTier], target: Money, rate: Decimal) -> Option<usize> {
    if target.is_zero() {
        return None;
    }
    find_tier(tiers, rate)
}

/// Bonus rate of the matched band, zero for no match.
fn matched_rate(tiers: &[BonusTier], index: Option<usize>) -> Percentage {
    index
        .and_then(|i| tiers.get(i))
        .map(|tier| tier.bonus_rate)
        .unwrap_or_default()
}

// =============================================================================
// Calculation
// =============================================================================

/// Computes the bonus breakdown for a target.
///
/// Pure: no side effects besides trace logging. Callers are responsible
/// for having validated the target; use [`calculate_bonus`] to validate and
/// compute in one step.
///
/// ## Errors
/// `CoreError::Overflow` when an amount exceeds `Decimal`'s range (only
/// reachable with figures near `i64::MAX`).
pub fn compute_bonus(target: &Target, config: &BonusConfig) -> CoreResult<BonusCalculation> {
    let sales_rate = target.sales_rate();
    let collection_rate = target.collection_rate();

    let sales_tier = lookup_tier(config.sales_tiers(), target.sales_target, sales_rate);
    let collection_tier = lookup_tier(
        config.collection_tiers(),
        target.collection_target,
        collection_rate,
    );

    let sales_bonus_rate = matched_rate(config.sales_tiers(), sales_tier);
    let collection_bonus_rate = matched_rate(config.collection_tiers(), collection_tier);

    trace!(
        sales_person_id = %target.sales_person_id,
        %sales_rate,
        ?sales_tier,
        %collection_rate,
        ?collection_tier,
        "Matched bonus tiers"
    );

    let sales_bonus = target
        .achieved_sales
        .to_decimal()
        .checked_mul(sales_bonus_rate.as_fraction())
        .ok_or_else(|| CoreError::overflow("sales bonus"))?;
    let collection_bonus = target
        .achieved_collection
        .to_decimal()
        .checked_mul(collection_bonus_rate.as_fraction())
        .ok_or_else(|| CoreError::overflow("collection bonus"))?;

    let new_customers = target.achieved_new_customers;
    let fixed_bonus = Decimal::from(new_customers)
        .checked_mul(config.per_new_customer().to_decimal())
        .ok_or_else(|| CoreError::overflow("fixed bonus"))?;

    let total = sales_bonus
        .checked_add(collection_bonus)
        .and_then(|sum| sum.checked_add(fixed_bonus))
        .ok_or_else(|| CoreError::overflow("bonus total"))?;

    debug!(
        sales_person_id = %target.sales_person_id,
        period = %target.period,
        %total,
        "Bonus computed"
    );

    Ok(BonusCalculation {
        total,
        sales_bonus,
        collection_bonus,
        fixed_bonus,
        details: BonusDetails {
            sales_rate,
            sales_tier,
            sales_bonus_rate,
            collection_rate,
            collection_tier,
            collection_bonus_rate,
            new_customers,
        },
    })
}

/// Validates the target, then computes its bonus.
///
/// ## Errors
/// - `CoreError::Validation` when any target or achieved figure is negative
///   or the salesperson ID is malformed
/// - `CoreError::Overflow` as for [`compute_bonus`]
///
/// Missing configuration is never an error.
pub fn calculate_bonus(target: &Target, config: &BonusConfig) -> CoreResult<BonusCalculation> {
    validate_target(target)?;
    compute_bonus(target, config)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Period;

    const SP: &str = "550e8400-e29b-41d4-a716-446655440000";

    fn tier(metric: Metric, min: u32, max: Option<u32>, rate: u32) -> BonusTier {
        BonusTier::new(
            metric,
            Percentage::from_percent(min),
            max.map(Percentage::from_percent),
            Percentage::from_percent(rate),
        )
    }

    fn standard_config() -> BonusConfig {
        BonusConfig::new(
            vec![
                tier(Metric::Sales, 100, None, 6),
                tier(Metric::Sales, 0, Some(80), 2),
                tier(Metric::Sales, 80, Some(100), 4),
                tier(Metric::Collection, 0, Some(100), 3),
                tier(Metric::Collection, 100, None, 5),
            ],
            vec![FixedBonus::new(
                PER_NEW_CUSTOMER_KEY,
                Money::from_major_minor(500, 0),
            )],
        )
    }

    fn target(sales: (i64, i64), collection: (i64, i64), new_customers: i64) -> Target {
        let mut t = Target::new(SP, Period::new(2024, 5).unwrap());
        t.sales_target = Money::from_major_minor(sales.0, 0);
        t.achieved_sales = Money::from_major_minor(sales.1, 0);
        t.collection_target = Money::from_major_minor(collection.0, 0);
        t.achieved_collection = Money::from_major_minor(collection.1, 0);
        t.achieved_new_customers = new_customers;
        t
    }

    #[test]
    fn test_config_sorts_and_routes_tiers() {
        let config = standard_config();
        let mins: Vec<u32> = config.sales_tiers().iter().map(|t| t.min_rate.bps()).collect();
        assert_eq!(mins, vec![0, 8000, 10000]);
        assert_eq!(config.collection_tiers().len(), 2);
        assert!(config
            .tiers_for(Metric::Collection)
            .iter()
            .all(|t| t.metric == Metric::Collection));
    }

    #[test]
    fn test_config_missing_fixed_bonus_is_zero() {
        let config = BonusConfig::new(vec![], vec![]);
        assert_eq!(config.per_new_customer(), Money::zero());
        assert!(config.fixed_bonus(PER_NEW_CUSTOMER_KEY).is_none());
    }

    #[test]
    fn test_find_tier_boundaries() {
        let config = standard_config();
        let tiers = config.sales_tiers();

        assert_eq!(find_tier(tiers, Decimal::ZERO), Some(0));
        assert_eq!(find_tier(tiers, Decimal::new(7999, 2)), Some(0));
        assert_eq!(find_tier(tiers, Decimal::from(80)), Some(1));
        assert_eq!(find_tier(tiers, Decimal::from(100)), Some(2));
        assert_eq!(find_tier(tiers, Decimal::from(250)), Some(2));
    }

    #[test]
    fn test_find_tier_empty_schedule() {
        assert_eq!(find_tier(&[], Decimal::from(90)), None);
    }

    #[test]
    fn test_find_tier_top_band_is_open_ended() {
        // Top band stored with a finite max still catches over-achievement
        let tiers = vec![
            tier(Metric::Sales, 0, Some(100), 2),
            tier(Metric::Sales, 100, Some(120), 6),
        ];
        assert_eq!(find_tier(&tiers, Decimal::from(120)), Some(1));
        assert_eq!(find_tier(&tiers, Decimal::from(300)), Some(1));
    }

    #[test]
    fn test_find_tier_overlap_first_wins() {
        let config = BonusConfig::new(
            vec![
                tier(Metric::Sales, 50, Some(100), 3),
                tier(Metric::Sales, 0, Some(90), 1),
            ],
            vec![],
        );
        // 85% is inside both bands; the lower min_rate band comes first
        assert_eq!(find_tier(config.sales_tiers(), Decimal::from(85)), Some(0));
        assert_eq!(config.sales_tiers()[0].bonus_rate, Percentage::from_percent(1));
    }

    #[test]
    fn test_compute_bonus_worked_example() {
        let calc = compute_bonus(&target((100_000, 90_000), (50_000, 60_000), 3), &standard_config())
            .unwrap();

        assert_eq!(calc.details.sales_rate, Decimal::from(90));
        assert_eq!(calc.details.sales_tier, Some(1));
        assert_eq!(calc.sales_bonus, Decimal::from(3600));
        assert_eq!(calc.details.collection_rate, Decimal::from(120));
        assert_eq!(calc.details.collection_tier, Some(1));
        assert_eq!(calc.collection_bonus, Decimal::from(3000));
        assert_eq!(calc.fixed_bonus, Decimal::from(1500));
        assert_eq!(calc.total, Decimal::from(8100));
    }

    #[test]
    fn test_compute_bonus_no_tier_match() {
        let config = BonusConfig::new(
            vec![tier(Metric::Sales, 50, None, 5)],
            vec![],
        );
        let calc = compute_bonus(&target((100_000, 10_000), (0, 0), 0), &config).unwrap();

        assert_eq!(calc.details.sales_tier, None);
        assert_eq!(calc.details.sales_bonus_rate, Percentage::zero());
        assert_eq!(calc.sales_bonus, Decimal::ZERO);
        assert_eq!(calc.total, Decimal::ZERO);
    }

    #[test]
    fn test_compute_bonus_zero_targets() {
        // The standard schedules both start at 0%
        let calc = compute_bonus(&target((0, 90_000), (0, 60_000), 0), &standard_config()).unwrap();

        assert_eq!(calc.details.sales_rate, Decimal::ZERO);
        assert_eq!(calc.details.collection_rate, Decimal::ZERO);
        assert_eq!(calc.details.sales_tier, None);
        assert_eq!(calc.details.collection_tier, None);
        assert_eq!(calc.details.sales_bonus_rate, Percentage::zero());
        assert_eq!(calc.sales_bonus, Decimal::ZERO);
        assert_eq!(calc.collection_bonus, Decimal::ZERO);
        assert_eq!(calc.total, Decimal::ZERO);
    }

    #[test]
    fn test_compute_bonus_zero_target_still_pays_fixed_bonus() {
        let calc = compute_bonus(&target((0, 90_000), (0, 0), 2), &standard_config()).unwrap();

        assert_eq!(calc.sales_bonus, Decimal::ZERO);
        assert_eq!(calc.fixed_bonus, Decimal::from(1000));
        assert_eq!(calc.total, Decimal::from(1000));
    }

    #[test]
    fn test_calculate_bonus_extreme_figures_overflow_instead_of_panicking() {
        let config = BonusConfig::new(
            vec![],
            vec![FixedBonus::new(PER_NEW_CUSTOMER_KEY, Money::from_cents(i64::MAX))],
        );
        let mut t = target((0, 0), (0, 0), 0);
        t.achieved_new_customers = i64::MAX;

        let err = calculate_bonus(&t, &config).unwrap_err();
        assert!(matches!(err, CoreError::Overflow { .. }));
    }

    #[test]
    fn test_calculate_bonus_max_sales_figures_fit() {
        let mut t = target((0, 0), (0, 0), 0);
        t.sales_target = Money::from_cents(i64::MAX);
        t.achieved_sales = Money::from_cents(i64::MAX);

        let calc = calculate_bonus(&t, &standard_config()).unwrap();
        assert_eq!(calc.details.sales_tier, Some(2));
        assert_eq!(calc.sales_bonus, Money::from_cents(i64::MAX).to_decimal() * Decimal::new(6, 2));
    }

    #[test]
    fn test_compute_bonus_keeps_fractional_cents() {
        let config = BonusConfig::new(
            vec![BonusTier::new(
                Metric::Sales,
                Percentage::zero(),
                None,
                Percentage::from_bps(333),
            )],
            vec![],
        );

        let mut t = target((100, 0), (0, 0), 0);
        t.achieved_sales = Money::from_cents(1);
        let calc = compute_bonus(&t, &config).unwrap();

        // 0.01 × 3.33% = 0.000333, no rounding
        assert_eq!(calc.sales_bonus, Decimal::new(333, 6));
    }

    #[test]
    fn test_calculate_bonus_rejects_negative_input() {
        let mut t = target((100_000, 90_000), (0, 0), 0);
        t.collection_target = Money::from_cents(-1);

        let err = calculate_bonus(&t, &standard_config()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
