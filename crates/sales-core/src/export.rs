//! # Export Rows
//!
//! Flattens a [`TeamBonusSummary`] into one row per member for tables and
//! spreadsheet export.
//!
//! Bonus amounts are rounded to cents here (Bankers Rounding) since rows
//! are the display edge. The row total is the sum of the rounded
//! components, so every row adds up on paper.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::team::{MemberBonus, TeamBonusSummary};

/// Tier cell value for "no tier matched".
pub const NO_TIER: i64 = -1;

/// One flat row per team member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BonusRow {
    pub sales_person_id: String,
    pub period: String,
    pub sales_target: Money,
    pub achieved_sales: Money,
    /// Percent, two decimals.
    #[ts(type = "string")]
    pub sales_rate: Decimal,
    /// Matched band index, or [`NO_TIER`].
    pub sales_tier: i64,
    pub sales_bonus: Money,
    pub collection_target: Money,
    pub achieved_collection: Money,
    #[ts(type = "string")]
    pub collection_rate: Decimal,
    pub collection_tier: i64,
    pub collection_bonus: Money,
    pub new_customers: i64,
    pub fixed_bonus: Money,
    pub total: Money,
}

impl BonusRow {
    /// Column names, in the same order as [`cells`](Self::cells).
    pub const HEADERS: [&'static str; 15] = [
        "sales_person_id",
        "period",
        "sales_target",
        "achieved_sales",
        "sales_rate",
        "sales_tier",
        "sales_bonus",
        "collection_target",
        "achieved_collection",
        "collection_rate",
        "collection_tier",
        "collection_bonus",
        "new_customers",
        "fixed_bonus",
        "total",
    ];

    /// Builds a row from one member's result.
    pub fn from_member(member: &MemberBonus) -> CoreResult<Self> {
        let calc = &member.calculation;
        let target = &member.target;

        let sales_bonus = Money::from_decimal_rounded(calc.sales_bonus)?;
        let collection_bonus = Money::from_decimal_rounded(calc.collection_bonus)?;
        let fixed_bonus = Money::from_decimal_rounded(calc.fixed_bonus)?;

        Ok(BonusRow {
            sales_person_id: member.sales_person_id().to_string(),
            period: member.period().to_string(),
            sales_target: target.sales_target,
            achieved_sales: target.achieved_sales,
            sales_rate: round_rate(calc.details.sales_rate),
            sales_tier: tier_cell(calc.details.sales_tier),
            sales_bonus,
            collection_target: target.collection_target,
            achieved_collection: target.achieved_collection,
            collection_rate: round_rate(calc.details.collection_rate),
            collection_tier: tier_cell(calc.details.collection_tier),
            collection_bonus,
            new_customers: calc.details.new_customers,
            fixed_bonus,
            total: sales_bonus + collection_bonus + fixed_bonus,
        })
    }

    /// Display strings for each column.
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.sales_person_id.clone(),
            self.period.clone(),
            self.sales_target.to_string(),
            self.achieved_sales.to_string(),
            format!("{}%", self.sales_rate),
            self.sales_tier.to_string(),
            self.sales_bonus.to_string(),
            self.collection_target.to_string(),
            self.achieved_collection.to_string(),
            format!("{}%", self.collection_rate),
            self.collection_tier.to_string(),
            self.collection_bonus.to_string(),
            self.new_customers.to_string(),
            self.fixed_bonus.to_string(),
            self.total.to_string(),
        ]
    }
}

/// Converts a team summary into export rows, in member order.
pub fn to_rows(summary: &TeamBonusSummary) -> CoreResult<Vec<BonusRow>> {
    summary.members.iter().map(BonusRow::from_member).collect()
}

fn round_rate(rate: Decimal) -> Decimal {
    rate.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

fn tier_cell(tier: Option<usize>) -> i64 {
    tier.and_then(|i| i64::try_from(i).ok()).unwrap_or(NO_TIER)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonus::BonusConfig;
    use crate::team::calculate_team;
    use crate::types::{BonusTier, Metric, Percentage, Period, Target};

    const SP: &str = "00000000-0000-4000-8000-000000000001";

    fn summary_for(achieved_cents: i64, target_cents: i64) -> TeamBonusSummary {
        let config = BonusConfig::new(
            vec![BonusTier::new(
                Metric::Sales,
                Percentage::from_percent(50),
                None,
                Percentage::from_bps(333),
            )],
            vec![],
        );

        let mut target = Target::new(SP, Period::new(2024, 4).unwrap());
        target.sales_target = Money::from_cents(target_cents);
        target.achieved_sales = Money::from_cents(achieved_cents);

        calculate_team(&[target], &config).unwrap()
    }

    #[test]
    fn test_row_rounds_bonus_and_rate() {
        // 150.00 × 3.33% = 4.995 → 5.00 (half to even), rate 150/300 = 50%
        let rows = to_rows(&summary_for(15_000, 30_000)).unwrap();
        let row = &rows[0];

        assert_eq!(row.sales_bonus, Money::from_cents(500));
        assert_eq!(row.sales_rate, Decimal::from(50));
        assert_eq!(row.sales_tier, 0);
        assert_eq!(row.collection_tier, NO_TIER);
        assert_eq!(row.total, Money::from_cents(500));
        assert_eq!(row.period, "2024-04");
    }

    #[test]
    fn test_row_rate_two_decimals() {
        // 200 / 300 = 66.666...%
        let rows = to_rows(&summary_for(20_000, 30_000)).unwrap();
        assert_eq!(rows[0].sales_rate, Decimal::new(6667, 2));
    }

    #[test]
    fn test_cells_match_headers() {
        let rows = to_rows(&summary_for(15_000, 30_000)).unwrap();
        let cells = rows[0].cells();

        assert_eq!(cells.len(), BonusRow::HEADERS.len());
        assert_eq!(cells[0], SP);
        assert_eq!(cells[6], "$5.00");
        assert_eq!(cells[10], "-1");
    }
}
