//! # Team Aggregation
//!
//! Runs the bonus calculator over a team and ranks the results.
//!
//! ## Flow
//! ```text
//! targets (one per salesperson)
//!      │
//!      ▼
//! calculate_team() ── each member independently ──► MemberBonus
//!      │                                              │
//!      │                 summed                        │
//!      ▼                                              ▼
//! TeamTotals ◄──────────────────────────── TeamBonusSummary
//!                                                     │
//!                                                     ▼
//!                                           leaderboard() → ranked entries
//! ```
//!
//! Each member is computed from its own record only, so member results do
//! not depend on team composition or input order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;
use ts_rs::TS;

use crate::bonus::{compute_bonus, BonusConfig};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{achievement_rate, BonusCalculation, Period, Target};
use crate::validation::validate_target;

// =============================================================================
// Summary Types
// =============================================================================

/// One team member's bonus for a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MemberBonus {
    /// The record the calculation was derived from.
    pub target: Target,
    pub calculation: BonusCalculation,
}

impl MemberBonus {
    /// Salesperson the bonus belongs to.
    pub fn sales_person_id(&self) -> &str {
        &self.target.sales_person_id
    }

    /// Period the bonus covers.
    pub fn period(&self) -> Period {
        self.target.period
    }
}

/// Figures summed over every member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TeamTotals {
    #[ts(type = "string")]
    pub total_bonus: Decimal,
    #[ts(type = "string")]
    pub sales_bonus: Decimal,
    #[ts(type = "string")]
    pub collection_bonus: Decimal,
    #[ts(type = "string")]
    pub fixed_bonus: Decimal,
    pub sales_target: Money,
    pub achieved_sales: Money,
    pub collection_target: Money,
    pub achieved_collection: Money,
    pub new_customers: i64,
    /// Team-wide sales achievement (summed achieved / summed target).
    #[ts(type = "string")]
    pub sales_rate: Decimal,
    /// Team-wide collection achievement.
    #[ts(type = "string")]
    pub collection_rate: Decimal,
}

/// Per-member results plus team totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TeamBonusSummary {
    /// Members in input order.
    pub members: Vec<MemberBonus>,
    pub totals: TeamTotals,
}

/// A ranked row of the team leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based; members with equal total and sales rate share a rank.
    pub rank: usize,
    pub sales_person_id: String,
    #[ts(type = "string")]
    pub total: Decimal,
    #[ts(type = "string")]
    pub sales_rate: Decimal,
}

// =============================================================================
// Operations
// =============================================================================

/// Calculates every member's bonus and the team totals.
///
/// ## Errors
/// - `CoreError::InvalidTarget` naming the first member whose record fails
///   validation
/// - `CoreError::Overflow` when a member's bonus or a team sum is out of
///   range
///
/// Nothing is partially returned.
pub fn calculate_team(targets: &[Target], config: &BonusConfig) -> CoreResult<TeamBonusSummary> {
    let mut members = Vec::with_capacity(targets.len());
    let mut totals = TeamTotals::default();

    for target in targets {
        validate_target(target).map_err(|source| CoreError::InvalidTarget {
            sales_person_id: target.sales_person_id.clone(),
            source,
        })?;

        let calculation = compute_bonus(target, config)?;
        totals.add_member(target, &calculation)?;

        members.push(MemberBonus {
            target: target.clone(),
            calculation,
        });
    }

    totals.sales_rate = achievement_rate(totals.achieved_sales.cents(), totals.sales_target.cents());
    totals.collection_rate = achievement_rate(
        totals.achieved_collection.cents(),
        totals.collection_target.cents(),
    );

    debug!(
        members = members.len(),
        total_bonus = %totals.total_bonus,
        "Team bonus calculated"
    );

    Ok(TeamBonusSummary { members, totals })
}

impl TeamTotals {
    /// Adds one member's figures, failing instead of wrapping on overflow.
    fn add_member(&mut self, target: &Target, calc: &BonusCalculation) -> CoreResult<()> {
        self.total_bonus = add_decimal(self.total_bonus, calc.total, "team total bonus")?;
        self.sales_bonus = add_decimal(self.sales_bonus, calc.sales_bonus, "team sales bonus")?;
        self.collection_bonus = add_decimal(
            self.collection_bonus,
            calc.collection_bonus,
            "team collection bonus",
        )?;
        self.fixed_bonus = add_decimal(self.fixed_bonus, calc.fixed_bonus, "team fixed bonus")?;

        self.sales_target = add_money(self.sales_target, target.sales_target, "team sales_target")?;
        self.achieved_sales =
            add_money(self.achieved_sales, target.achieved_sales, "team achieved_sales")?;
        self.collection_target = add_money(
            self.collection_target,
            target.collection_target,
            "team collection_target",
        )?;
        self.achieved_collection = add_money(
            self.achieved_collection,
            target.achieved_collection,
            "team achieved_collection",
        )?;

        self.new_customers = self
            .new_customers
            .checked_add(target.achieved_new_customers)
            .ok_or_else(|| CoreError::overflow("team new_customers"))?;

        Ok(())
    }
}

fn add_decimal(total: Decimal, amount: Decimal, what: &str) -> CoreResult<Decimal> {
    total.checked_add(amount).ok_or_else(|| CoreError::overflow(what))
}

fn add_money(total: Money, amount: Money, what: &str) -> CoreResult<Money> {
    total.checked_add(amount).ok_or_else(|| CoreError::overflow(what))
}

/// Ranks members by total bonus.
///
/// Ordering: total descending, then sales rate descending, then
/// `sales_person_id` ascending. Ranking is "1, 1, 3" style: ties on
/// (total, sales rate) share a rank and the next rank skips.
pub fn leaderboard(summary: &TeamBonusSummary) -> Vec<LeaderboardEntry> {
    let mut ordered: Vec<&MemberBonus> = summary.members.iter().collect();
    ordered.sort_by(|a, b| compare_members(a, b));

    let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(ordered.len());
    for (position, member) in ordered.into_iter().enumerate() {
        let total = member.calculation.total;
        let sales_rate = member.calculation.details.sales_rate;

        let rank = match entries.last() {
            Some(prev) if prev.total == total && prev.sales_rate == sales_rate => prev.rank,
            _ => position + 1,
        };

        entries.push(LeaderboardEntry {
            rank,
            sales_person_id: member.sales_person_id().to_string(),
            total,
            sales_rate,
        });
    }

    entries
}

fn compare_members(a: &MemberBonus, b: &MemberBonus) -> Ordering {
    b.calculation
        .total
        .cmp(&a.calculation.total)
        .then_with(|| {
            b.calculation
                .details
                .sales_rate
                .cmp(&a.calculation.details.sales_rate)
        })
        .then_with(|| a.sales_person_id().cmp(b.sales_person_id()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BonusTier, FixedBonus, Metric, Percentage};
    use crate::PER_NEW_CUSTOMER_KEY;

    const ALICE: &str = "00000000-0000-4000-8000-00000000000a";
    const BOB: &str = "00000000-0000-4000-8000-00000000000b";
    const CAROL: &str = "00000000-0000-4000-8000-00000000000c";

    fn config() -> BonusConfig {
        BonusConfig::new(
            vec![
                BonusTier::new(
                    Metric::Sales,
                    Percentage::zero(),
                    Some(Percentage::from_percent(100)),
                    Percentage::from_percent(2),
                ),
                BonusTier::new(
                    Metric::Sales,
                    Percentage::from_percent(100),
                    None,
                    Percentage::from_percent(5),
                ),
            ],
            vec![FixedBonus::new(PER_NEW_CUSTOMER_KEY, Money::from_major_minor(100, 0))],
        )
    }

    fn member(id: &str, target: i64, achieved: i64, new_customers: i64) -> Target {
        let mut t = Target::new(id, Period::new(2024, 2).unwrap());
        t.sales_target = Money::from_major_minor(target, 0);
        t.achieved_sales = Money::from_major_minor(achieved, 0);
        t.achieved_new_customers = new_customers;
        t
    }

    #[test]
    fn test_calculate_team_totals() {
        let targets = vec![member(ALICE, 1_000, 1_000, 1), member(BOB, 1_000, 500, 0)];
        let summary = calculate_team(&targets, &config()).unwrap();

        // Alice: 1000 × 5% + 100 = 150, Bob: 500 × 2% = 10
        assert_eq!(summary.members.len(), 2);
        assert_eq!(summary.totals.total_bonus, Decimal::from(160));
        assert_eq!(summary.totals.sales_bonus, Decimal::from(60));
        assert_eq!(summary.totals.fixed_bonus, Decimal::from(100));
        assert_eq!(summary.totals.achieved_sales, Money::from_major_minor(1_500, 0));
        assert_eq!(summary.totals.sales_rate, Decimal::from(75));
    }

    #[test]
    fn test_calculate_team_member_results_independent_of_order() {
        let forward = vec![member(ALICE, 1_000, 1_000, 1), member(BOB, 1_000, 500, 0)];
        let reversed: Vec<Target> = forward.iter().rev().cloned().collect();

        let a = calculate_team(&forward, &config()).unwrap();
        let b = calculate_team(&reversed, &config()).unwrap();

        assert_eq!(a.members[0].calculation, b.members[1].calculation);
        assert_eq!(a.totals, b.totals);
    }

    #[test]
    fn test_calculate_team_names_invalid_member() {
        let mut bad = member(BOB, 1_000, 500, 0);
        bad.achieved_units = -1;

        let err = calculate_team(&[member(ALICE, 1, 1, 0), bad], &config()).unwrap_err();
        match err {
            CoreError::InvalidTarget { sales_person_id, .. } => assert_eq!(sales_person_id, BOB),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_calculate_team_sum_overflow_is_an_error() {
        let mut big = member(ALICE, 0, 0, 0);
        big.sales_target = Money::from_cents(i64::MAX);
        let mut other = member(BOB, 0, 0, 0);
        other.sales_target = Money::from_cents(1);

        let err = calculate_team(&[big, other], &config()).unwrap_err();
        assert!(matches!(err, CoreError::Overflow { .. }));
    }

    #[test]
    fn test_calculate_team_new_customer_count_overflow_is_an_error() {
        let no_fixed = BonusConfig::new(vec![], vec![]);
        let targets = vec![member(ALICE, 0, 0, i64::MAX), member(BOB, 0, 0, 1)];

        let err = calculate_team(&targets, &no_fixed).unwrap_err();
        assert!(matches!(err, CoreError::Overflow { .. }));
    }

    #[test]
    fn test_member_accessors_read_the_target() {
        let summary = calculate_team(&[member(ALICE, 1, 1, 0)], &config()).unwrap();
        assert_eq!(summary.members[0].sales_person_id(), ALICE);
        assert_eq!(summary.members[0].period(), Period::new(2024, 2).unwrap());
    }

    #[test]
    fn test_calculate_team_empty() {
        let summary = calculate_team(&[], &config()).unwrap();
        assert!(summary.members.is_empty());
        assert_eq!(summary.totals.sales_rate, Decimal::ZERO);
    }

    #[test]
    fn test_leaderboard_order_and_shared_rank() {
        let targets = vec![
            member(CAROL, 1_000, 500, 0),
            member(BOB, 1_000, 1_000, 1),
            member(ALICE, 1_000, 1_000, 1),
        ];
        let summary = calculate_team(&targets, &config()).unwrap();
        let board = leaderboard(&summary);

        let ids: Vec<&str> = board.iter().map(|e| e.sales_person_id.as_str()).collect();
        assert_eq!(ids, vec![ALICE, BOB, CAROL]);

        let ranks: Vec<usize> = board.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 1, 3]);
    }

    #[test]
    fn test_leaderboard_breaks_ties_on_sales_rate() {
        // Both earn 1000 × 2% = 20; Bob is closer to his target
        let low_rate = member(ALICE, 2_000, 1_000, 0);
        let high_rate = member(BOB, 1_010, 1_000, 0);

        let summary = calculate_team(&[low_rate, high_rate], &config()).unwrap();
        let board = leaderboard(&summary);

        assert_eq!(board[0].total, board[1].total);
        assert_eq!(board[0].sales_person_id, BOB);
        assert_eq!(board[1].rank, 2);
    }
}
