//! Report rendering.
//!
//! ## Table Layout
//! ```text
//! Bonus report for 2024-03
//!
//! sales_person_id  period   sales_target  ...  total
//! 7c1e...          2024-03  $100000.00    ...  $8100.00
//!
//! Leaderboard
//!   1  7c1e...  $8100.00  (sales 120.00%)
//!
//! Team total: $8100.00 (sales $7200.00, collection $400.00, fixed $500.00)
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use sales_core::export::BonusRow;
use sales_core::team::{LeaderboardEntry, TeamTotals};
use sales_core::{CoreResult, Money, Period};
use serde::Serialize;

/// Everything one report shows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<'a> {
    pub period: Period,
    pub rows: &'a [BonusRow],
    pub leaderboard: &'a [LeaderboardEntry],
    pub totals: &'a TeamTotals,
}

impl Report<'_> {
    /// Renders the report as a pretty-printed JSON document.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Renders the report as aligned text.
    pub fn to_table(&self) -> CoreResult<String> {
        let mut out = format!("Bonus report for {}\n\n", self.period);

        if self.rows.is_empty() {
            out.push_str("No targets recorded for this period.\n");
            return Ok(out);
        }

        let body: Vec<Vec<String>> = self.rows.iter().map(BonusRow::cells).collect();
        let widths: Vec<usize> = BonusRow::HEADERS
            .iter()
            .enumerate()
            .map(|(col, header)| {
                body.iter()
                    .map(|cells| cells[col].len())
                    .chain(std::iter::once(header.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let headers: Vec<String> = BonusRow::HEADERS.iter().map(|h| h.to_string()).collect();
        out.push_str(&render_line(&headers, &widths));
        for cells in &body {
            out.push_str(&render_line(cells, &widths));
        }

        out.push_str("\nLeaderboard\n");
        for entry in self.leaderboard {
            out.push_str(&format!(
                "  {:>3}  {}  {}  (sales {:.2}%)\n",
                entry.rank,
                entry.sales_person_id,
                Money::from_decimal_rounded(entry.total)?,
                round_rate(entry.sales_rate),
            ));
        }

        out.push_str(&format!(
            "\nTeam total: {} (sales {}, collection {}, fixed {})\n",
            Money::from_decimal_rounded(self.totals.total_bonus)?,
            Money::from_decimal_rounded(self.totals.sales_bonus)?,
            Money::from_decimal_rounded(self.totals.collection_bonus)?,
            Money::from_decimal_rounded(self.totals.fixed_bonus)?,
        ));

        Ok(out)
    }
}

fn render_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    format!("{}\n", padded.join("  ").trim_end())
}

fn round_rate(rate: Decimal) -> Decimal {
    rate.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_core::export::to_rows;
    use sales_core::team::{calculate_team, leaderboard, TeamBonusSummary};
    use sales_core::{BonusConfig, BonusTier, FixedBonus, Metric, Percentage, Target};

    const ALICE: &str = "550e8400-e29b-41d4-a716-446655440000";

    fn summary() -> TeamBonusSummary {
        let config = BonusConfig::new(
            vec![BonusTier::new(
                Metric::Sales,
                Percentage::zero(),
                None,
                Percentage::from_percent(6),
            )],
            vec![FixedBonus::new(
                sales_core::PER_NEW_CUSTOMER_KEY,
                Money::from_cents(50_000),
            )],
        );

        let mut target = Target::new(ALICE, Period::new(2024, 3).unwrap());
        target.sales_target = Money::from_cents(10_000_000);
        target.achieved_sales = Money::from_cents(12_000_000);
        target.achieved_new_customers = 1;

        calculate_team(&[target], &config).unwrap()
    }

    #[test]
    fn test_table_contains_rows_leaderboard_and_totals() {
        let summary = summary();
        let rows = to_rows(&summary).unwrap();
        let board = leaderboard(&summary);
        let report = Report {
            period: Period::new(2024, 3).unwrap(),
            rows: &rows,
            leaderboard: &board,
            totals: &summary.totals,
        };

        let table = report.to_table().unwrap();
        assert!(table.starts_with("Bonus report for 2024-03\n"));
        assert!(table.contains("sales_person_id"));
        assert!(table.contains(ALICE));
        assert!(table.contains("(sales 120.00%)"));
        assert!(table.contains("Team total: $7700.00 (sales $7200.00, collection $0.00, fixed $500.00)"));
    }

    #[test]
    fn test_table_for_empty_period() {
        let totals = TeamTotals::default();
        let report = Report {
            period: Period::new(2024, 3).unwrap(),
            rows: &[],
            leaderboard: &[],
            totals: &totals,
        };

        let table = report.to_table().unwrap();
        assert!(table.contains("No targets recorded"));
    }

    #[test]
    fn test_json_shape() {
        let summary = summary();
        let rows = to_rows(&summary).unwrap();
        let board = leaderboard(&summary);
        let report = Report {
            period: Period::new(2024, 3).unwrap(),
            rows: &rows,
            leaderboard: &board,
            totals: &summary.totals,
        };

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["period"], "2024-03");
        assert_eq!(value["rows"].as_array().unwrap().len(), 1);
        assert_eq!(value["leaderboard"][0]["rank"], 1);
        assert!(value["totals"].is_object());
    }
}
