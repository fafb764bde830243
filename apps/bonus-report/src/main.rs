//! # Bonus Report
//!
//! Prints one period's team bonuses from the sales database.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bonus Report Run                                 │
//! │                                                                         │
//! │  env ───► ReportConfig ───► Database ───► bonus_config() snapshot      │
//! │                                 │                │                      │
//! │                                 │                ▼                      │
//! │                                 │        validate schedules            │
//! │                                 ▼                │ (warn / strict)      │
//! │                       targets for period         │                      │
//! │                                 │                │                      │
//! │                                 └──► calculate_team ◄┘                  │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                           leaderboard + rows ───► stdout               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Environment
//! - `BONUS_DB_PATH` - SQLite file (default `./sales_dev.db`)
//! - `BONUS_PERIOD` - `YYYY-MM` (default current month)
//! - `BONUS_OUTPUT` - `table` or `json` (default `table`)
//! - `BONUS_STRICT_TIERS` - `true` to abort on a malformed schedule
//! - `RUST_LOG` - log filter (default `info`)

mod config;
mod report;

use anyhow::Context;
use sales_core::team::{calculate_team, leaderboard};
use sales_core::validation::validate_tier_schedule;
use sales_core::{export, BonusConfig, Metric};
use sales_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{OutputFormat, ReportConfig};
use crate::report::Report;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (logs go to stderr so stdout stays clean for output)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = ReportConfig::load()?;
    info!(
        db_path = %config.db_path.display(),
        period = %config.period,
        output = ?config.output,
        "Configuration loaded"
    );

    // Connect to database
    let db = Database::new(DbConfig::new(&config.db_path))
        .await
        .with_context(|| format!("opening {}", config.db_path.display()))?;

    let bonus_config = db.bonus_config().await?;
    check_schedules(&bonus_config, config.strict_tiers)?;

    let targets = db.targets().list_by_period(config.period).await?;
    info!(period = %config.period, count = targets.len(), "Targets loaded");

    let summary = calculate_team(&targets, &bonus_config)?;
    let board = leaderboard(&summary);
    let rows = export::to_rows(&summary)?;

    let report = Report {
        period: config.period,
        rows: &rows,
        leaderboard: &board,
        totals: &summary.totals,
    };

    match config.output {
        OutputFormat::Table => print!("{}", report.to_table()?),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    db.close().await;
    info!(total = %summary.totals.total_bonus, "Report complete");
    Ok(())
}

/// Checks both schedules for overlaps and gaps.
///
/// The calculator handles any schedule, so problems are warnings unless
/// `strict` is set.
fn check_schedules(config: &BonusConfig, strict: bool) -> anyhow::Result<()> {
    for metric in [Metric::Sales, Metric::Collection] {
        let tiers = config.tiers_for(metric);
        if tiers.is_empty() {
            warn!(%metric, "No tiers configured; bonus for this metric will be zero");
            continue;
        }

        if let Err(e) = validate_tier_schedule(tiers) {
            if strict {
                return Err(e).with_context(|| format!("{metric} schedule is malformed"));
            }
            warn!(%metric, error = %e, "Malformed tier schedule; first matching band wins");
        }
    }
    Ok(())
}
