//! # Seed Data Generator
//!
//! Populates the database with a default bonus schedule and a team of
//! salespeople for development.
//!
//! ## Usage
//! ```bash
//! # Seed 25 salespeople for the current month (default)
//! cargo run -p sales-db --bin seed
//!
//! # Custom team size and period
//! cargo run -p sales-db --bin seed -- --count 100 --period 2024-03
//!
//! # Specify database path
//! cargo run -p sales-db --bin seed -- --db ./data/sales.db
//! ```
//!
//! ## Seeded Configuration
//! ```text
//! Sales schedule          Collection schedule      Fixed bonuses
//! [  0%,  80%) → 2%       [  0%, 100%) → 3%        per_new_customer = $500.00
//! [ 80%, 100%) → 4%       [100%,   ∞ ) → 5%
//! [100%,   ∞ ) → 6%
//! ```
//!
//! Each salesperson gets:
//! - Sales target: $50,000 - $149,000
//! - Achievement: 55% - 129% of target
//! - Collection target: 90% of sales target
//! - 0 - 4 new customers

use chrono::Utc;
use sales_core::{
    BonusTier, FixedBonus, Metric, Money, Percentage, Period, Target, PER_NEW_CUSTOMER_KEY,
};
use sales_db::{Database, DbConfig};
use std::env;
use uuid::Uuid;

/// `(min %, max %, bonus %)` for the sales schedule
const SALES_SCHEDULE: &[(u32, Option<u32>, u32)] =
    &[(0, Some(80), 2), (80, Some(100), 4), (100, None, 6)];

/// `(min %, max %, bonus %)` for the collection schedule
const COLLECTION_SCHEDULE: &[(u32, Option<u32>, u32)] = &[(0, Some(100), 3), (100, None, 5)];

/// Flat amount per new customer, in cents
const PER_NEW_CUSTOMER_CENTS: i64 = 50_000;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 25;
    let mut db_path = String::from("./sales_dev.db");
    let mut period = Period::containing(Utc::now());

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(25);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--period" | "-p" => {
                if i + 1 < args.len() {
                    period = args[i + 1].parse()?;
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Sales Bonus Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>        Number of salespeople to generate (default: 25)");
                println!("  -d, --db <PATH>        Database file path (default: ./sales_dev.db)");
                println!("  -p, --period <YYYY-MM> Target period (default: current month)");
                println!("  -h, --help             Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Sales Bonus Seed Data Generator");
    println!("==================================");
    println!("Database:     {}", db_path);
    println!("Period:       {}", period);
    println!("Salespeople:  {}", count);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Bonus configuration is idempotent: schedules are replaced wholesale
    db.bonus_tiers()
        .replace_schedule(Metric::Sales, &schedule(Metric::Sales, SALES_SCHEDULE))
        .await?;
    db.bonus_tiers()
        .replace_schedule(
            Metric::Collection,
            &schedule(Metric::Collection, COLLECTION_SCHEDULE),
        )
        .await?;

    let mut per_customer = FixedBonus::new(
        PER_NEW_CUSTOMER_KEY,
        Money::from_cents(PER_NEW_CUSTOMER_CENTS),
    );
    per_customer.description = Some("Paid for every new customer won".to_string());
    db.fixed_bonuses().upsert(&per_customer).await?;

    println!("✓ Bonus schedules and fixed bonuses written");

    // Check existing targets
    let existing = db.targets().list_by_period(period).await?;
    if !existing.is_empty() {
        println!("⚠ Period {} already has {} targets", period, existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating targets...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    for seed in 0..count {
        let target = generate_target(period, seed);

        if let Err(e) = db.targets().insert(&target).await {
            eprintln!("Failed to insert {}: {}", target.sales_person_id, e);
            continue;
        }

        generated += 1;

        if generated % 10 == 0 {
            println!("  Generated {} targets...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} targets in {:?}", generated, elapsed);

    // Verify the configuration round-trips
    let bonus_config = db.bonus_config().await?;
    println!();
    println!("Verifying configuration...");
    println!("  Sales tiers:      {}", bonus_config.sales_tiers().len());
    println!("  Collection tiers: {}", bonus_config.collection_tiers().len());
    println!("  Per new customer: {}", bonus_config.per_new_customer());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one schedule from `(min %, max %, bonus %)` triples.
fn schedule(metric: Metric, bands: &[(u32, Option<u32>, u32)]) -> Vec<BonusTier> {
    bands
        .iter()
        .map(|&(min, max, rate)| {
            BonusTier::new(
                metric,
                Percentage::from_percent(min),
                max.map(Percentage::from_percent),
                Percentage::from_percent(rate),
            )
        })
        .collect()
}

/// Generates a single salesperson's target with plausible figures.
fn generate_target(period: Period, seed: usize) -> Target {
    let seed = seed as i64;
    let mut target = Target::new(Uuid::new_v4().to_string(), period);

    // $50,000 - $149,000 in $1,000 steps
    let sales_target_cents = (50 + (seed * 37) % 100) * 100_000;
    // 55% - 129% of target
    let achieved_pct = 55 + (seed * 13) % 75;
    let collected_pct = 60 + (seed * 7) % 60;

    target.sales_target = Money::from_cents(sales_target_cents);
    target.achieved_sales = Money::from_cents(sales_target_cents * achieved_pct / 100);

    target.collection_target = Money::from_cents(sales_target_cents * 9 / 10);
    target.achieved_collection =
        Money::from_cents(target.collection_target.cents() * collected_pct / 100);

    target.unit_target = 100 + (seed * 11) % 200;
    target.achieved_units = target.unit_target * achieved_pct / 100;

    target.new_customer_target = 3;
    target.achieved_new_customers = seed % 5;

    target
}
