//! # sales-core: Pure Business Logic for the Sales Bonus Engine
//!
//! This crate is the **heart** of the bonus engine. It contains the
//! commission calculator and its data model as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Sales Bonus Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              CRM Dashboard (external, web frontend)             │   │
//! │  │    Targets page ──► Bonus page ──► Leaderboard ──► Export       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ TypeScript bindings (ts-rs)            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ sales-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   bonus   │  │   team    │  │ validation│  │   │
//! │  │   │  Target   │  │ BonusConf │  │ summary   │  │  targets  │  │   │
//! │  │   │ BonusTier │  │ find_tier │  │leaderboard│  │ schedules │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    sales-db (Database Layer)                    │   │
//! │  │          targets, bonus_tiers, fixed_bonuses (SQLite)           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Target, BonusTier, FixedBonus, BonusCalculation)
//! - [`money`] - Money type with integer cents
//! - [`bonus`] - Configuration snapshot, tier lookup, bonus calculation
//! - [`team`] - Team totals and leaderboard
//! - [`export`] - Flat rows for tables and spreadsheets
//! - [`validation`] - Target and tier schedule validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same target + same configuration = same breakdown
//! 2. **Configuration as Data**: tiers and fixed amounts are passed in, never constants
//! 3. **Total Lookup**: no matching tier means zero, not an error
//! 4. **Exact Math**: bonuses are `Decimal`, rounded only at export
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use sales_core::bonus::{calculate_bonus, BonusConfig};
//! use sales_core::{BonusTier, FixedBonus, Metric, Money, Percentage, Period, Target};
//!
//! let config = BonusConfig::new(
//!     vec![
//!         BonusTier::new(Metric::Sales, Percentage::from_percent(0), Some(Percentage::from_percent(80)), Percentage::from_percent(2)),
//!         BonusTier::new(Metric::Sales, Percentage::from_percent(80), Some(Percentage::from_percent(100)), Percentage::from_percent(4)),
//!         BonusTier::new(Metric::Sales, Percentage::from_percent(100), None, Percentage::from_percent(6)),
//!     ],
//!     vec![FixedBonus::new("per_new_customer", Money::from_major_minor(500, 0))],
//! );
//!
//! let mut target = Target::new("550e8400-e29b-41d4-a716-446655440000", Period::new(2024, 3).unwrap());
//! target.sales_target = Money::from_major_minor(100_000, 0);
//! target.achieved_sales = Money::from_major_minor(90_000, 0);
//! target.achieved_new_customers = 3;
//!
//! let calc = calculate_bonus(&target, &config).unwrap();
//! assert_eq!(calc.details.sales_tier, Some(1));
//! assert_eq!(calc.total, Decimal::from(3600 + 1500));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bonus;
pub mod error;
pub mod export;
pub mod money;
pub mod team;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use bonus::{calculate_bonus, compute_bonus, find_tier, BonusConfig};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Fixed bonus key paid once per achieved new customer.
pub const PER_NEW_CUSTOMER_KEY: &str = "per_new_customer";

/// Highest commission rate a tier may carry (100% of the achieved amount).
pub const MAX_BONUS_RATE_BPS: u32 = 10_000;

/// Maximum length of a fixed bonus key.
pub const MAX_FIXED_BONUS_KEY_LEN: usize = 50;
