//! # sales-db: Database Layer for the Sales Bonus Engine
//!
//! This crate provides database access for targets and bonus
//! configuration. It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sales Bonus Data Flow                            │
//! │                                                                         │
//! │  bonus-report (period report)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     sales-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │   Repositories     │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│ TargetRepository   │  │ (embedded) │  │   │
//! │  │   │  SqlitePool   │    │ BonusTierRepository│  │ 001_init   │  │   │
//! │  │   │ bonus_config()│    │ FixedBonusRepo     │  │            │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (sales.db)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sales_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("sales.db")).await?;
//!
//! let config = db.bonus_config().await?;
//! let targets = db.targets().list_by_period(period).await?;
//! let summary = sales_core::team::calculate_team(&targets, &config)?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::bonus_tier::BonusTierRepository;
pub use repository::fixed_bonus::FixedBonusRepository;
pub use repository::target::{Achievement, TargetRepository};
