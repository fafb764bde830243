//! # Repository Module
//!
//! Database repository implementations for the sales bonus engine.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  bonus-report                                                          │
//! │       │                                                                 │
//! │       │  db.targets().list_by_period(period)                           │
//! │       ▼                                                                 │
//! │  TargetRepository          BonusTierRepository    FixedBonusRepository │
//! │  ├── get / get_by_id       ├── list_for_metric    ├── list / get       │
//! │  ├── list_by_period        ├── list_all           ├── upsert           │
//! │  ├── insert                ├── insert             └── delete           │
//! │  ├── update_targets        ├── replace_schedule                        │
//! │  ├── record_achievement    └── delete                                  │
//! │  └── delete / count                                                     │
//! │       │                                                                 │
//! │       │  SQL Query (rows → sales-core types)                           │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod bonus_tier;
pub mod fixed_bonus;
pub mod target;
