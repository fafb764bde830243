//! # Target Repository
//!
//! Database operations for per-period salesperson targets.
//!
//! ## Target Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Target Lifecycle                                  │
//! │                                                                         │
//! │  1. SET GOALS (start of period)                                        │
//! │     └── insert() → Target { achieved_* = 0 }                           │
//! │     └── update_targets() → adjust *_target fields                      │
//! │                                                                         │
//! │  2. RECORD ACTUALS (during / after period)                             │
//! │     └── record_achievement() → only achieved_* fields change           │
//! │                                                                         │
//! │  3. CALCULATE (any time, repeatable)                                   │
//! │     └── list_by_period() → calculate_team()                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sales_core::validation::{validate_non_negative_count, validate_non_negative_money, validate_target};
use sales_core::{Money, Period, Target};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

const TABLE: &str = "targets";

const COLUMNS: &str = "id, sales_person_id, period, \
    sales_target_cents, achieved_sales_cents, \
    collection_target_cents, achieved_collection_cents, \
    unit_target, achieved_units, new_customer_target, achieved_new_customers, \
    created_at, updated_at";

/// Actual figures recorded for a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Achievement {
    pub achieved_sales: Money,
    pub achieved_collection: Money,
    pub achieved_units: i64,
    pub achieved_new_customers: i64,
}

/// Raw `targets` row.
#[derive(Debug, sqlx::FromRow)]
struct TargetRow {
    id: String,
    sales_person_id: String,
    period: String,
    sales_target_cents: i64,
    achieved_sales_cents: i64,
    collection_target_cents: i64,
    achieved_collection_cents: i64,
    unit_target: i64,
    achieved_units: i64,
    new_customer_target: i64,
    achieved_new_customers: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TargetRow> for Target {
    type Error = DbError;

    fn try_from(row: TargetRow) -> Result<Self, Self::Error> {
        let period: Period = row
            .period
            .parse()
            .map_err(|e| DbError::corrupt(TABLE, &row.id, e))?;

        Ok(Target {
            id: row.id,
            sales_person_id: row.sales_person_id,
            period,
            sales_target: Money::from_cents(row.sales_target_cents),
            achieved_sales: Money::from_cents(row.achieved_sales_cents),
            collection_target: Money::from_cents(row.collection_target_cents),
            achieved_collection: Money::from_cents(row.achieved_collection_cents),
            unit_target: row.unit_target,
            achieved_units: row.achieved_units,
            new_customer_target: row.new_customer_target,
            achieved_new_customers: row.achieved_new_customers,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for target database operations.
#[derive(Debug, Clone)]
pub struct TargetRepository {
    pool: SqlitePool,
}

impl TargetRepository {
    /// Creates a new TargetRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TargetRepository { pool }
    }

    /// Gets the target of a salesperson for a period.
    ///
    /// ## Returns
    /// * `Ok(Some(Target))` - Target found
    /// * `Ok(None)` - No target recorded for that period
    pub async fn get(&self, sales_person_id: &str, period: Period) -> DbResult<Option<Target>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM targets WHERE sales_person_id = ?1 AND period = ?2"
        );

        let row = sqlx::query_as::<_, TargetRow>(&sql)
            .bind(sales_person_id)
            .bind(period.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Target::try_from).transpose()
    }

    /// Gets a target by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Target>> {
        let sql = format!("SELECT {COLUMNS} FROM targets WHERE id = ?1");

        let row = sqlx::query_as::<_, TargetRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Target::try_from).transpose()
    }

    /// Lists every target of a period, ordered by salesperson.
    pub async fn list_by_period(&self, period: Period) -> DbResult<Vec<Target>> {
        debug!(%period, "Listing targets");

        let sql = format!(
            "SELECT {COLUMNS} FROM targets WHERE period = ?1 ORDER BY sales_person_id"
        );

        let rows = sqlx::query_as::<_, TargetRow>(&sql)
            .bind(period.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Target::try_from).collect()
    }

    /// Inserts a new target.
    ///
    /// ## Returns
    /// * `Err(DbError::Validation)` - Negative figure or malformed salesperson ID
    /// * `Err(DbError::UniqueViolation)` - Salesperson already has a target for the period
    pub async fn insert(&self, target: &Target) -> DbResult<Target> {
        validate_target(target)?;

        debug!(
            sales_person_id = %target.sales_person_id,
            period = %target.period,
            "Inserting target"
        );

        sqlx::query(
            r#"
            INSERT INTO targets (
                id, sales_person_id, period,
                sales_target_cents, achieved_sales_cents,
                collection_target_cents, achieved_collection_cents,
                unit_target, achieved_units,
                new_customer_target, achieved_new_customers,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3,
                ?4, ?5,
                ?6, ?7,
                ?8, ?9,
                ?10, ?11,
                ?12, ?13
            )
            "#,
        )
        .bind(&target.id)
        .bind(&target.sales_person_id)
        .bind(target.period.to_string())
        .bind(target.sales_target.cents())
        .bind(target.achieved_sales.cents())
        .bind(target.collection_target.cents())
        .bind(target.achieved_collection.cents())
        .bind(target.unit_target)
        .bind(target.achieved_units)
        .bind(target.new_customer_target)
        .bind(target.achieved_new_customers)
        .bind(target.created_at)
        .bind(target.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(target.clone())
    }

    /// Updates the goal fields (`*_target`) of an existing record.
    ///
    /// Achieved figures are left untouched.
    pub async fn update_targets(&self, target: &Target) -> DbResult<()> {
        validate_target(target)?;

        debug!(id = %target.id, "Updating target goals");

        let result = sqlx::query(
            r#"
            UPDATE targets SET
                sales_target_cents = ?2,
                collection_target_cents = ?3,
                unit_target = ?4,
                new_customer_target = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&target.id)
        .bind(target.sales_target.cents())
        .bind(target.collection_target.cents())
        .bind(target.unit_target)
        .bind(target.new_customer_target)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Target", &target.id));
        }

        Ok(())
    }

    /// Records actual figures for a salesperson's period.
    ///
    /// Only the `achieved_*` columns change.
    pub async fn record_achievement(
        &self,
        sales_person_id: &str,
        period: Period,
        achievement: Achievement,
    ) -> DbResult<()> {
        validate_non_negative_money("achieved_sales", achievement.achieved_sales)?;
        validate_non_negative_money("achieved_collection", achievement.achieved_collection)?;
        validate_non_negative_count("achieved_units", achievement.achieved_units)?;
        validate_non_negative_count(
            "achieved_new_customers",
            achievement.achieved_new_customers,
        )?;

        debug!(%sales_person_id, %period, "Recording achievement");

        let result = sqlx::query(
            r#"
            UPDATE targets SET
                achieved_sales_cents = ?3,
                achieved_collection_cents = ?4,
                achieved_units = ?5,
                achieved_new_customers = ?6,
                updated_at = ?7
            WHERE sales_person_id = ?1 AND period = ?2
            "#,
        )
        .bind(sales_person_id)
        .bind(period.to_string())
        .bind(achievement.achieved_sales.cents())
        .bind(achievement.achieved_collection.cents())
        .bind(achievement.achieved_units)
        .bind(achievement.achieved_new_customers)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "Target",
                format!("{sales_person_id}/{period}"),
            ));
        }

        Ok(())
    }

    /// Deletes a target by ID.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(%id, "Deleting target");

        let result = sqlx::query("DELETE FROM targets WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Target", id));
        }

        Ok(())
    }

    /// Counts all target records.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM targets")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
