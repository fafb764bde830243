//! # Fixed Bonus Repository
//!
//! Database operations for flat bonus amounts keyed by name.

use chrono::Utc;
use sales_core::validation::{validate_fixed_bonus_key, validate_non_negative_money};
use sales_core::{FixedBonus, Money};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Raw `fixed_bonuses` row.
#[derive(Debug, sqlx::FromRow)]
struct FixedBonusRow {
    key: String,
    value_cents: i64,
    description: Option<String>,
}

impl From<FixedBonusRow> for FixedBonus {
    fn from(row: FixedBonusRow) -> Self {
        FixedBonus {
            key: row.key,
            value: Money::from_cents(row.value_cents),
            description: row.description,
        }
    }
}

/// Repository for fixed bonus database operations.
#[derive(Debug, Clone)]
pub struct FixedBonusRepository {
    pool: SqlitePool,
}

impl FixedBonusRepository {
    /// Creates a new FixedBonusRepository.
    pub fn new(pool: SqlitePool) -> Self {
        FixedBonusRepository { pool }
    }

    /// Lists all fixed bonuses ordered by key.
    pub async fn list(&self) -> DbResult<Vec<FixedBonus>> {
        let rows = sqlx::query_as::<_, FixedBonusRow>(
            "SELECT key, value_cents, description FROM fixed_bonuses ORDER BY key",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FixedBonus::from).collect())
    }

    /// Gets a fixed bonus by key.
    pub async fn get(&self, key: &str) -> DbResult<Option<FixedBonus>> {
        let row = sqlx::query_as::<_, FixedBonusRow>(
            "SELECT key, value_cents, description FROM fixed_bonuses WHERE key = ?1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(FixedBonus::from))
    }

    /// Inserts or replaces a fixed bonus.
    pub async fn upsert(&self, bonus: &FixedBonus) -> DbResult<()> {
        validate_fixed_bonus_key(&bonus.key)?;
        validate_non_negative_money("value", bonus.value)?;

        debug!(key = %bonus.key, value = %bonus.value, "Upserting fixed bonus");

        sqlx::query(
            r#"
            INSERT INTO fixed_bonuses (key, value_cents, description, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(key) DO UPDATE SET
                value_cents = excluded.value_cents,
                description = excluded.description,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&bonus.key)
        .bind(bonus.value.cents())
        .bind(&bonus.description)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a fixed bonus by key.
    pub async fn delete(&self, key: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM fixed_bonuses WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("FixedBonus", key));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
