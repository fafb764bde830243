//! # Bonus Tier Repository
//!
//! Database operations for commission schedules.
//!
//! Tiers are always read back in ascending `min_rate_bps` order (ties by
//! creation time, then ID) so the calculator's "first band wins" rule sees
//! the same order on every load.

use chrono::Utc;
use sales_core::validation::{validate_tier, validate_tier_schedule};
use sales_core::{BonusTier, Metric, Percentage, ValidationError};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

const TABLE: &str = "bonus_tiers";

/// Raw `bonus_tiers` row.
#[derive(Debug, sqlx::FromRow)]
struct TierRow {
    id: String,
    metric: Metric,
    min_rate_bps: i64,
    max_rate_bps: Option<i64>,
    bonus_rate_bps: i64,
}

impl TryFrom<TierRow> for BonusTier {
    type Error = DbError;

    fn try_from(row: TierRow) -> Result<Self, Self::Error> {
        let to_pct = |column: &str, bps: i64| {
            u32::try_from(bps)
                .map(Percentage::from_bps)
                .map_err(|_| DbError::corrupt(TABLE, &row.id, format!("{column} = {bps}")))
        };

        let min_rate = to_pct("min_rate_bps", row.min_rate_bps)?;
        let max_rate = row
            .max_rate_bps
            .map(|bps| to_pct("max_rate_bps", bps))
            .transpose()?;
        let bonus_rate = to_pct("bonus_rate_bps", row.bonus_rate_bps)?;

        Ok(BonusTier {
            id: row.id,
            metric: row.metric,
            min_rate,
            max_rate,
            bonus_rate,
        })
    }
}

/// Repository for bonus tier database operations.
#[derive(Debug, Clone)]
pub struct BonusTierRepository {
    pool: SqlitePool,
}

impl BonusTierRepository {
    /// Creates a new BonusTierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BonusTierRepository { pool }
    }

    /// Lists one schedule in ascending `min_rate` order.
    pub async fn list_for_metric(&self, metric: Metric) -> DbResult<Vec<BonusTier>> {
        let rows = sqlx::query_as::<_, TierRow>(
            r#"
            SELECT id, metric, min_rate_bps, max_rate_bps, bonus_rate_bps
            FROM bonus_tiers
            WHERE metric = ?1
            ORDER BY min_rate_bps ASC, created_at ASC, id ASC
            "#,
        )
        .bind(metric)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BonusTier::try_from).collect()
    }

    /// Lists every tier of every schedule.
    pub async fn list_all(&self) -> DbResult<Vec<BonusTier>> {
        let rows = sqlx::query_as::<_, TierRow>(
            r#"
            SELECT id, metric, min_rate_bps, max_rate_bps, bonus_rate_bps
            FROM bonus_tiers
            ORDER BY metric ASC, min_rate_bps ASC, created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BonusTier::try_from).collect()
    }

    /// Inserts a single tier.
    ///
    /// The tier is checked on its own (non-empty band, rate within 0-100%);
    /// use [`replace_schedule`](Self::replace_schedule) to enforce a
    /// gap-free, non-overlapping schedule.
    pub async fn insert(&self, tier: &BonusTier) -> DbResult<()> {
        validate_tier(tier)?;

        debug!(
            id = %tier.id,
            metric = %tier.metric,
            min_bps = tier.min_rate.bps(),
            "Inserting bonus tier"
        );

        sqlx::query(
            r#"
            INSERT INTO bonus_tiers (id, metric, min_rate_bps, max_rate_bps, bonus_rate_bps, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&tier.id)
        .bind(tier.metric)
        .bind(i64::from(tier.min_rate.bps()))
        .bind(tier.max_rate.map(|max| i64::from(max.bps())))
        .bind(i64::from(tier.bonus_rate.bps()))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Replaces a whole schedule atomically.
    ///
    /// ## What This Does
    /// 1. Validates the new schedule (no overlaps, no gaps, one metric)
    /// 2. Deletes the current tiers of the metric
    /// 3. Inserts the new tiers
    ///
    /// All in one transaction: readers see either the old or the new
    /// schedule, never a mix.
    pub async fn replace_schedule(&self, metric: Metric, tiers: &[BonusTier]) -> DbResult<()> {
        if let Some(stray) = tiers.iter().find(|t| t.metric != metric) {
            return Err(ValidationError::InvalidFormat {
                field: "metric".to_string(),
                reason: format!("tier {} belongs to {}, not {}", stray.id, stray.metric, metric),
            }
            .into());
        }
        validate_tier_schedule(tiers)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM bonus_tiers WHERE metric = ?1")
            .bind(metric)
            .execute(&mut *tx)
            .await?;

        let now = Utc::now();
        for tier in tiers {
            sqlx::query(
                r#"
                INSERT INTO bonus_tiers (id, metric, min_rate_bps, max_rate_bps, bonus_rate_bps, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&tier.id)
            .bind(tier.metric)
            .bind(i64::from(tier.min_rate.bps()))
            .bind(tier.max_rate.map(|max| i64::from(max.bps())))
            .bind(i64::from(tier.bonus_rate.bps()))
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(%metric, tiers = tiers.len(), "Bonus schedule replaced");
        Ok(())
    }

    /// Deletes a tier by ID.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(%id, "Deleting bonus tier");

        let result = sqlx::query("DELETE FROM bonus_tiers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("BonusTier", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn tier(metric: Metric, min: u32, max: Option<u32>, rate: u32) -> BonusTier {
        BonusTier::new(
            metric,
            Percentage::from_percent(min),
            max.map(Percentage::from_percent),
            Percentage::from_percent(rate),
        )
    }

    async fn repo() -> BonusTierRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().bonus_tiers()
    }

    #[tokio::test]
    async fn test_list_for_metric_is_ascending() {
        let repo = repo().await;
        repo.insert(&tier(Metric::Sales, 100, None, 6)).await.unwrap();
        repo.insert(&tier(Metric::Sales, 0, Some(80), 2)).await.unwrap();
        repo.insert(&tier(Metric::Sales, 80, Some(100), 4)).await.unwrap();
        repo.insert(&tier(Metric::Collection, 0, None, 3)).await.unwrap();

        let sales = repo.list_for_metric(Metric::Sales).await.unwrap();
        let mins: Vec<u32> = sales.iter().map(|t| t.min_rate.bps()).collect();
        assert_eq!(mins, vec![0, 8000, 10000]);
        assert_eq!(sales[2].max_rate, None);

        assert_eq!(repo.list_all().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_insert_rejects_empty_band() {
        let repo = repo().await;
        let err = repo
            .insert(&tier(Metric::Sales, 100, Some(80), 4))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_replace_schedule() {
        let repo = repo().await;
        repo.insert(&tier(Metric::Sales, 0, None, 1)).await.unwrap();
        repo.insert(&tier(Metric::Collection, 0, None, 3)).await.unwrap();

        let schedule = vec![tier(Metric::Sales, 0, Some(100), 2), tier(Metric::Sales, 100, None, 5)];
        repo.replace_schedule(Metric::Sales, &schedule).await.unwrap();

        let sales = repo.list_for_metric(Metric::Sales).await.unwrap();
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[1].bonus_rate, Percentage::from_percent(5));
        // Other schedule untouched
        assert_eq!(repo.list_for_metric(Metric::Collection).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_replace_schedule_rejects_gap_and_keeps_old() {
        let repo = repo().await;
        repo.insert(&tier(Metric::Sales, 0, None, 1)).await.unwrap();

        let gapped = vec![tier(Metric::Sales, 0, Some(80), 2), tier(Metric::Sales, 90, None, 5)];
        let err = repo.replace_schedule(Metric::Sales, &gapped).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(ValidationError::TierGap { .. })));

        assert_eq!(repo.list_for_metric(Metric::Sales).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_replace_schedule_rejects_wrong_metric() {
        let repo = repo().await;
        let mixed = vec![tier(Metric::Collection, 0, None, 2)];
        assert!(repo.replace_schedule(Metric::Sales, &mixed).await.is_err());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo().await;
        let t = tier(Metric::Sales, 0, None, 1);
        repo.insert(&t).await.unwrap();

        repo.delete(&t.id).await.unwrap();
        assert!(matches!(repo.delete(&t.id).await, Err(DbError::NotFound { .. })));
    }
}
