//! Measurement repository: the ingest write path and history reads.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::entities::MeasurementEntity;
use crate::metrics::QueryTimer;

/// Result of recording one reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngestOutcome {
    pub measurement_id: i64,
    pub recorded_at: DateTime<Utc>,
    /// Whether a registered device carried the reading's identifier.
    pub device_matched: bool,
}

/// Repository for measurement-related database operations.
#[derive(Clone)]
pub struct MeasurementRepository {
    pool: PgPool,
}

impl MeasurementRepository {
    /// Creates a new MeasurementRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a reading and refresh the matching device's snapshot.
    ///
    /// Both writes share one transaction. A reading for an unknown identifier
    /// is still appended; no device row changes.
    pub async fn ingest(&self, device_key: &str, value: f64) -> Result<IngestOutcome, sqlx::Error> {
        let timer = QueryTimer::new("ingest_measurement");
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let (measurement_id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO measurements (device_key, value, recorded_at)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(device_key)
        .bind(value)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let updated = sqlx::query(
            r#"
            UPDATE devices
            SET value = $2, status = 'online', last_seen_at = $3, updated_at = $3
            WHERE mac_address = $1
            "#,
        )
        .bind(device_key)
        .bind(value)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(IngestOutcome {
            measurement_id,
            recorded_at: now,
            device_matched: updated.rows_affected() > 0,
        })
    }

    /// Most recent readings for an identifier, newest first.
    pub async fn history(
        &self,
        device_key: &str,
        limit: i64,
    ) -> Result<Vec<MeasurementEntity>, sqlx::Error> {
        let timer = QueryTimer::new("measurement_history");
        let result = sqlx::query_as::<_, MeasurementEntity>(
            r#"
            SELECT id, device_key, value, recorded_at
            FROM measurements
            WHERE device_key = $1
            ORDER BY recorded_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(device_key)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete readings older than `cutoff`, in batches to avoid long locks.
    pub async fn delete_older_than(
        &self,
        cutoff: DateTime<Utc>,
        batch_size: i64,
    ) -> Result<u64, sqlx::Error> {
        let batch_size = batch_size.max(1);
        let mut total_deleted: u64 = 0;

        loop {
            let timer = QueryTimer::new("delete_old_measurements");
            let result = sqlx::query(
                r#"
                WITH to_delete AS (
                    SELECT id FROM measurements
                    WHERE recorded_at < $1
                    LIMIT $2
                )
                DELETE FROM measurements
                WHERE id IN (SELECT id FROM to_delete)
                "#,
            )
            .bind(cutoff)
            .bind(batch_size)
            .execute(&self.pool)
            .await?;
            timer.record();

            let deleted = result.rows_affected();
            total_deleted += deleted;

            if deleted < batch_size as u64 {
                break;
            }

            tokio::task::yield_now().await;
        }

        Ok(total_deleted)
    }
}
