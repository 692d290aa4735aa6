//! Measurement retention.

use chrono::Utc;
use persistence::repositories::MeasurementRepository;
use sqlx::PgPool;
use tracing::info;

use super::scheduler::{Job, JobFrequency};

const BATCH_SIZE: i64 = 10_000;

/// Deletes measurements older than the retention window, in batches.
///
/// Only registered when `jobs.measurement_retention_days > 0`.
pub struct MeasurementRetentionJob {
    measurements: MeasurementRepository,
    retention_days: u32,
}

impl MeasurementRetentionJob {
    pub fn new(pool: PgPool, retention_days: u32) -> Self {
        Self {
            measurements: MeasurementRepository::new(pool),
            retention_days,
        }
    }
}

#[async_trait::async_trait]
impl Job for MeasurementRetentionJob {
    fn name(&self) -> &'static str {
        "measurement_retention"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Hourly
    }

    async fn execute(&self) -> Result<(), String> {
        let cutoff = Utc::now() - chrono::Duration::days(i64::from(self.retention_days));
        let deleted = self
            .measurements
            .delete_older_than(cutoff, BATCH_SIZE)
            .await
            .map_err(|e| format!("Failed to delete old measurements: {}", e))?;

        info!(
            deleted,
            retention_days = self.retention_days,
            "Measurement retention completed"
        );
        metrics::counter!("measurements_deleted_total").increment(deleted);
        Ok(())
    }
}
