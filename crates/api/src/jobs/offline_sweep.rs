//! Marks silent devices offline.

use chrono::Utc;
use persistence::repositories::DeviceRepository;
use sqlx::PgPool;
use tracing::info;

use super::scheduler::{Job, JobFrequency};

const MAX_WINDOW_SECS: i64 = 365 * 24 * 3600;

/// Flips `online` devices to `offline` once nothing has arrived for
/// `offline_after_secs`. Devices in maintenance are never touched.
pub struct OfflineSweepJob {
    devices: DeviceRepository,
    offline_after: chrono::Duration,
}

impl OfflineSweepJob {
    pub fn new(pool: PgPool, offline_after_secs: u64) -> Self {
        Self {
            devices: DeviceRepository::new(pool),
            offline_after: offline_cutoff_window(offline_after_secs),
        }
    }
}

fn offline_cutoff_window(offline_after_secs: u64) -> chrono::Duration {
    let secs = i64::try_from(offline_after_secs).unwrap_or(MAX_WINDOW_SECS);
    chrono::Duration::seconds(secs.clamp(1, MAX_WINDOW_SECS))
}

#[async_trait::async_trait]
impl Job for OfflineSweepJob {
    fn name(&self) -> &'static str {
        "offline_sweep"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(1)
    }

    fn run_on_start(&self) -> bool {
        true
    }

    async fn execute(&self) -> Result<(), String> {
        let cutoff = Utc::now() - self.offline_after;
        let changed = self
            .devices
            .mark_stale_offline(cutoff)
            .await
            .map_err(|e| format!("Failed to mark stale devices offline: {}", e))?;

        if changed > 0 {
            info!(devices = changed, cutoff = %cutoff, "Marked silent devices offline");
        }
        metrics::counter!("devices_marked_offline_total").increment(changed);
        Ok(())
    }
}
