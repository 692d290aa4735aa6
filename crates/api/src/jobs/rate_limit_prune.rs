//! Drops idle ingest clients from the rate limiter.

use std::sync::Arc;
use tracing::debug;

use super::scheduler::{Job, JobFrequency};
use crate::middleware::RateLimiterState;

pub struct RateLimitPruneJob {
    limiter: Arc<RateLimiterState>,
}

impl RateLimitPruneJob {
    pub fn new(limiter: Arc<RateLimiterState>) -> Self {
        Self { limiter }
    }
}

#[async_trait::async_trait]
impl Job for RateLimitPruneJob {
    fn name(&self) -> &'static str {
        "rate_limit_prune"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(1)
    }

    async fn execute(&self) -> Result<(), String> {
        let pruned = self.limiter.prune_idle();
        let tracked = self.limiter.tracked_clients();
        if pruned > 0 {
            debug!(pruned, tracked, "Pruned idle rate limit clients");
        }
        metrics::gauge!("ingest_rate_limit_tracked_clients").set(tracked as f64);
        Ok(())
    }
}
