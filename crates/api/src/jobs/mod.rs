//! Background job scheduler and job implementations.

mod measurement_retention;
mod offline_sweep;
mod pool_metrics;
mod rate_limit_prune;
mod scheduler;

pub use measurement_retention::MeasurementRetentionJob;
pub use offline_sweep::OfflineSweepJob;
pub use pool_metrics::PoolMetricsJob;
pub use rate_limit_prune::RateLimitPruneJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
