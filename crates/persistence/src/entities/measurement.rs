//! Measurement entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the measurements table.
#[derive(Debug, Clone, FromRow)]
pub struct MeasurementEntity {
    pub id: i64,
    pub device_key: String,
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
}

impl From<MeasurementEntity> for domain::models::Measurement {
    fn from(entity: MeasurementEntity) -> Self {
        Self {
            id: entity.id,
            device_key: entity.device_key,
            value: entity.value,
            recorded_at: entity.recorded_at,
        }
    }
}
