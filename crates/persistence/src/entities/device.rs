//! Device entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{HardwareConfig, Thresholds};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for device_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "device_status", rename_all = "lowercase")]
pub enum DeviceStatusDb {
    Online,
    Offline,
    Maintenance,
}

impl From<DeviceStatusDb> for domain::models::DeviceStatus {
    fn from(db: DeviceStatusDb) -> Self {
        match db {
            DeviceStatusDb::Online => Self::Online,
            DeviceStatusDb::Offline => Self::Offline,
            DeviceStatusDb::Maintenance => Self::Maintenance,
        }
    }
}

impl From<domain::models::DeviceStatus> for DeviceStatusDb {
    fn from(domain: domain::models::DeviceStatus) -> Self {
        match domain {
            domain::models::DeviceStatus::Online => Self::Online,
            domain::models::DeviceStatus::Offline => Self::Offline,
            domain::models::DeviceStatus::Maintenance => Self::Maintenance,
        }
    }
}

/// Database row mapping for the devices table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceEntity {
    pub id: Uuid,
    pub name: String,
    pub mac_address: String,
    pub sensor_type: String,
    pub unit: String,
    pub status: DeviceStatusDb,
    pub value: f64,
    pub company_id: Uuid,
    pub location: Option<String>,
    pub threshold_min: Option<f64>,
    pub threshold_max: Option<f64>,
    pub hardware_config: Option<Json<HardwareConfig>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_seen_at: Option<DateTime<Utc>>,
}

impl From<DeviceEntity> for domain::models::Device {
    fn from(entity: DeviceEntity) -> Self {
        let thresholds = match (entity.threshold_min, entity.threshold_max) {
            (Some(min), Some(max)) => Some(Thresholds { min, max }),
            _ => None,
        };

        Self {
            id: entity.id,
            name: entity.name,
            mac_address: entity.mac_address,
            sensor_type: entity.sensor_type,
            unit: entity.unit,
            status: entity.status.into(),
            value: entity.value,
            company_id: entity.company_id,
            location: entity.location,
            thresholds,
            hardware_config: entity.hardware_config.map(|json| json.0),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            last_seen_at: entity.last_seen_at,
        }
    }
}
