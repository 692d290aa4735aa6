//! Device repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::{HardwareConfig, Thresholds};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{DeviceEntity, DeviceStatusDb};
use crate::metrics::QueryTimer;

const DEVICE_COLUMNS: &str = r#"
    id, name, mac_address, sensor_type, unit, status, value, company_id, location,
    threshold_min, threshold_max, hardware_config, created_at, updated_at, last_seen_at
"#;

/// Fields for a new device. Status and value start at their defaults.
#[derive(Debug, Clone)]
pub struct NewDevice<'a> {
    pub name: &'a str,
    pub mac_address: &'a str,
    pub sensor_type: &'a str,
    pub unit: &'a str,
    pub company_id: Uuid,
    pub location: Option<&'a str>,
    pub thresholds: Option<Thresholds>,
    pub hardware_config: Option<&'a HardwareConfig>,
}

/// Partial device update. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct DeviceChanges<'a> {
    pub name: Option<&'a str>,
    pub mac_address: Option<&'a str>,
    pub sensor_type: Option<&'a str>,
    pub unit: Option<&'a str>,
    pub status: Option<DeviceStatusDb>,
    pub company_id: Option<Uuid>,
    pub location: Option<&'a str>,
    pub thresholds: Option<Thresholds>,
    pub hardware_config: Option<&'a HardwareConfig>,
}

/// Repository for device-related database operations.
#[derive(Clone)]
pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    /// Creates a new DeviceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a device. New devices start offline with a zero value.
    pub async fn create(&self, device: &NewDevice<'_>) -> Result<DeviceEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_device");
        let now = Utc::now();
        let result = sqlx::query_as::<_, DeviceEntity>(&format!(
            r#"
            INSERT INTO devices (
                name, mac_address, sensor_type, unit, status, value, company_id, location,
                threshold_min, threshold_max, hardware_config, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, 'offline', 0, $5, $6, $7, $8, $9, $10, $10)
            RETURNING {DEVICE_COLUMNS}
            "#
        ))
        .bind(device.name)
        .bind(device.mac_address)
        .bind(device.sensor_type)
        .bind(device.unit)
        .bind(device.company_id)
        .bind(device.location)
        .bind(device.thresholds.map(|t| t.min))
        .bind(device.thresholds.map(|t| t.max))
        .bind(device.hardware_config.map(Json))
        .bind(now)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a device by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<DeviceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_device_by_id");
        let result = sqlx::query_as::<_, DeviceEntity>(&format!(
            "SELECT {DEVICE_COLUMNS} FROM devices WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List devices sorted by name, optionally within one company.
    pub async fn list(&self, company_id: Option<Uuid>) -> Result<Vec<DeviceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_devices");
        let result = sqlx::query_as::<_, DeviceEntity>(&format!(
            r#"
            SELECT {DEVICE_COLUMNS}
            FROM devices
            WHERE ($1::uuid IS NULL OR company_id = $1)
            ORDER BY name ASC, id ASC
            "#
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Apply a partial update. Returns `None` if the device does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        changes: &DeviceChanges<'_>,
    ) -> Result<Option<DeviceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_device");
        let result = sqlx::query_as::<_, DeviceEntity>(&format!(
            r#"
            UPDATE devices SET
                name = COALESCE($2, name),
                mac_address = COALESCE($3, mac_address),
                sensor_type = COALESCE($4, sensor_type),
                unit = COALESCE($5, unit),
                status = COALESCE($6, status),
                company_id = COALESCE($7, company_id),
                location = COALESCE($8, location),
                threshold_min = COALESCE($9, threshold_min),
                threshold_max = COALESCE($10, threshold_max),
                hardware_config = COALESCE($11, hardware_config),
                updated_at = $12
            WHERE id = $1
            RETURNING {DEVICE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.mac_address)
        .bind(changes.sensor_type)
        .bind(changes.unit)
        .bind(changes.status)
        .bind(changes.company_id)
        .bind(changes.location)
        .bind(changes.thresholds.map(|t| t.min))
        .bind(changes.thresholds.map(|t| t.max))
        .bind(changes.hardware_config.map(Json))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replace a device's alarm band.
    pub async fn set_thresholds(
        &self,
        id: Uuid,
        thresholds: Thresholds,
    ) -> Result<Option<DeviceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_device_thresholds");
        let result = sqlx::query_as::<_, DeviceEntity>(&format!(
            r#"
            UPDATE devices
            SET threshold_min = $2, threshold_max = $3, updated_at = $4
            WHERE id = $1
            RETURNING {DEVICE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(thresholds.min)
        .bind(thresholds.max)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a device. Returns the number of rows affected.
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_device");
        let result = sqlx::query("DELETE FROM devices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Mark online devices silent since `cutoff` as offline.
    ///
    /// Devices in maintenance are left alone. Returns the number of devices changed.
    pub async fn mark_stale_offline(&self, cutoff: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("mark_stale_devices_offline");
        let result = sqlx::query(
            r#"
            UPDATE devices
            SET status = 'offline', updated_at = NOW()
            WHERE status = 'online'
              AND (last_seen_at IS NULL OR last_seen_at < $1)
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
