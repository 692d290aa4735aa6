//! Device domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::validation::{validate_device_key, validate_threshold_band};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::hardware::HardwareConfig;
use crate::services::alarm;

/// Connectivity state of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
    Maintenance,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Online => "online",
            DeviceStatus::Offline => "offline",
            DeviceStatus::Maintenance => "maintenance",
        }
    }
}

impl FromStr for DeviceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "online" => Ok(DeviceStatus::Online),
            "offline" => Ok(DeviceStatus::Offline),
            "maintenance" => Ok(DeviceStatus::Maintenance),
            _ => Err(format!("Invalid device status: {}", s)),
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Alarm band for a device's readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_band"))]
pub struct Thresholds {
    pub min: f64,
    pub max: f64,
}

fn validate_band(t: &Thresholds) -> Result<(), validator::ValidationError> {
    validate_threshold_band(t.min, t.max)
}

/// A registered sensor device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: Uuid,
    pub name: String,
    pub mac_address: String,
    pub sensor_type: String,
    pub unit: String,
    pub status: DeviceStatus,
    pub value: f64,
    pub company_id: Uuid,
    pub location: Option<String>,
    pub thresholds: Option<Thresholds>,
    pub hardware_config: Option<HardwareConfig>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_seen_at: Option<DateTime<Utc>>,
}

impl Device {
    pub fn is_alarm(&self) -> bool {
        alarm::is_alarm(self.value, self.thresholds.as_ref(), self.last_seen_at.is_some())
    }

    pub fn progress(&self) -> f64 {
        alarm::progress(self.value, self.thresholds.as_ref())
    }
}

/// Device as returned by the v1 API, with derived gauge fields.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceResponse {
    #[serde(flatten)]
    pub device: Device,
    pub alarm: bool,
    pub progress: f64,
}

impl From<Device> for DeviceResponse {
    fn from(device: Device) -> Self {
        let alarm = device.is_alarm();
        let progress = device.progress();
        Self {
            device,
            alarm,
            progress,
        }
    }
}

/// Request payload for device registration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDeviceRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(custom(function = "validate_device_key"))]
    pub mac_address: String,

    #[validate(length(min = 1, max = 50, message = "Sensor type must be 1-50 characters"))]
    pub sensor_type: String,

    #[serde(default)]
    #[validate(length(max = 20, message = "Unit must be at most 20 characters"))]
    pub unit: String,

    /// Required for admins; clients default to their own company.
    pub company_id: Option<Uuid>,

    #[validate(length(max = 255, message = "Location must be at most 255 characters"))]
    pub location: Option<String>,

    #[validate(nested)]
    pub thresholds: Option<Thresholds>,

    #[validate(nested)]
    pub hardware_config: Option<HardwareConfig>,
}

/// Partial update of a device; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDeviceRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_device_key"))]
    pub mac_address: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Sensor type must be 1-50 characters"))]
    pub sensor_type: Option<String>,

    #[validate(length(max = 20, message = "Unit must be at most 20 characters"))]
    pub unit: Option<String>,

    pub status: Option<DeviceStatus>,

    pub company_id: Option<Uuid>,

    #[validate(length(max = 255, message = "Location must be at most 255 characters"))]
    pub location: Option<String>,

    #[validate(nested)]
    pub thresholds: Option<Thresholds>,

    #[validate(nested)]
    pub hardware_config: Option<HardwareConfig>,
}

/// Query parameters for device listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListDevicesQuery {
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListDevicesResponse {
    pub data: Vec<DeviceResponse>,
}

/// Row shape of the legacy `get_devices` action.
#[derive(Debug, Clone, Serialize)]
pub struct LegacyDeviceSummary {
    pub id: Uuid,
    pub name: String,
    pub mac_address: String,
    pub value: f64,
    pub status: DeviceStatus,
    pub unit: String,
    pub company_id: Uuid,
}

impl From<Device> for LegacyDeviceSummary {
    fn from(device: Device) -> Self {
        Self {
            id: device.id,
            name: device.name,
            mac_address: device.mac_address,
            value: device.value,
            status: device.status,
            unit: device.unit,
            company_id: device.company_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_device() -> Device {
        Device {
            id: Uuid::new_v4(),
            name: "Estanque Norte".to_string(),
            mac_address: "7C:9E:BD:ED:32:01".to_string(),
            sensor_type: "level".to_string(),
            unit: "%".to_string(),
            status: DeviceStatus::Online,
            value: 85.0,
            company_id: Uuid::new_v4(),
            location: None,
            thresholds: Some(Thresholds { min: 10.0, max: 90.0 }),
            hardware_config: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_seen_at: Some(Utc::now()),
        }
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_value(DeviceStatus::Maintenance).unwrap(), "maintenance");
        assert_eq!(DeviceStatus::from_str("ONLINE").unwrap(), DeviceStatus::Online);
        assert!(DeviceStatus::from_str("unknown").is_err());
    }

    #[test]
    fn test_response_flattens_device() {
        let response = DeviceResponse::from(sample_device());
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["mac_address"], "7C:9E:BD:ED:32:01");
        assert_eq!(value["alarm"], false);
        assert_eq!(value["progress"], 93.75);
    }

    #[test]
    fn test_response_alarm_above_max() {
        let mut device = sample_device();
        device.value = 95.0;
        let response = DeviceResponse::from(device);
        assert!(response.alarm);
        assert_eq!(response.progress, 100.0);
    }

    #[test]
    fn test_create_request_validation() {
        let req: CreateDeviceRequest = serde_json::from_value(json!({
            "name": "Presion Linea 2",
            "mac_address": "356938035643809",
            "sensor_type": "pressure",
            "unit": "bar",
            "thresholds": { "min": 1.5, "max": 6.0 }
        }))
        .unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_inverted_thresholds() {
        let req: CreateDeviceRequest = serde_json::from_value(json!({
            "name": "Presion Linea 2",
            "mac_address": "356938035643809",
            "sensor_type": "pressure",
            "thresholds": { "min": 6.0, "max": 1.5 }
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_blank_mac() {
        let req: CreateDeviceRequest = serde_json::from_value(json!({
            "name": "Sin MAC",
            "mac_address": "  ",
            "sensor_type": "flow"
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("mac_address"));
    }

    #[test]
    fn test_legacy_summary_fields() {
        let device = sample_device();
        let id = device.id;
        let value = serde_json::to_value(LegacyDeviceSummary::from(device)).unwrap();

        assert_eq!(value["id"], id.to_string());
        assert_eq!(value["status"], "online");
        assert!(value.get("thresholds").is_none());
        assert!(value.get("last_seen_at").is_none());
    }
}
