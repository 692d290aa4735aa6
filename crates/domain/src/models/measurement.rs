//! Measurement log and ingest payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::validation::validate_device_key;

/// Default number of rows returned by history queries.
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Upper bound for the `limit` query parameter.
pub const MAX_HISTORY_LIMIT: i64 = 500;

/// One appended reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    pub id: i64,
    pub device_key: String,
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Point in a device's history, as the legacy API reports it.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryPoint {
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

impl From<Measurement> for HistoryPoint {
    fn from(m: Measurement) -> Self {
        Self {
            value: m.value,
            timestamp: m.recorded_at,
        }
    }
}

/// Why an ingest body was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestRejection {
    #[error("body is not a JSON object")]
    NotAnObject,
    #[error("mac is missing or invalid")]
    InvalidMac,
    #[error("value is missing or not a finite number")]
    InvalidValue,
}

/// A reading pushed by a device.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReading {
    pub mac: String,
    pub value: f64,
}

impl IngestReading {
    /// Extracts a reading from an arbitrary JSON body.
    ///
    /// `value` may be a JSON number or a string holding a complete number;
    /// trailing garbage such as `"12abc"` is refused.
    pub fn from_json(body: &Value) -> Result<Self, IngestRejection> {
        let obj = body.as_object().ok_or(IngestRejection::NotAnObject)?;

        let mac = obj
            .get("mac")
            .and_then(Value::as_str)
            .filter(|mac| validate_device_key(mac).is_ok())
            .ok_or(IngestRejection::InvalidMac)?;

        let value = match obj.get("value") {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|v| v.is_finite())
        .ok_or(IngestRejection::InvalidValue)?;

        Ok(Self {
            mac: mac.to_string(),
            value,
        })
    }
}

/// Successful ingest reply.
#[derive(Debug, Clone, Serialize)]
pub struct IngestAck {
    pub status: &'static str,
    pub received: f64,
}

impl IngestAck {
    pub fn new(received: f64) -> Self {
        Self {
            status: "success",
            received,
        }
    }
}

/// Query parameters for the v1 measurements endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeasurementQuery {
    pub limit: Option<i64>,
}

impl MeasurementQuery {
    /// Requested limit, or `None` when out of range.
    pub fn effective_limit(&self) -> Option<i64> {
        match self.limit {
            None => Some(DEFAULT_HISTORY_LIMIT),
            Some(limit) if (1..=MAX_HISTORY_LIMIT).contains(&limit) => Some(limit),
            Some(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListMeasurementsResponse {
    pub data: Vec<Measurement>,
}
