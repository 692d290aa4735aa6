//! Device reading ingest.
//!
//! Devices post `{"mac": "...", "value": ...}`. The body is parsed by hand so a
//! missing or wrong `Content-Type` does not turn into a framework rejection,
//! and every reply keeps the `{"status": ..., ...}` envelope devices expect.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::measurement::{IngestAck, IngestReading, IngestRejection};
use persistence::repositories::MeasurementRepository;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::app::AppState;
use crate::middleware::metrics::{record_ingest_rejected, record_measurement_ingested};

fn envelope_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "status": "error", "message": message }))).into_response()
}

fn rejection_reason(rejection: &IngestRejection) -> &'static str {
    match rejection {
        IngestRejection::NotAnObject => "not_an_object",
        IngestRejection::InvalidMac => "invalid_mac",
        IngestRejection::InvalidValue => "invalid_value",
    }
}

/// POST /api/iot_backend.php, POST /api/v1/ingest
pub async fn ingest(State(state): State<AppState>, body: Bytes) -> Response {
    let reading = serde_json::from_slice::<Value>(&body)
        .map_err(|_| IngestRejection::NotAnObject)
        .and_then(|value| IngestReading::from_json(&value));

    let reading = match reading {
        Ok(reading) => reading,
        Err(rejection) => {
            debug!(reason = %rejection, "Rejected reading");
            record_ingest_rejected(rejection_reason(&rejection));
            return envelope_error(StatusCode::BAD_REQUEST, "Invalid data");
        }
    };

    let outcome = match MeasurementRepository::new(state.pool.clone())
        .ingest(&reading.mac, reading.value)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, mac = %reading.mac, "Failed to record reading");
            return envelope_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal error");
        }
    };

    record_measurement_ingested(outcome.device_matched);
    if outcome.device_matched {
        debug!(
            mac = %reading.mac,
            value = reading.value,
            measurement_id = outcome.measurement_id,
            "Reading recorded"
        );
    } else {
        warn!(
            mac = %reading.mac,
            value = reading.value,
            measurement_id = outcome.measurement_id,
            "Reading for unregistered device recorded"
        );
    }

    (StatusCode::OK, Json(IngestAck::new(reading.value))).into_response()
}
