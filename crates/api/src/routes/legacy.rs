//! Read-only `api.php` surface used by the dashboard.
//!
//! Unauthenticated. Every input is bound as a query parameter.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::device::{Device, LegacyDeviceSummary};
use domain::models::measurement::{HistoryPoint, Measurement, DEFAULT_HISTORY_LIMIT};
use persistence::repositories::{DeviceRepository, MeasurementRepository};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LegacyQuery {
    pub action: Option<String>,
    pub company_id: Option<String>,
    pub mac: Option<String>,
}

/// How the `company_id` parameter narrows `get_devices`.
#[derive(Debug, PartialEq, Eq)]
enum CompanyFilter {
    All,
    Only(Uuid),
    Nothing,
}

fn company_filter(raw: Option<&str>) -> CompanyFilter {
    match raw.map(str::trim) {
        None | Some("") => CompanyFilter::All,
        Some(raw) => Uuid::parse_str(raw)
            .map(CompanyFilter::Only)
            .unwrap_or(CompanyFilter::Nothing),
    }
}

fn internal_error(e: sqlx::Error) -> Response {
    tracing::error!(error = %e, "Legacy API query failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "status": "error", "message": "Internal error" })),
    )
        .into_response()
}

/// GET /api.php?action=get_devices|get_history
pub async fn legacy_api(State(state): State<AppState>, Query(query): Query<LegacyQuery>) -> Response {
    match query.action.as_deref() {
        Some("get_devices") => get_devices(&state, query.company_id.as_deref()).await,
        Some("get_history") => get_history(&state, query.mac.as_deref()).await,
        _ => Json(json!({
            "status": "online",
            "version": env!("CARGO_PKG_VERSION"),
        }))
        .into_response(),
    }
}

async fn get_devices(state: &AppState, company_id: Option<&str>) -> Response {
    let scope = match company_filter(company_id) {
        CompanyFilter::All => None,
        CompanyFilter::Only(id) => Some(id),
        CompanyFilter::Nothing => return Json(Vec::<LegacyDeviceSummary>::new()).into_response(),
    };

    match DeviceRepository::new(state.pool.clone()).list(scope).await {
        Ok(devices) => Json(
            devices
                .into_iter()
                .map(|entity| LegacyDeviceSummary::from(Device::from(entity)))
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => internal_error(e),
    }
}

async fn get_history(state: &AppState, mac: Option<&str>) -> Response {
    let mac = match mac {
        Some(mac) if !mac.trim().is_empty() => mac,
        _ => return Json(Vec::<HistoryPoint>::new()).into_response(),
    };

    match MeasurementRepository::new(state.pool.clone())
        .history(mac, DEFAULT_HISTORY_LIMIT)
        .await
    {
        Ok(rows) => Json(
            rows.into_iter()
                .map(|entity| HistoryPoint::from(Measurement::from(entity)))
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => internal_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_filter() {
        let id = Uuid::new_v4();
        assert_eq!(company_filter(None), CompanyFilter::All);
        assert_eq!(company_filter(Some("")), CompanyFilter::All);
        assert_eq!(company_filter(Some(&id.to_string())), CompanyFilter::Only(id));
        assert_eq!(company_filter(Some("1 OR 1=1")), CompanyFilter::Nothing);
    }
}
