//! Hardware catalog.

use axum::Json;
use domain::models::hardware::{hardware_catalog, HardwareProfile};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HardwareProfilesResponse {
    pub data: Vec<HardwareProfile>,
}

/// GET /api/v1/hardware/profiles
pub async fn list_profiles() -> Json<HardwareProfilesResponse> {
    Json(HardwareProfilesResponse {
        data: hardware_catalog(),
    })
}
