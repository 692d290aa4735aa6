//! Device endpoints.
//!
//! Every device belongs to exactly one company; access follows the caller's
//! company scope. Responses carry the derived `alarm` and `progress` fields.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::models::device::{
    CreateDeviceRequest, Device, DeviceResponse, ListDevicesQuery, ListDevicesResponse,
    Thresholds, UpdateDeviceRequest,
};
use domain::models::measurement::{
    ListMeasurementsResponse, Measurement, MeasurementQuery, MAX_HISTORY_LIMIT,
};
use persistence::repositories::{DeviceChanges, DeviceRepository, MeasurementRepository, NewDevice};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

async fn load_visible(
    repo: &DeviceRepository,
    auth: &UserAuth,
    device_id: Uuid,
) -> Result<Device, ApiError> {
    let device: Device = repo
        .find_by_id(device_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Device not found".to_string()))?
        .into();
    auth.ensure_visible(device.company_id, "Device")?;
    Ok(device)
}

/// GET /api/v1/devices[?company_id=]
pub async fn list_devices(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Query(query): Query<ListDevicesQuery>,
) -> Result<Json<ListDevicesResponse>, ApiError> {
    let scope = auth.list_scope(query.company_id)?;
    let devices = DeviceRepository::new(state.pool.clone())
        .list(scope)
        .await?
        .into_iter()
        .map(|entity| DeviceResponse::from(Device::from(entity)))
        .collect();

    Ok(Json(ListDevicesResponse { data: devices }))
}

/// POST /api/v1/devices
///
/// New devices start offline with a zero value. A duplicate `mac_address` is a 409.
pub async fn create_device(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Json(request): Json<CreateDeviceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_write()?;
    request.validate()?;
    let company_id = auth.target_company(request.company_id)?;

    let device: Device = DeviceRepository::new(state.pool.clone())
        .create(&NewDevice {
            name: &request.name,
            mac_address: &request.mac_address,
            sensor_type: &request.sensor_type,
            unit: &request.unit,
            company_id,
            location: request.location.as_deref(),
            thresholds: request.thresholds,
            hardware_config: request.hardware_config.as_ref(),
        })
        .await?
        .into();

    info!(
        user_id = %auth.user_id(),
        device_id = %device.id,
        company_id = %device.company_id,
        mac_address = %device.mac_address,
        "Registered device"
    );

    Ok((StatusCode::CREATED, Json(DeviceResponse::from(device))))
}

/// GET /api/v1/devices/:id
pub async fn get_device(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(device_id): Path<Uuid>,
) -> Result<Json<DeviceResponse>, ApiError> {
    let repo = DeviceRepository::new(state.pool.clone());
    let device = load_visible(&repo, &auth, device_id).await?;
    Ok(Json(device.into()))
}

/// PUT /api/v1/devices/:id
pub async fn update_device(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(device_id): Path<Uuid>,
    Json(request): Json<UpdateDeviceRequest>,
) -> Result<Json<DeviceResponse>, ApiError> {
    let repo = DeviceRepository::new(state.pool.clone());
    load_visible(&repo, &auth, device_id).await?;

    auth.require_write()?;
    request.validate()?;
    if request.company_id.is_some() {
        auth.target_company(request.company_id)?;
    }

    let device: Device = repo
        .update(
            device_id,
            &DeviceChanges {
                name: request.name.as_deref(),
                mac_address: request.mac_address.as_deref(),
                sensor_type: request.sensor_type.as_deref(),
                unit: request.unit.as_deref(),
                status: request.status.map(Into::into),
                company_id: request.company_id,
                location: request.location.as_deref(),
                thresholds: request.thresholds,
                hardware_config: request.hardware_config.as_ref(),
            },
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Device not found".to_string()))?
        .into();

    info!(user_id = %auth.user_id(), device_id = %device.id, "Updated device");

    Ok(Json(device.into()))
}

/// DELETE /api/v1/devices/:id
///
/// Recorded measurements are kept; they are keyed by identifier, not by device row.
pub async fn delete_device(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(device_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = DeviceRepository::new(state.pool.clone());
    let device = load_visible(&repo, &auth, device_id).await?;
    auth.require_write()?;

    if repo.delete(device_id).await? == 0 {
        return Err(ApiError::NotFound("Device not found".to_string()));
    }

    info!(
        user_id = %auth.user_id(),
        device_id = %device_id,
        mac_address = %device.mac_address,
        "Deleted device"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/devices/:id/thresholds
pub async fn update_thresholds(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(device_id): Path<Uuid>,
    Json(thresholds): Json<Thresholds>,
) -> Result<Json<DeviceResponse>, ApiError> {
    let repo = DeviceRepository::new(state.pool.clone());
    load_visible(&repo, &auth, device_id).await?;

    auth.require_write()?;
    thresholds.validate()?;

    let device: Device = repo
        .set_thresholds(device_id, thresholds)
        .await?
        .ok_or_else(|| ApiError::NotFound("Device not found".to_string()))?
        .into();

    info!(
        user_id = %auth.user_id(),
        device_id = %device.id,
        min = thresholds.min,
        max = thresholds.max,
        "Updated device thresholds"
    );

    Ok(Json(device.into()))
}

/// GET /api/v1/devices/:id/measurements?limit=
///
/// Newest first. `limit` defaults to 50 and must lie in `1..=500`.
pub async fn list_measurements(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(device_id): Path<Uuid>,
    Query(query): Query<MeasurementQuery>,
) -> Result<Json<ListMeasurementsResponse>, ApiError> {
    let limit = query.effective_limit().ok_or_else(|| {
        ApiError::Validation(format!("limit must be between 1 and {}", MAX_HISTORY_LIMIT))
    })?;

    let device = load_visible(&DeviceRepository::new(state.pool.clone()), &auth, device_id).await?;

    let measurements = MeasurementRepository::new(state.pool.clone())
        .history(&device.mac_address, limit)
        .await?
        .into_iter()
        .map(Measurement::from)
        .collect();

    Ok(Json(ListMeasurementsResponse { data: measurements }))
}
