//! Firmware generation.

use axum::{
    extract::{Extension, State},
    Json,
};
use domain::models::HardwareConfig;
use domain::services::{build_prompt, FirmwareError, GeneratedFirmware};
use tracing::{error, info};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_firmware_generation;

impl From<FirmwareError> for ApiError {
    fn from(err: FirmwareError) -> Self {
        match err {
            FirmwareError::Disabled => {
                ApiError::ServiceUnavailable("Firmware generation is disabled".to_string())
            }
            FirmwareError::Upstream(cause) | FirmwareError::InvalidResponse(cause) => {
                error!(cause = %cause, "Firmware generation failed");
                ApiError::ServiceUnavailable("Firmware generator unavailable".to_string())
            }
        }
    }
}

/// POST /api/v1/firmware/generate
///
/// Validates the hardware selection, builds the prompt and asks the generator
/// for a sketch.
pub async fn generate_firmware(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Json(config): Json<HardwareConfig>,
) -> Result<Json<GeneratedFirmware>, ApiError> {
    auth.require_write()?;
    config.validate()?;

    let generator = state.firmware.as_ref().ok_or_else(|| {
        record_firmware_generation("disabled");
        ApiError::from(FirmwareError::Disabled)
    })?;

    let prompt = build_prompt(&config);
    let firmware = generator.generate(&prompt).await.map_err(|e| {
        record_firmware_generation("failed");
        ApiError::from(e)
    })?;

    record_firmware_generation("success");
    info!(
        user_id = %auth.user_id(),
        hardware = config.hardware.label(),
        protocol = config.protocol.label(),
        code_len = firmware.code.len(),
        "Generated firmware"
    );

    Ok(Json(firmware))
}
