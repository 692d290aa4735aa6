//! Common validation utilities.

use chrono::NaiveDate;
use validator::ValidationError;

/// Maximum length of a device identifier (MAC, IMEI or similar).
pub const MAX_DEVICE_KEY_LENGTH: usize = 64;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validates a device identifier.
///
/// Identifiers are join keys between readings and device records, so they are
/// compared verbatim; only blank, overlong or control-character values are refused.
pub fn validate_device_key(key: &str) -> Result<(), ValidationError> {
    if key.trim().is_empty() {
        return Err(error("device_key_blank", "Device identifier must not be blank"));
    }
    if key.chars().count() > MAX_DEVICE_KEY_LENGTH {
        return Err(error(
            "device_key_length",
            "Device identifier must be at most 64 characters",
        ));
    }
    if key.chars().any(char::is_control) {
        return Err(error(
            "device_key_chars",
            "Device identifier must not contain control characters",
        ));
    }
    Ok(())
}

/// Validates that a reading is a finite number.
pub fn validate_finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(error("not_finite", "Value must be a finite number"))
    }
}

/// Validates an alarm band: both bounds finite and `min < max`.
pub fn validate_threshold_band(min: f64, max: f64) -> Result<(), ValidationError> {
    validate_finite(min)?;
    validate_finite(max)?;
    if min < max {
        Ok(())
    } else {
        Err(error(
            "threshold_order",
            "Threshold min must be lower than max",
        ))
    }
}

/// Validates that a service period does not end before it starts.
pub fn validate_service_period(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(error(
            "service_period",
            "Service end date cannot precede start date",
        )),
        _ => Ok(()),
    }
}
