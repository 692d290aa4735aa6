//! Domain services for SensorHub.
//!
//! Services contain business logic that operates on domain models.

pub mod alarm;
pub mod firmware;

pub use firmware::{
    build_prompt, FirmwareError, FirmwareGenerator, FirmwarePrompt, GeneratedFirmware,
    MockFirmwareGenerator,
};
