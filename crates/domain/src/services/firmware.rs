//! Firmware generation: prompt construction and the generator seam.
//!
//! The prompt is a pure function of a [`HardwareConfig`]; the actual code is
//! produced by an external model behind [`FirmwareGenerator`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::hardware::{CommConfig, HardwareConfig};

const SYSTEM_INSTRUCTION: &str = "\
You are a senior embedded engineer. Produce robust, production-ready C++ for Arduino/PlatformIO.

HARDWARE RULES:
- LilyGO T-SIM7080-S3: the TinyGSM library is mandatory. Pins: TX=18, RX=17, PWR=41, BAT_ADC=4.
- Walter ESP32-S3: use the vendor modem library and wait for network registration before publishing.
- ESP32 boards and Raspberry Pi Pico W on WiFi: use <WiFi.h> with <PubSubClient.h> for MQTT or <HTTPClient.h> for HTTP.

CONNECTION RULES:
- MQTT: reconnect automatically inside loop().
- Cellular: wait for the network and attach with the given APN.

OUTPUT:
- Strict JSON with the fields \"code\" (the complete sketch) and \"explanation\" (a short technical summary).";

/// Instruction and prompt sent to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirmwarePrompt {
    pub system_instruction: String,
    pub prompt: String,
}

/// Generated sketch plus a technical summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFirmware {
    pub code: String,
    pub explanation: String,
}

/// Error type for firmware generation.
#[derive(Debug, Error)]
pub enum FirmwareError {
    #[error("Firmware generation is disabled")]
    Disabled,

    #[error("Upstream generator failed: {0}")]
    Upstream(String),

    #[error("Generator returned an unusable reply: {0}")]
    InvalidResponse(String),
}

/// Builds the generator input for a validated config.
pub fn build_prompt(config: &HardwareConfig) -> FirmwarePrompt {
    let link = if config.network_mode.is_cellular() {
        format!("APN: {}", config.apn())
    } else {
        format!(
            "WIFI SSID: {}, PASSWORD: {}",
            config.wifi_ssid.as_deref().unwrap_or_default(),
            config.wifi_password.as_deref().unwrap_or_default()
        )
    };

    let protocol = match &config.comm_config {
        CommConfig::Mqtt(mqtt) => {
            let mut details = format!(
                "PROTOCOL: {}\nBROKER: {}\nPORT: {}\nCLIENT ID: {}\nUSER: {}\nPASSWORD: {}\nTOPIC PUB: {}",
                config.protocol.label(),
                mqtt.broker,
                mqtt.port,
                mqtt.client_id,
                mqtt.username.as_deref().unwrap_or("N/A"),
                mqtt.password.as_deref().unwrap_or("N/A"),
                mqtt.topic_pub,
            );
            if let Some(topic_sub) = &mqtt.topic_sub {
                details.push_str(&format!("\nTOPIC SUB: {}", topic_sub));
            }
            details
        }
        CommConfig::Http(http) => {
            let mut details = format!(
                "PROTOCOL: {}\nENDPOINT: {}\nMETHOD: {}",
                config.protocol.label(),
                http.endpoint,
                http.method.as_str(),
            );
            if let Some(header) = &http.auth_header {
                details.push_str(&format!("\nAUTH HEADER: {}", header));
            }
            details
        }
    };

    let prompt = format!(
        "Generate a complete Arduino sketch (.ino) for:\n\
         HARDWARE: {}\n\
         SENSOR: {} (simulate the reading when no specific library exists, e.g. random or analog read)\n\
         NETWORK: {}\n\
         {}\n\
         {}\n\
         PUBLISH INTERVAL: {} seconds\n\n\
         The code must compile and include explanatory comments.",
        config.hardware.label(),
        config.sensor.label(),
        config.network_mode.label(),
        link,
        protocol,
        config.interval_secs,
    );

    FirmwarePrompt {
        system_instruction: SYSTEM_INSTRUCTION.to_string(),
        prompt,
    }
}

/// Produces firmware from a prompt.
#[async_trait::async_trait]
pub trait FirmwareGenerator: Send + Sync {
    async fn generate(&self, prompt: &FirmwarePrompt) -> Result<GeneratedFirmware, FirmwareError>;
}

/// Mock generator for development and testing.
///
/// Returns a stub sketch instead of calling a model.
#[derive(Debug, Clone, Default)]
pub struct MockFirmwareGenerator {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
}

impl MockFirmwareGenerator {
    pub fn new() -> Self {
        Self {
            simulate_failure: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
        }
    }
}

#[async_trait::async_trait]
impl FirmwareGenerator for MockFirmwareGenerator {
    async fn generate(&self, prompt: &FirmwarePrompt) -> Result<GeneratedFirmware, FirmwareError> {
        if self.simulate_failure {
            tracing::warn!("Mock firmware generator simulating failure");
            return Err(FirmwareError::Upstream("Simulated failure".to_string()));
        }

        tracing::info!(
            prompt_len = prompt.prompt.len(),
            "Mock: Would call firmware generator"
        );

        Ok(GeneratedFirmware {
            code: "void setup() {}\nvoid loop() {}\n".to_string(),
            explanation: prompt.prompt.lines().next().unwrap_or_default().to_string(),
        })
    }
}
