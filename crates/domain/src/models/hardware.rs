//! Hardware catalog and per-device communication configuration.
//!
//! Wire names are snake_case identifiers; `label()` gives the human-facing
//! names shown in the dashboard and used when rendering firmware prompts.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Supported controller boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardwareType {
    TSim7080S3,
    WalterEsp32S3,
    Esp32Generic,
    Esp32C6,
    RpiPicoW,
}

impl HardwareType {
    pub const ALL: [HardwareType; 5] = [
        HardwareType::TSim7080S3,
        HardwareType::WalterEsp32S3,
        HardwareType::Esp32Generic,
        HardwareType::Esp32C6,
        HardwareType::RpiPicoW,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            HardwareType::TSim7080S3 => "LilyGO T-SIM7080-S3",
            HardwareType::WalterEsp32S3 => "Walter ESP32-S3",
            HardwareType::Esp32Generic => "ESP32 Generic (WiFi)",
            HardwareType::Esp32C6 => "ESP32-C6 (Zigbee/Matter)",
            HardwareType::RpiPicoW => "Raspberry Pi Pico W",
        }
    }

    /// Capabilities of this board.
    pub fn profile(&self) -> HardwareProfile {
        use NetworkMode::*;
        use ProtocolType::*;

        match self {
            HardwareType::TSim7080S3 => HardwareProfile {
                hardware: *self,
                name: "LilyGO T-SIM7080-S3",
                description: "Industrial board with LTE Cat-M1/NB-IoT modem and battery support.",
                supported_networks: vec![CatM1, NbIot, Auto],
                supported_protocols: vec![HttpPost, Mqtt, Mqtts],
                requires_sim: true,
                requires_wifi: false,
            },
            HardwareType::WalterEsp32S3 => HardwareProfile {
                hardware: *self,
                name: "Walter ESP32-S3 IoT",
                description: "Certified module with integrated GNSS and cellular connectivity.",
                supported_networks: vec![CatM1, NbIot],
                supported_protocols: vec![HttpPost, Mqtt, Coap],
                requires_sim: true,
                requires_wifi: false,
            },
            HardwareType::Esp32Generic => HardwareProfile {
                hardware: *self,
                name: "ESP32 DevKit V1 / S3",
                description: "Standard microcontroller for low-cost WiFi deployments.",
                supported_networks: vec![Wifi],
                supported_protocols: vec![HttpPost, Mqtt],
                requires_sim: false,
                requires_wifi: true,
            },
            HardwareType::Esp32C6 => HardwareProfile {
                hardware: *self,
                name: "ESP32-C6 (WiFi 6)",
                description: "WiFi 6 generation with low power consumption.",
                supported_networks: vec![Wifi],
                supported_protocols: vec![HttpPost, Mqtt, Mqtts],
                requires_sim: false,
                requires_wifi: true,
            },
            HardwareType::RpiPicoW => HardwareProfile {
                hardware: *self,
                name: "Raspberry Pi Pico W",
                description: "RP2040 board with on-board WiFi.",
                supported_networks: vec![Wifi],
                supported_protocols: vec![HttpPost, Mqtt],
                requires_sim: false,
                requires_wifi: true,
            },
        }
    }
}

/// Sensor families a device can be built around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    TemperatureHumidity,
    Level,
    Pressure,
    Flow,
    Battery,
    #[serde(rename = "industrial_4_20ma")]
    Industrial4To20mA,
    I2c,
    Gps,
}

impl SensorKind {
    pub fn label(&self) -> &'static str {
        match self {
            SensorKind::TemperatureHumidity => "DHT22 / BME280",
            SensorKind::Level => "Level (Ultrasonic/Hydrostatic)",
            SensorKind::Pressure => "Industrial Pressure",
            SensorKind::Flow => "Flow Meter",
            SensorKind::Battery => "Energy Monitor",
            SensorKind::Industrial4To20mA => "Analog 4-20mA",
            SensorKind::I2c => "Generic I2C Digital Sensor",
            SensorKind::Gps => "GNSS/GPS Tracking",
        }
    }
}

/// Link layer a device uses to reach the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkMode {
    CatM1,
    NbIot,
    Auto,
    Wifi,
    Lora,
}

impl NetworkMode {
    pub fn label(&self) -> &'static str {
        match self {
            NetworkMode::CatM1 => "LTE Cat-M1 (eMTC)",
            NetworkMode::NbIot => "NB-IoT",
            NetworkMode::Auto => "Automatic (Cellular)",
            NetworkMode::Wifi => "WiFi (WPA2)",
            NetworkMode::Lora => "LoRaWAN",
        }
    }

    /// Every mode except WiFi goes through a SIM/APN.
    pub fn is_cellular(&self) -> bool {
        !matches!(self, NetworkMode::Wifi)
    }
}

/// Application protocol used to publish readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolType {
    HttpPost,
    Mqtt,
    Mqtts,
    Coap,
}

impl ProtocolType {
    pub fn label(&self) -> &'static str {
        match self {
            ProtocolType::HttpPost => "HTTP/HTTPS REST",
            ProtocolType::Mqtt => "MQTT v3.1.1",
            ProtocolType::Mqtts => "Secure MQTT (TLS)",
            ProtocolType::Coap => "CoAP (UDP)",
        }
    }

    pub fn is_mqtt(&self) -> bool {
        matches!(self, ProtocolType::Mqtt | ProtocolType::Mqtts)
    }
}

/// Cellular carrier whose SIM is fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimProvider {
    Entel,
    Movistar,
    Claro,
    Wom,
    GlobalSim,
    Other,
}

/// APN used when no SIM provider is configured.
pub const DEFAULT_APN: &str = "internet";

impl SimProvider {
    pub fn label(&self) -> &'static str {
        match self {
            SimProvider::Entel => "Entel Chile",
            SimProvider::Movistar => "Movistar Chile",
            SimProvider::Claro => "Claro Chile",
            SimProvider::Wom => "WOM Chile",
            SimProvider::GlobalSim => "Global IoT SIM",
            SimProvider::Other => "Custom APN",
        }
    }

    pub fn apn(&self) -> &'static str {
        match self {
            SimProvider::Entel => "entel.tst",
            SimProvider::Movistar => "m2m.movistar.cl",
            SimProvider::Claro => "m2m.claro.cl",
            SimProvider::Wom => "internet",
            SimProvider::GlobalSim => "iot.global",
            SimProvider::Other => "tu_apn_aqui",
        }
    }
}

/// Capabilities of a board, as listed in the hardware catalog.
#[derive(Debug, Clone, Serialize)]
pub struct HardwareProfile {
    pub hardware: HardwareType,
    pub name: &'static str,
    pub description: &'static str,
    pub supported_networks: Vec<NetworkMode>,
    pub supported_protocols: Vec<ProtocolType>,
    pub requires_sim: bool,
    pub requires_wifi: bool,
}

/// Full catalog, in display order.
pub fn hardware_catalog() -> Vec<HardwareProfile> {
    HardwareType::ALL.iter().map(HardwareType::profile).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Post,
    Put,
    Get,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Get => "GET",
        }
    }
}

/// HTTP publishing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    pub endpoint: String,
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// MQTT publishing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MqttConfig {
    pub broker: String,
    pub port: u16,
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub topic_pub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_sub: Option<String>,
}

/// Protocol-specific settings; the shape is inferred from the fields present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommConfig {
    Mqtt(MqttConfig),
    Http(HttpConfig),
}

/// Hardware and communication settings attached to a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_compatibility"))]
pub struct HardwareConfig {
    pub hardware: HardwareType,
    pub sensor: SensorKind,
    pub network_mode: NetworkMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sim_provider: Option<SimProvider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wifi_ssid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wifi_password: Option<String>,
    pub protocol: ProtocolType,
    pub comm_config: CommConfig,
    #[validate(range(min = 1, max = 86400, message = "Interval must be between 1 and 86400 seconds"))]
    pub interval_secs: u32,
}

impl HardwareConfig {
    /// Checks the selection against the board's catalog profile.
    ///
    /// Returns one message per rule that fails; empty means compatible.
    pub fn compatibility_issues(&self) -> Vec<String> {
        let profile = self.hardware.profile();
        let mut issues = Vec::new();

        if !profile.supported_networks.contains(&self.network_mode) {
            issues.push(format!(
                "{} does not support network mode {}",
                profile.name,
                self.network_mode.label()
            ));
        }

        if !profile.supported_protocols.contains(&self.protocol) {
            issues.push(format!(
                "{} does not support protocol {}",
                profile.name,
                self.protocol.label()
            ));
        }

        match (&self.comm_config, self.protocol.is_mqtt()) {
            (CommConfig::Mqtt(_), false) => {
                issues.push("MQTT settings given for a non-MQTT protocol".to_string())
            }
            (CommConfig::Http(_), true) => {
                issues.push("MQTT protocol requires broker settings".to_string())
            }
            _ => {}
        }

        if self.network_mode == NetworkMode::Wifi
            && self.wifi_ssid.as_deref().map_or(true, |s| s.trim().is_empty())
        {
            issues.push("WiFi network mode requires an SSID".to_string());
        }

        issues
    }

    /// APN the modem should attach with.
    pub fn apn(&self) -> &'static str {
        self.sim_provider.map_or(DEFAULT_APN, |p| p.apn())
    }
}

fn validate_compatibility(config: &HardwareConfig) -> Result<(), validator::ValidationError> {
    let issues = config.compatibility_issues();
    if issues.is_empty() {
        return Ok(());
    }
    let mut err = validator::ValidationError::new("hardware_compatibility");
    err.message = Some(issues.join("; ").into());
    Err(err)
}
