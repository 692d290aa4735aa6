//! Domain models for SensorHub.

pub mod company;
pub mod device;
pub mod hardware;
pub mod measurement;
pub mod user;
pub mod widget;

pub use company::{Company, ServiceStatus};
pub use device::{Device, DeviceStatus, Thresholds};
pub use hardware::HardwareConfig;
pub use measurement::Measurement;
pub use user::{User, UserRole};
pub use widget::{Widget, WidgetSize, WidgetType};
