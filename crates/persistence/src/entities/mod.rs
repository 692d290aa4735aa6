//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod company;
pub mod device;
pub mod measurement;
pub mod user;
pub mod widget;

pub use company::{CompanyEntity, ServiceStatusDb};
pub use device::{DeviceEntity, DeviceStatusDb};
pub use measurement::MeasurementEntity;
pub use user::{UserEntity, UserRoleDb};
pub use widget::{WidgetEntity, WidgetSizeDb, WidgetTypeDb};
