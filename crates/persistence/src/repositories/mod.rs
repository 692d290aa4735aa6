//! Repository implementations for database operations.

pub mod company;
pub mod device;
pub mod measurement;
pub mod user;
pub mod widget;

pub use company::{CompanyDependents, CompanyRepository};
pub use device::{DeviceChanges, DeviceRepository, NewDevice};
pub use measurement::{IngestOutcome, MeasurementRepository};
pub use user::{NewUser, UserChanges, UserRepository};
pub use widget::WidgetRepository;
