//! Application services.

pub mod admin_bootstrap;
pub mod auth;
pub mod gemini;

pub use admin_bootstrap::{bootstrap_admin, BootstrapError};
pub use auth::{AuthError, AuthService};
pub use gemini::GeminiFirmwareGenerator;
