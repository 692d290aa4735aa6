//! Domain layer for the SensorHub backend.
//!
//! This crate contains:
//! - Domain models (Company, User, Device, Measurement, Widget, hardware catalog)
//! - Alarm evaluation and firmware prompt services

pub mod models;
pub mod services;
