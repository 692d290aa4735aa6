//! HTTP route handlers.

pub mod auth;
pub mod companies;
pub mod devices;
pub mod firmware;
pub mod hardware;
pub mod health;
pub mod ingest;
pub mod legacy;
pub mod users;
pub mod widgets;
