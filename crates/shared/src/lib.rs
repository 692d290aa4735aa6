//! Shared utilities and common types for the SensorHub backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Password hashing with Argon2id
//! - JWT access token issue and validation
//! - Common validation logic

pub mod jwt;
pub mod password;
pub mod validation;
