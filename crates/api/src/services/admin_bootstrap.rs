//! Creates the first admin account on startup when configured.

use persistence::entities::UserRoleDb;
use persistence::repositories::{NewUser, UserRepository};
use shared::password::{hash_password, PasswordError};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::config::AdminConfig;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Idempotent: an existing user with the bootstrap username is left untouched.
///
/// Returns whether an account was created.
pub async fn bootstrap_admin(pool: &PgPool, config: &AdminConfig) -> Result<bool, BootstrapError> {
    let (username, password) = match (
        config.bootstrap_username.as_deref().map(str::trim),
        config.bootstrap_password.as_deref(),
    ) {
        (None, _) | (Some(""), _) => return Ok(false),
        (Some(_), None) | (Some(_), Some("")) => {
            warn!("admin.bootstrap_username is set but admin.bootstrap_password is empty - skipping bootstrap");
            return Ok(false);
        }
        (Some(username), Some(password)) => (username, password),
    };

    if password.len() < 8 {
        return Err(BootstrapError::Config(
            "admin.bootstrap_password must be at least 8 characters".to_string(),
        ));
    }

    let users = UserRepository::new(pool.clone());
    if users.find_by_username(username).await?.is_some() {
        info!(username, "Bootstrap user already exists - skipping bootstrap");
        return Ok(false);
    }

    let password_hash = hash_password(password)?;
    let created = users
        .create(&NewUser {
            username,
            password_hash: &password_hash,
            email: None,
            full_name: Some("Administrator"),
            role: UserRoleDb::Admin,
            company_id: None,
            active: true,
        })
        .await?;

    info!(user_id = %created.id, username, "Bootstrap admin created");
    Ok(true)
}
