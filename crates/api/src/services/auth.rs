//! Credential checks and token issuance.

use domain::models::user::{LoginResponse, User};
use persistence::repositories::UserRepository;
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{verify_dummy, verify_password, PasswordError};
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Any failed credential check, including an inactive account.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

pub struct AuthService {
    users: UserRepository,
    jwt: Arc<JwtConfig>,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt: Arc<JwtConfig>) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt,
        }
    }

    /// Verifies a username/password pair and issues an access token.
    ///
    /// Usernames match exactly. Every attempt pays one Argon2 verify, known
    /// username or not. On success `last_login_at` is stamped before the
    /// token is issued.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let Some(entity) = self.users.find_by_username(username).await? else {
            verify_dummy(password);
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &entity.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        if !entity.active {
            tracing::info!(user_id = %entity.id, "Login attempt for inactive user");
            return Err(AuthError::InvalidCredentials);
        }

        self.users.record_login(entity.id).await?;
        let issued = self.jwt.issue_access_token(entity.id)?;

        let mut user: User = entity.into();
        user.last_login_at = Some(chrono::Utc::now());

        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(LoginResponse {
            user,
            access_token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in,
        })
    }
}
