//! Login and current-user routes.

use axum::{
    extract::{Extension, State},
    Json,
};
use domain::models::user::{LoginRequest, LoginResponse, User};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::services::auth::{AuthError, AuthService};

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::Unauthorized("Invalid credentials".to_string()),
            AuthError::DatabaseError(db_err) => ApiError::from(db_err),
            AuthError::PasswordError(e) => ApiError::Internal(format!("Password error: {}", e)),
            AuthError::TokenError(e) => ApiError::Internal(format!("Token error: {}", e)),
        }
    }
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if request.validate().is_err() {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let response = AuthService::new(state.pool.clone(), state.jwt.clone())
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(response))
}

/// GET /api/v1/auth/me
pub async fn me(Extension(auth): Extension<UserAuth>) -> Json<User> {
    Json(auth.into_user())
}
