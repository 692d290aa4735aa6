//! Bearer-token authentication for the `/api/v1` surface.
//!
//! The token only proves identity. The user row is loaded on every request so
//! role, company and `active` changes apply immediately.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use persistence::repositories::UserRepository;
use shared::jwt::JwtError;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header format".to_string()))
}

/// Resolves the caller from the `Authorization` header.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<UserAuth, ApiError> {
    let token = bearer_token(headers)?;

    let claims = state.jwt.validate(token).map_err(|e| match e {
        JwtError::TokenExpired => ApiError::Unauthorized("Token expired".to_string()),
        _ => ApiError::Unauthorized("Invalid or expired token".to_string()),
    })?;
    let user_id = claims
        .user_id()
        .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    let user = UserRepository::new(state.pool.clone())
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?;

    if !user.active {
        return Err(ApiError::Unauthorized("User is disabled".to_string()));
    }

    Ok(UserAuth::new(user.into()))
}

/// Rejects the request unless it carries a valid token for an active user.
///
/// The resolved [`UserAuth`] is stored in request extensions.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = authenticate(&state, req.headers()).await?;
    req.extensions_mut().insert(auth);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn test_bearer_token_rejects_other_schemes() {
        assert!(bearer_token(&headers("Basic dXNlcjpwYXNz")).is_err());
        assert!(bearer_token(&headers("Bearer ")).is_err());
        assert!(bearer_token(&HeaderMap::new()).is_err());
    }
}
