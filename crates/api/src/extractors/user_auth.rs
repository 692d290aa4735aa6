//! Authenticated caller and the tenant access policy.
//!
//! Admins see every company. Clients and viewers are confined to their own
//! company; resources outside it are reported as missing rather than
//! forbidden. Viewers are read-only.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::{User, UserRole};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::authenticate;

/// The active user behind the current request.
#[derive(Debug, Clone)]
pub struct UserAuth {
    user: User,
}

impl UserAuth {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn into_user(self) -> User {
        self.user
    }

    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    pub fn role(&self) -> UserRole {
        self.user.role
    }

    pub fn company_id(&self) -> Option<Uuid> {
        self.user.company_id
    }

    pub fn is_admin(&self) -> bool {
        self.user.role.is_admin()
    }

    pub fn can_see_company(&self, company_id: Uuid) -> bool {
        self.is_admin() || self.user.company_id == Some(company_id)
    }

    /// 404 for a resource owned by a company the caller cannot see.
    pub fn ensure_visible(&self, company_id: Uuid, resource: &str) -> Result<(), ApiError> {
        if self.can_see_company(company_id) {
            Ok(())
        } else {
            Err(ApiError::NotFound(format!("{} not found", resource)))
        }
    }

    pub fn require_write(&self) -> Result<(), ApiError> {
        if self.user.role.can_write() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Read-only account".to_string()))
        }
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Administrator role required".to_string()))
        }
    }

    /// Company filter for list endpoints.
    ///
    /// Admins get what they asked for (`None` lists everything). Everyone else is
    /// pinned to their own company; asking for another one is a 404.
    pub fn list_scope(&self, requested: Option<Uuid>) -> Result<Option<Uuid>, ApiError> {
        if self.is_admin() {
            return Ok(requested);
        }
        let own = self.own_company()?;
        match requested {
            Some(other) if other != own => Err(ApiError::NotFound("Company not found".to_string())),
            _ => Ok(Some(own)),
        }
    }

    /// Company that a newly written resource will belong to.
    ///
    /// Admins must name one. Clients default to their own and may not name another.
    pub fn target_company(&self, requested: Option<Uuid>) -> Result<Uuid, ApiError> {
        if self.is_admin() {
            return requested
                .ok_or_else(|| ApiError::Validation("company_id is required".to_string()));
        }
        let own = self.own_company()?;
        match requested {
            Some(other) if other != own => Err(ApiError::Forbidden(
                "Cannot assign resources to another company".to_string(),
            )),
            _ => Ok(own),
        }
    }

    fn own_company(&self) -> Result<Uuid, ApiError> {
        self.user
            .company_id
            .ok_or_else(|| ApiError::Forbidden("Account is not bound to a company".to_string()))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<UserAuth>() {
            return Ok(auth.clone());
        }
        authenticate(state, &parts.headers).await
    }
}
