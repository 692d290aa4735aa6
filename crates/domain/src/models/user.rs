//! Dashboard user accounts and login payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Role of a dashboard account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Client,
    Viewer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Client => "client",
            UserRole::Viewer => "viewer",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Whether the role may create, modify or delete resources.
    pub fn can_write(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Client)
    }

    /// Clients and viewers are always bound to a company.
    pub fn requires_company(&self) -> bool {
        !self.is_admin()
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "client" => Ok(UserRole::Client),
            "viewer" => Ok(UserRole::Viewer),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dashboard account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing, default)] // Never serialize password hash to API responses
    pub password_hash: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: UserRole,
    pub company_id: Option<Uuid>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

lazy_static::lazy_static! {
    pub static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[A-Za-z0-9._@-]+$").unwrap();
}

/// Request to create a user.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_create_scope"))]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    #[validate(regex(
        path = "*USERNAME_REGEX",
        message = "Username may only contain letters, digits, '.', '_', '@' and '-'"
    ))]
    pub username: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 255, message = "Full name must be at most 255 characters"))]
    pub full_name: Option<String>,

    pub role: UserRole,

    pub company_id: Option<Uuid>,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

fn validate_create_scope(req: &CreateUserRequest) -> Result<(), validator::ValidationError> {
    validate_role_scope(req.role, req.company_id)
}

/// Checks that a non-admin role comes with a company.
pub fn validate_role_scope(
    role: UserRole,
    company_id: Option<Uuid>,
) -> Result<(), validator::ValidationError> {
    if role.requires_company() && company_id.is_none() {
        let mut err = validator::ValidationError::new("company_required");
        err.message = Some(format!("Role '{}' requires a company", role).into());
        return Err(err);
    }
    Ok(())
}

/// Partial update of a user; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    #[validate(regex(
        path = "*USERNAME_REGEX",
        message = "Username may only contain letters, digits, '.', '_', '@' and '-'"
    ))]
    pub username: Option<String>,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 255, message = "Full name must be at most 255 characters"))]
    pub full_name: Option<String>,

    pub role: Option<UserRole>,

    pub company_id: Option<Uuid>,

    pub active: Option<bool>,
}

/// Query parameters for listing users.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersQuery {
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListUsersResponse {
    pub data: Vec<User>,
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, max = 128, message = "Password is required"))]
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}
