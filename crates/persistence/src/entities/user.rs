//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for user_role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRoleDb {
    Admin,
    Client,
    Viewer,
}

impl From<UserRoleDb> for domain::models::UserRole {
    fn from(db: UserRoleDb) -> Self {
        match db {
            UserRoleDb::Admin => Self::Admin,
            UserRoleDb::Client => Self::Client,
            UserRoleDb::Viewer => Self::Viewer,
        }
    }
}

impl From<domain::models::UserRole> for UserRoleDb {
    fn from(domain: domain::models::UserRole) -> Self {
        match domain {
            domain::models::UserRole::Admin => Self::Admin,
            domain::models::UserRole::Client => Self::Client,
            domain::models::UserRole::Viewer => Self::Viewer,
        }
    }
}

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: UserRoleDb,
    pub company_id: Option<Uuid>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<UserEntity> for domain::models::User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            username: entity.username,
            password_hash: entity.password_hash,
            email: entity.email,
            full_name: entity.full_name,
            role: entity.role.into(),
            company_id: entity.company_id,
            active: entity.active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            last_login_at: entity.last_login_at,
        }
    }
}
