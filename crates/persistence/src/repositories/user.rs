//! User repository for database operations.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{UserEntity, UserRoleDb};
use crate::metrics::QueryTimer;

const USER_COLUMNS: &str = r#"
    id, username, password_hash, email, full_name, role, company_id, active,
    created_at, updated_at, last_login_at
"#;

/// Fields for a new user. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub email: Option<&'a str>,
    pub full_name: Option<&'a str>,
    pub role: UserRoleDb,
    pub company_id: Option<Uuid>,
    pub active: bool,
}

/// Partial user update. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserChanges<'a> {
    pub username: Option<&'a str>,
    pub password_hash: Option<&'a str>,
    pub email: Option<&'a str>,
    pub full_name: Option<&'a str>,
    pub role: Option<UserRoleDb>,
    pub company_id: Option<Uuid>,
    pub active: Option<bool>,
}

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user.
    pub async fn create(&self, user: &NewUser<'_>) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let now = Utc::now();
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            INSERT INTO users (
                username, password_hash, email, full_name, role, company_id, active,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.username)
        .bind(user.password_hash)
        .bind(user.email)
        .bind(user.full_name)
        .bind(user.role)
        .bind(user.company_id)
        .bind(user.active)
        .bind(now)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by exact username.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_username");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List users sorted by username, optionally within one company.
    pub async fn list(&self, company_id: Option<Uuid>) -> Result<Vec<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_users");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE ($1::uuid IS NULL OR company_id = $1)
            ORDER BY username ASC
            "#
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Apply a partial update. Returns `None` if the user does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        changes: &UserChanges<'_>,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_user");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                password_hash = COALESCE($3, password_hash),
                email = COALESCE($4, email),
                full_name = COALESCE($5, full_name),
                role = COALESCE($6, role),
                company_id = COALESCE($7, company_id),
                active = COALESCE($8, active),
                updated_at = $9
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.username)
        .bind(changes.password_hash)
        .bind(changes.email)
        .bind(changes.full_name)
        .bind(changes.role)
        .bind(changes.company_id)
        .bind(changes.active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Stamp a successful login.
    pub async fn record_login(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("record_user_login");
        let result = sqlx::query("UPDATE users SET last_login_at = $2 WHERE id = $1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await;
        timer.record();
        result.map(|_| ())
    }

    /// Delete a user. Returns the number of rows affected.
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_user");
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
