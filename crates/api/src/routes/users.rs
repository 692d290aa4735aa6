//! User management endpoints.
//!
//! Admins manage every account. Clients manage accounts inside their own
//! company but can never create or promote an admin. Viewers are read-only.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::models::user::{
    validate_role_scope, CreateUserRequest, ListUsersQuery, ListUsersResponse, UpdateUserRequest,
    User, UserRole,
};
use persistence::repositories::{NewUser, UserChanges, UserRepository};
use shared::password::hash_password;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

fn hash(password: &str) -> Result<String, ApiError> {
    hash_password(password).map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))
}

fn forbid_admin_role(auth: &UserAuth, role: Option<UserRole>) -> Result<(), ApiError> {
    if role.is_some_and(|r| r.is_admin()) && !auth.is_admin() {
        return Err(ApiError::Forbidden(
            "Only administrators can grant the admin role".to_string(),
        ));
    }
    Ok(())
}

/// Loads a user the caller is allowed to see; anything else is a 404.
async fn load_visible(repo: &UserRepository, auth: &UserAuth, id: Uuid) -> Result<User, ApiError> {
    let user: User = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?
        .into();

    if auth.is_admin() || user.id == auth.user_id() {
        return Ok(user);
    }
    match user.company_id {
        Some(company_id) if auth.can_see_company(company_id) => Ok(user),
        _ => Err(ApiError::NotFound("User not found".to_string())),
    }
}

async fn ensure_username_free(
    repo: &UserRepository,
    username: &str,
    except: Option<Uuid>,
) -> Result<(), ApiError> {
    match repo.find_by_username(username).await? {
        Some(existing) if Some(existing.id) != except => Err(ApiError::Conflict(format!(
            "Username '{}' is already taken",
            username
        ))),
        _ => Ok(()),
    }
}

/// GET /api/v1/users[?company_id=]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ListUsersResponse>, ApiError> {
    let scope = auth.list_scope(query.company_id)?;
    let users = UserRepository::new(state.pool.clone())
        .list(scope)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    Ok(Json(ListUsersResponse { data: users }))
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Json(mut request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_write()?;
    forbid_admin_role(&auth, Some(request.role))?;
    if !auth.is_admin() {
        request.company_id = Some(auth.target_company(request.company_id)?);
    }
    request.validate()?;

    let repo = UserRepository::new(state.pool.clone());
    ensure_username_free(&repo, &request.username, None).await?;

    let password_hash = hash(&request.password)?;
    let user: User = repo
        .create(&NewUser {
            username: &request.username,
            password_hash: &password_hash,
            email: request.email.as_deref(),
            full_name: request.full_name.as_deref(),
            role: request.role.into(),
            company_id: request.company_id,
            active: request.active,
        })
        .await?
        .into();

    info!(
        user_id = %auth.user_id(),
        created_user_id = %user.id,
        role = %user.role,
        "Created user"
    );

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    Ok(Json(load_visible(&repo, &auth, user_id).await?))
}

/// PUT /api/v1/users/:id
///
/// Partial update; `password`, when present, replaces the stored hash.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let existing = load_visible(&repo, &auth, user_id).await?;

    auth.require_write()?;
    forbid_admin_role(&auth, request.role)?;
    if !auth.is_admin() {
        if existing.role.is_admin() {
            return Err(ApiError::Forbidden(
                "Only administrators can modify an admin account".to_string(),
            ));
        }
        if request.company_id.is_some() {
            auth.target_company(request.company_id)?;
        }
    }
    request.validate()?;

    let role = request.role.unwrap_or(existing.role);
    let company_id = request.company_id.or(existing.company_id);
    validate_role_scope(role, company_id).map_err(|e| {
        ApiError::Validation(
            e.message
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Role requires a company".to_string()),
        )
    })?;

    if user_id == auth.user_id() && request.active == Some(false) {
        return Err(ApiError::Forbidden(
            "You cannot deactivate your own account".to_string(),
        ));
    }

    if let Some(username) = request.username.as_deref() {
        ensure_username_free(&repo, username, Some(user_id)).await?;
    }

    let password_hash = request.password.as_deref().map(hash).transpose()?;
    let user: User = repo
        .update(
            user_id,
            &UserChanges {
                username: request.username.as_deref(),
                password_hash: password_hash.as_deref(),
                email: request.email.as_deref(),
                full_name: request.full_name.as_deref(),
                role: request.role.map(Into::into),
                company_id: request.company_id,
                active: request.active,
            },
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?
        .into();

    info!(
        user_id = %auth.user_id(),
        updated_user_id = %user.id,
        password_changed = password_hash.is_some(),
        "Updated user"
    );

    Ok(Json(user))
}

/// DELETE /api/v1/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let existing = load_visible(&repo, &auth, user_id).await?;

    auth.require_write()?;
    if user_id == auth.user_id() {
        return Err(ApiError::Forbidden(
            "You cannot delete your own account".to_string(),
        ));
    }
    if existing.role.is_admin() && !auth.is_admin() {
        return Err(ApiError::Forbidden(
            "Only administrators can delete an admin account".to_string(),
        ));
    }

    if repo.delete(user_id).await? == 0 {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    info!(user_id = %auth.user_id(), deleted_user_id = %user_id, "Deleted user");

    Ok(StatusCode::NO_CONTENT)
}
