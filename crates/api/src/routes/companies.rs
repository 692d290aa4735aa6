//! Company (tenant) endpoints.
//!
//! Admins manage all companies. Clients and viewers can only read their own.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::models::company::{
    Company, CreateCompanyRequest, ListCompaniesResponse, UpdateCompanyRequest,
};
use persistence::repositories::CompanyRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// GET /api/v1/companies
pub async fn list_companies(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
) -> Result<Json<ListCompaniesResponse>, ApiError> {
    let scope = auth.list_scope(None)?;
    let companies = CompanyRepository::new(state.pool.clone())
        .list(scope)
        .await?
        .into_iter()
        .map(Company::from)
        .collect();

    Ok(Json(ListCompaniesResponse { data: companies }))
}

/// POST /api/v1/companies
pub async fn create_company(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Json(request): Json<CreateCompanyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;
    request.validate()?;

    let company: Company = CompanyRepository::new(state.pool.clone())
        .create(&request)
        .await?
        .into();

    info!(
        user_id = %auth.user_id(),
        company_id = %company.id,
        name = %company.name,
        "Created company"
    );

    Ok((StatusCode::CREATED, Json(company)))
}

/// GET /api/v1/companies/:id
pub async fn get_company(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<Company>, ApiError> {
    auth.ensure_visible(company_id, "Company")?;

    let company = CompanyRepository::new(state.pool.clone())
        .find_by_id(company_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Company not found".to_string()))?;

    Ok(Json(company.into()))
}

/// PUT /api/v1/companies/:id
///
/// Absent fields keep their stored value. The resulting service period is
/// checked against the stored dates, not just the submitted ones.
pub async fn update_company(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(company_id): Path<Uuid>,
    Json(request): Json<UpdateCompanyRequest>,
) -> Result<Json<Company>, ApiError> {
    auth.ensure_visible(company_id, "Company")?;
    auth.require_admin()?;
    request.validate()?;

    let repo = CompanyRepository::new(state.pool.clone());
    let existing: Company = repo
        .find_by_id(company_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Company not found".to_string()))?
        .into();

    let merged = request.clone().apply_to(existing);
    shared::validation::validate_service_period(merged.service_start_date, merged.service_end_date)
        .map_err(|e| {
            ApiError::Validation(
                e.message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid service period".to_string()),
            )
        })?;

    let company: Company = repo
        .update(company_id, &request)
        .await?
        .ok_or_else(|| ApiError::NotFound("Company not found".to_string()))?
        .into();

    info!(user_id = %auth.user_id(), company_id = %company.id, "Updated company");

    Ok(Json(company))
}

/// DELETE /api/v1/companies/:id
///
/// Refused with 409 while devices or users still belong to the company.
pub async fn delete_company(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(company_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    auth.ensure_visible(company_id, "Company")?;
    auth.require_admin()?;

    let repo = CompanyRepository::new(state.pool.clone());
    if repo.find_by_id(company_id).await?.is_none() {
        return Err(ApiError::NotFound("Company not found".to_string()));
    }

    let dependents = repo.count_dependents(company_id).await?;
    if !dependents.is_empty() {
        return Err(ApiError::Conflict(format!(
            "Company still has {} device(s) and {} user(s)",
            dependents.devices, dependents.users
        )));
    }

    // A device or user inserted since the count trips the FK instead
    let deleted = repo.delete(company_id).await.map_err(|e| {
        if persistence::db::is_foreign_key_violation(&e) {
            ApiError::Conflict("Company still has devices or users".to_string())
        } else {
            ApiError::from(e)
        }
    })?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Company not found".to_string()));
    }

    info!(user_id = %auth.user_id(), company_id = %company_id, "Deleted company");

    Ok(StatusCode::NO_CONTENT)
}
