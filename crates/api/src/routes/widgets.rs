//! Per-user dashboard widgets.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::models::widget::{CreateWidgetRequest, ListWidgetsResponse, Widget};
use persistence::repositories::{DeviceRepository, WidgetRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// GET /api/v1/widgets
pub async fn list_widgets(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
) -> Result<Json<ListWidgetsResponse>, ApiError> {
    let widgets = WidgetRepository::new(state.pool.clone())
        .list_for_user(auth.user_id())
        .await?
        .into_iter()
        .map(Widget::from)
        .collect();

    Ok(Json(ListWidgetsResponse { data: widgets }))
}

/// POST /api/v1/widgets
///
/// The bound device must be visible to the caller.
pub async fn create_widget(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Json(request): Json<CreateWidgetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let device = DeviceRepository::new(state.pool.clone())
        .find_by_id(request.device_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Device not found".to_string()))?;
    auth.ensure_visible(device.company_id, "Device")?;

    let widget: Widget = WidgetRepository::new(state.pool.clone())
        .create(
            auth.user_id(),
            &request.title,
            request.widget_type.into(),
            request.device_id,
            request.size.into(),
        )
        .await?
        .into();

    info!(user_id = %auth.user_id(), widget_id = %widget.id, device_id = %widget.device_id, "Created widget");

    Ok((StatusCode::CREATED, Json(widget)))
}

/// DELETE /api/v1/widgets/:id
pub async fn delete_widget(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(widget_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = WidgetRepository::new(state.pool.clone())
        .delete_for_user(widget_id, auth.user_id())
        .await?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Widget not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
