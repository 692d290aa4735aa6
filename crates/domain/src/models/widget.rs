//! Dashboard widgets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetType {
    Metric,
    Gauge,
    Graph,
    Logs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// A user-owned visualisation tile bound to one device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Widget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub widget_type: WidgetType,
    pub device_id: Uuid,
    pub size: WidgetSize,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWidgetRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,
    pub widget_type: WidgetType,
    pub device_id: Uuid,
    #[serde(default)]
    pub size: WidgetSize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListWidgetsResponse {
    pub data: Vec<Widget>,
}
