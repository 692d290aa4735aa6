//! Widget entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for widget_type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "widget_type", rename_all = "lowercase")]
pub enum WidgetTypeDb {
    Metric,
    Gauge,
    Graph,
    Logs,
}

impl From<WidgetTypeDb> for domain::models::WidgetType {
    fn from(db: WidgetTypeDb) -> Self {
        match db {
            WidgetTypeDb::Metric => Self::Metric,
            WidgetTypeDb::Gauge => Self::Gauge,
            WidgetTypeDb::Graph => Self::Graph,
            WidgetTypeDb::Logs => Self::Logs,
        }
    }
}

impl From<domain::models::WidgetType> for WidgetTypeDb {
    fn from(domain: domain::models::WidgetType) -> Self {
        match domain {
            domain::models::WidgetType::Metric => Self::Metric,
            domain::models::WidgetType::Gauge => Self::Gauge,
            domain::models::WidgetType::Graph => Self::Graph,
            domain::models::WidgetType::Logs => Self::Logs,
        }
    }
}

/// Database enum for widget_size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "widget_size", rename_all = "lowercase")]
pub enum WidgetSizeDb {
    Small,
    Medium,
    Large,
}

impl From<WidgetSizeDb> for domain::models::WidgetSize {
    fn from(db: WidgetSizeDb) -> Self {
        match db {
            WidgetSizeDb::Small => Self::Small,
            WidgetSizeDb::Medium => Self::Medium,
            WidgetSizeDb::Large => Self::Large,
        }
    }
}

impl From<domain::models::WidgetSize> for WidgetSizeDb {
    fn from(domain: domain::models::WidgetSize) -> Self {
        match domain {
            domain::models::WidgetSize::Small => Self::Small,
            domain::models::WidgetSize::Medium => Self::Medium,
            domain::models::WidgetSize::Large => Self::Large,
        }
    }
}

/// Database row mapping for the widgets table.
#[derive(Debug, Clone, FromRow)]
pub struct WidgetEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub widget_type: WidgetTypeDb,
    pub device_id: Uuid,
    pub size: WidgetSizeDb,
    pub created_at: DateTime<Utc>,
}

impl From<WidgetEntity> for domain::models::Widget {
    fn from(entity: WidgetEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            title: entity.title,
            widget_type: entity.widget_type.into(),
            device_id: entity.device_id,
            size: entity.size.into(),
            created_at: entity.created_at,
        }
    }
}
