//! Widget repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{WidgetEntity, WidgetSizeDb, WidgetTypeDb};
use crate::metrics::QueryTimer;

/// Repository for dashboard widgets.
#[derive(Clone)]
pub struct WidgetRepository {
    pool: PgPool,
}

impl WidgetRepository {
    /// Creates a new WidgetRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Widgets owned by a user, oldest first.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<WidgetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_widgets_for_user");
        let result = sqlx::query_as::<_, WidgetEntity>(
            r#"
            SELECT id, user_id, title, widget_type, device_id, size, created_at
            FROM widgets
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert a widget.
    pub async fn create(
        &self,
        user_id: Uuid,
        title: &str,
        widget_type: WidgetTypeDb,
        device_id: Uuid,
        size: WidgetSizeDb,
    ) -> Result<WidgetEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_widget");
        let result = sqlx::query_as::<_, WidgetEntity>(
            r#"
            INSERT INTO widgets (user_id, title, widget_type, device_id, size)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, widget_type, device_id, size, created_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(widget_type)
        .bind(device_id)
        .bind(size)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete one of a user's widgets. Returns the number of rows affected.
    pub async fn delete_for_user(&self, id: Uuid, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_widget");
        let result = sqlx::query("DELETE FROM widgets WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
