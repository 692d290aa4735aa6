//! Company repository for database operations.

use chrono::Utc;
use domain::models::company::{CreateCompanyRequest, UpdateCompanyRequest};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{CompanyEntity, ServiceStatusDb};
use crate::metrics::QueryTimer;

const COMPANY_COLUMNS: &str = r#"
    id, name, contact_name, contact_email, contact_phone, tax_id, billing_address,
    service_start_date, service_end_date, service_status, active, created_at, updated_at
"#;

/// Rows that keep a company from being deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompanyDependents {
    pub devices: i64,
    pub users: i64,
}

impl CompanyDependents {
    pub fn is_empty(&self) -> bool {
        self.devices == 0 && self.users == 0
    }
}

/// Repository for company-related database operations.
#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    /// Creates a new CompanyRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new company.
    pub async fn create(&self, input: &CreateCompanyRequest) -> Result<CompanyEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_company");
        let now = Utc::now();
        let result = sqlx::query_as::<_, CompanyEntity>(&format!(
            r#"
            INSERT INTO companies (
                name, contact_name, contact_email, contact_phone, tax_id, billing_address,
                service_start_date, service_end_date, service_status, active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.contact_name)
        .bind(&input.contact_email)
        .bind(&input.contact_phone)
        .bind(&input.tax_id)
        .bind(&input.billing_address)
        .bind(input.service_start_date)
        .bind(input.service_end_date)
        .bind(ServiceStatusDb::from(input.service_status))
        .bind(input.active)
        .bind(now)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a company by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CompanyEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_company_by_id");
        let result = sqlx::query_as::<_, CompanyEntity>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List companies sorted by name, optionally restricted to one.
    pub async fn list(&self, only: Option<Uuid>) -> Result<Vec<CompanyEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_companies");
        let result = sqlx::query_as::<_, CompanyEntity>(&format!(
            r#"
            SELECT {COMPANY_COLUMNS}
            FROM companies
            WHERE ($1::uuid IS NULL OR id = $1)
            ORDER BY name ASC
            "#
        ))
        .bind(only)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Apply a partial update. Absent fields keep their stored value.
    ///
    /// Returns `None` if the company does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        input: &UpdateCompanyRequest,
    ) -> Result<Option<CompanyEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_company");
        let result = sqlx::query_as::<_, CompanyEntity>(&format!(
            r#"
            UPDATE companies SET
                name = COALESCE($2, name),
                contact_name = COALESCE($3, contact_name),
                contact_email = COALESCE($4, contact_email),
                contact_phone = COALESCE($5, contact_phone),
                tax_id = COALESCE($6, tax_id),
                billing_address = COALESCE($7, billing_address),
                service_start_date = COALESCE($8, service_start_date),
                service_end_date = COALESCE($9, service_end_date),
                service_status = COALESCE($10, service_status),
                active = COALESCE($11, active),
                updated_at = $12
            WHERE id = $1
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.contact_name)
        .bind(&input.contact_email)
        .bind(&input.contact_phone)
        .bind(&input.tax_id)
        .bind(&input.billing_address)
        .bind(input.service_start_date)
        .bind(input.service_end_date)
        .bind(input.service_status.map(ServiceStatusDb::from))
        .bind(input.active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count devices and users still attached to a company.
    pub async fn count_dependents(&self, id: Uuid) -> Result<CompanyDependents, sqlx::Error> {
        let timer = QueryTimer::new("count_company_dependents");
        let result: Result<(i64, i64), sqlx::Error> = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM devices WHERE company_id = $1) AS devices,
                (SELECT COUNT(*) FROM users WHERE company_id = $1) AS users
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        let (devices, users) = result?;
        Ok(CompanyDependents { devices, users })
    }

    /// Delete a company. Returns the number of rows affected.
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_company");
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
