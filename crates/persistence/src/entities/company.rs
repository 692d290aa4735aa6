//! Company entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for service_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "service_status", rename_all = "lowercase")]
pub enum ServiceStatusDb {
    Active,
    Suspended,
    Expired,
    Pending,
}

impl From<ServiceStatusDb> for domain::models::ServiceStatus {
    fn from(db: ServiceStatusDb) -> Self {
        match db {
            ServiceStatusDb::Active => Self::Active,
            ServiceStatusDb::Suspended => Self::Suspended,
            ServiceStatusDb::Expired => Self::Expired,
            ServiceStatusDb::Pending => Self::Pending,
        }
    }
}

impl From<domain::models::ServiceStatus> for ServiceStatusDb {
    fn from(domain: domain::models::ServiceStatus) -> Self {
        match domain {
            domain::models::ServiceStatus::Active => Self::Active,
            domain::models::ServiceStatus::Suspended => Self::Suspended,
            domain::models::ServiceStatus::Expired => Self::Expired,
            domain::models::ServiceStatus::Pending => Self::Pending,
        }
    }
}

/// Database row mapping for the companies table.
#[derive(Debug, Clone, FromRow)]
pub struct CompanyEntity {
    pub id: Uuid,
    pub name: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub tax_id: Option<String>,
    pub billing_address: Option<String>,
    pub service_start_date: Option<NaiveDate>,
    pub service_end_date: Option<NaiveDate>,
    pub service_status: ServiceStatusDb,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CompanyEntity> for domain::models::Company {
    fn from(entity: CompanyEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            contact_name: entity.contact_name,
            contact_email: entity.contact_email,
            contact_phone: entity.contact_phone,
            tax_id: entity.tax_id,
            billing_address: entity.billing_address,
            service_start_date: entity.service_start_date,
            service_end_date: entity.service_end_date,
            service_status: entity.service_status.into(),
            active: entity.active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
