//! Company (tenant) domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Commercial state of a company's service contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Active,
    Suspended,
    Expired,
    #[default]
    Pending,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Active => "active",
            ServiceStatus::Suspended => "suspended",
            ServiceStatus::Expired => "expired",
            ServiceStatus::Pending => "pending",
        }
    }
}

impl FromStr for ServiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ServiceStatus::Active),
            "suspended" => Ok(ServiceStatus::Suspended),
            "expired" => Ok(ServiceStatus::Expired),
            "pending" => Ok(ServiceStatus::Pending),
            _ => Err(format!("Unknown service status: {}", s)),
        }
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer company owning devices and users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub tax_id: Option<String>,
    pub billing_address: Option<String>,
    pub service_start_date: Option<NaiveDate>,
    pub service_end_date: Option<NaiveDate>,
    pub service_status: ServiceStatus,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a company.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_create_period"))]
pub struct CreateCompanyRequest {
    #[validate(length(min = 2, max = 255, message = "Name must be 2-255 characters"))]
    pub name: String,
    #[validate(length(max = 255, message = "Contact name must be at most 255 characters"))]
    pub contact_name: Option<String>,
    #[validate(email(message = "Invalid contact email format"))]
    pub contact_email: Option<String>,
    #[validate(length(max = 50, message = "Contact phone must be at most 50 characters"))]
    pub contact_phone: Option<String>,
    #[validate(length(max = 50, message = "Tax ID must be at most 50 characters"))]
    pub tax_id: Option<String>,
    #[validate(length(max = 500, message = "Billing address must be at most 500 characters"))]
    pub billing_address: Option<String>,
    pub service_start_date: Option<NaiveDate>,
    pub service_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub service_status: ServiceStatus,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

fn validate_create_period(req: &CreateCompanyRequest) -> Result<(), validator::ValidationError> {
    shared::validation::validate_service_period(req.service_start_date, req.service_end_date)
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 2, max = 255, message = "Name must be 2-255 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 255, message = "Contact name must be at most 255 characters"))]
    pub contact_name: Option<String>,
    #[validate(email(message = "Invalid contact email format"))]
    pub contact_email: Option<String>,
    #[validate(length(max = 50, message = "Contact phone must be at most 50 characters"))]
    pub contact_phone: Option<String>,
    #[validate(length(max = 50, message = "Tax ID must be at most 50 characters"))]
    pub tax_id: Option<String>,
    #[validate(length(max = 500, message = "Billing address must be at most 500 characters"))]
    pub billing_address: Option<String>,
    pub service_start_date: Option<NaiveDate>,
    pub service_end_date: Option<NaiveDate>,
    pub service_status: Option<ServiceStatus>,
    pub active: Option<bool>,
}

impl UpdateCompanyRequest {
    /// Applies the update onto an existing company, in memory.
    pub fn apply_to(self, mut company: Company) -> Company {
        if let Some(name) = self.name {
            company.name = name;
        }
        if self.contact_name.is_some() {
            company.contact_name = self.contact_name;
        }
        if self.contact_email.is_some() {
            company.contact_email = self.contact_email;
        }
        if self.contact_phone.is_some() {
            company.contact_phone = self.contact_phone;
        }
        if self.tax_id.is_some() {
            company.tax_id = self.tax_id;
        }
        if self.billing_address.is_some() {
            company.billing_address = self.billing_address;
        }
        if self.service_start_date.is_some() {
            company.service_start_date = self.service_start_date;
        }
        if self.service_end_date.is_some() {
            company.service_end_date = self.service_end_date;
        }
        if let Some(status) = self.service_status {
            company.service_status = status;
        }
        if let Some(active) = self.active {
            company.active = active;
        }
        company
    }
}

/// Response for company listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListCompaniesResponse {
    pub data: Vec<Company>,
}
