use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ServiceProvider {
    pub id: String,
    pub user_id: String,
    pub business_name: String,
    pub bio: Option<String>,
    pub status: ProviderStatus,
    pub has_police_check: bool,
    pub has_insurance: bool,
    pub education: Option<String>,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl ServiceProvider {
    pub fn new(user_id: String, business_name: String, bio: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            business_name,
            bio,
            status: ProviderStatus::Pending,
            has_police_check: false,
            has_insurance: false,
            education: None,
            created_at: Utc::now(),
            approved_at: None,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == ProviderStatus::Approved
    }
}

/// A priced entry in a provider's catalog.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ProviderService {
    pub id: String,
    pub provider_id: String,
    pub category_id: String,
    pub name: String,
    pub price: i64,
    pub duration_min: i32,
    pub is_active: bool,
}

impl ProviderService {
    pub fn new(provider_id: String, category_id: String, name: String, price: i64, duration_min: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            provider_id,
            category_id,
            name,
            price,
            duration_min,
            is_active: true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ProviderCertificate {
    pub id: String,
    pub provider_id: String,
    pub name: String,
    pub issuer: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ProviderLanguage {
    pub id: String,
    pub provider_id: String,
    pub language: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct ProviderProfile {
    #[serde(flatten)]
    pub provider: ServiceProvider,
    pub certificates: Vec<ProviderCertificate>,
    pub languages: Vec<ProviderLanguage>,
}
