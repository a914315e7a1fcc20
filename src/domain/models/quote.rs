use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::{types::Json, FromRow};

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum QuoteRequestStatus {
    Open,
    Quoted,
    Accepted,
    Expired,
    Cancelled,
}

impl QuoteRequestStatus {
    /// Open and quoted requests still take responses.
    pub fn is_live(self) -> bool {
        matches!(self, QuoteRequestStatus::Open | QuoteRequestStatus::Quoted)
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum QuoteResponseStatus {
    Pending,
    Accepted,
    Rejected,
    Expired,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct QuoteAnswer {
    pub question_id: String,
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct QuoteRequest {
    pub id: String,
    pub customer_id: String,
    pub category_id: String,
    pub address_id: String,
    pub title: String,
    pub description: String,
    pub answers: Json<Vec<QuoteAnswer>>,
    pub photos: Json<Vec<String>>,
    pub preferred_dates: Json<Vec<NaiveDate>>,
    pub status: QuoteRequestStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

pub struct NewQuoteRequestParams {
    pub customer_id: String,
    pub category_id: String,
    pub address_id: String,
    pub title: String,
    pub description: String,
    pub answers: Vec<QuoteAnswer>,
    pub photos: Vec<String>,
    pub preferred_dates: Vec<NaiveDate>,
    pub ttl_days: i64,
}

impl QuoteRequest {
    pub fn new(params: NewQuoteRequestParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            customer_id: params.customer_id,
            category_id: params.category_id,
            address_id: params.address_id,
            title: params.title,
            description: params.description,
            answers: Json(params.answers),
            photos: Json(params.photos),
            preferred_dates: Json(params.preferred_dates),
            status: QuoteRequestStatus::Open,
            created_at: now,
            expires_at: now + Duration::days(params.ttl_days),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct QuoteResponse {
    pub id: String,
    pub quote_request_id: String,
    pub provider_id: String,
    pub price: i64,
    pub estimated_duration: i32,
    pub materials_included: bool,
    pub materials_estimate: Option<i64>,
    pub message: String,
    pub valid_until: DateTime<Utc>,
    pub status: QuoteResponseStatus,
    pub created_at: DateTime<Utc>,
}

pub struct NewQuoteResponseParams {
    pub quote_request_id: String,
    pub provider_id: String,
    pub price: i64,
    pub estimated_duration: i32,
    pub materials_included: bool,
    pub materials_estimate: Option<i64>,
    pub message: String,
    pub valid_days: i64,
}

impl QuoteResponse {
    pub fn new(params: NewQuoteResponseParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            quote_request_id: params.quote_request_id,
            provider_id: params.provider_id,
            price: params.price,
            estimated_duration: params.estimated_duration,
            materials_included: params.materials_included,
            materials_estimate: params.materials_estimate,
            message: params.message,
            valid_until: now + Duration::days(params.valid_days),
            status: QuoteResponseStatus::Pending,
            created_at: now,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct QuoteRequestDetail {
    #[serde(flatten)]
    pub request: QuoteRequest,
    pub responses: Vec<QuoteResponse>,
}
