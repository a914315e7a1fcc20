use crate::domain::models::booking::PaymentMethod;
use crate::domain::models::change_request::ChangeRequestStatus;
use crate::domain::models::quote::QuoteAnswer;
use crate::domain::models::schedule::ScheduleSlotInput;
use crate::domain::models::support::{TicketCategory, TicketPriority, TicketStatus};
use crate::domain::models::user::Role;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateAddressRequest {
    pub label: Option<String>,
    pub street: String,
    pub postal_code: String,
    pub city: String,
}

#[derive(Deserialize)]
pub struct CreateProviderRequest {
    pub business_name: String,
    pub bio: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateServiceRequest {
    pub category_id: String,
    pub name: String,
    pub price: i64,
    pub duration_min: i32,
}

#[derive(Deserialize)]
pub struct UpdateScheduleRequest {
    /// Admins may edit another provider's calendar.
    pub provider_id: Option<String>,
    pub slots: Vec<ScheduleSlotInput>,
}

#[derive(Deserialize)]
pub struct BlockDateRequest {
    pub provider_id: Option<String>,
    pub date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct ProviderScopeQuery {
    pub provider_id: Option<String>,
}

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct DateRangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub provider_id: String,
    pub address_id: String,
    pub service_ids: Vec<String>,
    pub scheduled_at: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub recipient_name: Option<String>,
    pub recipient_phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct CancelBookingRequest {
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateQuoteRequestRequest {
    pub category_id: String,
    pub address_id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub answers: Vec<QuoteAnswer>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub preferred_dates: Vec<NaiveDate>,
}

#[derive(Deserialize)]
pub struct RespondToQuoteRequest {
    pub price: i64,
    pub estimated_duration: i32,
    #[serde(default)]
    pub materials_included: bool,
    pub materials_estimate: Option<i64>,
    pub message: String,
}

#[derive(Deserialize)]
pub struct BookQuoteRequest {
    pub scheduled_at: DateTime<Utc>,
    pub address_id: Option<String>,
    pub payment_method: PaymentMethod,
}

#[derive(Deserialize)]
pub struct OpenQuotesQuery {
    pub category_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateReviewRequest {
    pub booking_id: String,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateTicketRequest {
    pub subject: String,
    pub message: String,
    pub category: TicketCategory,
    pub priority: Option<TicketPriority>,
}

#[derive(Deserialize)]
pub struct TicketMessageRequest {
    pub message: String,
}

#[derive(Deserialize)]
pub struct TicketStatusRequest {
    pub status: TicketStatus,
}

#[derive(Deserialize)]
pub struct TicketListQuery {
    pub status: Option<TicketStatus>,
}

#[derive(Deserialize)]
pub struct ReviewDecisionRequest {
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct ChangeRequestListQuery {
    pub status: Option<ChangeRequestStatus>,
}
