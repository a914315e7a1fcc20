use crate::domain::models::{
    auth::RefreshTokenRecord,
    booking::{Booking, BookingStatus, Cancellation},
    change_request::{ChangeRequestStatus, ProviderChangeRequest},
    provider::{ProviderCertificate, ProviderLanguage, ProviderService, ProviderStatus, ServiceProvider},
    quote::{QuoteRequest, QuoteResponse},
    review::Review,
    schedule::{BlockedDate, WeeklyScheduleSlot},
    support::{SupportTicket, SupportTicketResponse, TicketStatus},
    user::{Address, User},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError>;
    /// Revokes every session of the user. Returns how many tokens were removed.
    async fn delete_refresh_tokens_for_user(&self, user_id: &str) -> Result<u64, AppError>;
}

#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn create(&self, address: &Address) -> Result<Address, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Address>, AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Address>, AppError>;
    async fn delete(&self, user_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ProviderRepository: Send + Sync {
    async fn create(&self, provider: &ServiceProvider) -> Result<ServiceProvider, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<ServiceProvider>, AppError>;
    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<ServiceProvider>, AppError>;
    async fn set_status(&self, id: &str, status: ProviderStatus, approved_at: Option<DateTime<Utc>>) -> Result<ServiceProvider, AppError>;
    async fn count_by_status(&self, status: ProviderStatus) -> Result<i64, AppError>;

    async fn list_certificates(&self, provider_id: &str) -> Result<Vec<ProviderCertificate>, AppError>;
    async fn list_languages(&self, provider_id: &str) -> Result<Vec<ProviderLanguage>, AppError>;

    async fn create_service(&self, service: &ProviderService) -> Result<ProviderService, AppError>;
    async fn find_service(&self, id: &str) -> Result<Option<ProviderService>, AppError>;
    async fn list_services(&self, provider_id: &str) -> Result<Vec<ProviderService>, AppError>;
    async fn deactivate_service(&self, id: &str) -> Result<ProviderService, AppError>;
}

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Deletes every slot the provider has on `day_of_week` and inserts `slots` in their place.
    async fn replace_day(&self, provider_id: &str, day_of_week: i32, slots: &[WeeklyScheduleSlot]) -> Result<Vec<WeeklyScheduleSlot>, AppError>;
    async fn list_weekly(&self, provider_id: &str) -> Result<Vec<WeeklyScheduleSlot>, AppError>;
    async fn list_active_for_day(&self, provider_id: &str, day_of_week: i32) -> Result<Vec<WeeklyScheduleSlot>, AppError>;

    async fn upsert_blocked_date(&self, blocked: &BlockedDate) -> Result<BlockedDate, AppError>;
    async fn find_blocked_date(&self, provider_id: &str, date: NaiveDate) -> Result<Option<BlockedDate>, AppError>;
    async fn list_blocked_dates(&self, provider_id: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<BlockedDate>, AppError>;
    async fn delete_blocked_date(&self, provider_id: &str, date: NaiveDate) -> Result<(), AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts the booking and its line items. Fails with `Conflict` when the
    /// provider already has an active booking at the same instant.
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_customer(&self, customer_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_by_provider(&self, provider_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_active_by_range(&self, provider_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, AppError>;
    async fn update_status(&self, id: &str, status: BookingStatus, completed_at: Option<DateTime<Utc>>) -> Result<Booking, AppError>;
    /// Stamps the booking cancelled and stores the cancellation record atomically.
    async fn cancel(&self, cancellation: &Cancellation) -> Result<Booking, AppError>;
    async fn mark_fee_refunded(&self, booking_id: &str, at: DateTime<Utc>) -> Result<Booking, AppError>;
    async fn exists_for_quote_response(&self, quote_response_id: &str) -> Result<bool, AppError>;
    async fn count_by_status(&self, status: BookingStatus) -> Result<i64, AppError>;
}

#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn create_request(&self, request: &QuoteRequest) -> Result<QuoteRequest, AppError>;
    async fn find_request(&self, id: &str) -> Result<Option<QuoteRequest>, AppError>;
    async fn list_requests_by_customer(&self, customer_id: &str) -> Result<Vec<QuoteRequest>, AppError>;
    async fn list_open_requests(&self, category_id: Option<&str>, now: DateTime<Utc>) -> Result<Vec<QuoteRequest>, AppError>;
    async fn cancel_request(&self, id: &str) -> Result<QuoteRequest, AppError>;

    /// Inserts the response and moves an open request to quoted.
    async fn create_response(&self, response: &QuoteResponse) -> Result<QuoteResponse, AppError>;
    async fn find_response(&self, id: &str) -> Result<Option<QuoteResponse>, AppError>;
    async fn list_responses_for_request(&self, quote_request_id: &str) -> Result<Vec<QuoteResponse>, AppError>;
    async fn list_responses_by_provider(&self, provider_id: &str) -> Result<Vec<QuoteResponse>, AppError>;
    /// Accepts one response, rejects its pending siblings and stamps the request accepted.
    async fn accept_response(&self, response: &QuoteResponse) -> Result<QuoteResponse, AppError>;

    /// Returns (expired requests, expired responses).
    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<(u64, u64), AppError>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(&self, review: &Review) -> Result<Review, AppError>;
    async fn find_by_booking(&self, booking_id: &str) -> Result<Option<Review>, AppError>;
    async fn list_by_provider(&self, provider_id: &str) -> Result<Vec<Review>, AppError>;
}

#[async_trait]
pub trait SupportRepository: Send + Sync {
    async fn create_ticket(&self, ticket: &SupportTicket) -> Result<SupportTicket, AppError>;
    async fn find_ticket(&self, id: &str) -> Result<Option<SupportTicket>, AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<SupportTicket>, AppError>;
    async fn list_all(&self, status: Option<TicketStatus>) -> Result<Vec<SupportTicket>, AppError>;
    async fn add_response(&self, response: &SupportTicketResponse, advance_to: Option<TicketStatus>) -> Result<SupportTicketResponse, AppError>;
    async fn list_responses(&self, ticket_id: &str) -> Result<Vec<SupportTicketResponse>, AppError>;
    async fn update_status(&self, id: &str, status: TicketStatus, assigned_to: &str, resolved_at: Option<DateTime<Utc>>) -> Result<SupportTicket, AppError>;
    async fn count_by_status(&self, status: TicketStatus) -> Result<i64, AppError>;
}

#[async_trait]
pub trait ChangeRequestRepository: Send + Sync {
    async fn create(&self, request: &ProviderChangeRequest) -> Result<ProviderChangeRequest, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<ProviderChangeRequest>, AppError>;
    async fn list_by_provider(&self, provider_id: &str) -> Result<Vec<ProviderChangeRequest>, AppError>;
    async fn list_by_status(&self, status: Option<ChangeRequestStatus>) -> Result<Vec<ProviderChangeRequest>, AppError>;
    /// Applies the encoded profile mutation and stamps the request approved in one transaction.
    async fn approve(&self, request: &ProviderChangeRequest, reviewer_id: &str, note: Option<String>, at: DateTime<Utc>) -> Result<ProviderChangeRequest, AppError>;
    async fn reject(&self, id: &str, reviewer_id: &str, note: Option<String>, at: DateTime<Utc>) -> Result<ProviderChangeRequest, AppError>;
    async fn count_by_status(&self, status: ChangeRequestStatus) -> Result<i64, AppError>;
}
