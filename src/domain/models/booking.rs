use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Pending and confirmed bookings occupy their slot.
    pub fn is_active(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentMethod {
    Vipps,
    Card,
}

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum CancelledBy {
    Customer,
    Provider,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, Eq)]
pub struct BookingLineItem {
    pub service_id: Option<String>,
    pub name: String,
    pub price: i64,
    pub duration_min: i32,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Cancellation {
    pub booking_id: String,
    pub cancelled_at: DateTime<Utc>,
    pub cancelled_by: CancelledBy,
    pub reason: Option<String>,
    pub was_within_24_hours: bool,
    pub cancellation_fee: i64,
    pub fee_refunded: bool,
    pub fee_refunded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub customer_id: String,
    pub provider_id: String,
    pub address_id: String,
    pub recipient_name: Option<String>,
    pub recipient_phone: Option<String>,
    pub notes: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub total_price: i64,
    pub platform_fee: i64,
    pub provider_payout: i64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub status: BookingStatus,
    pub quote_response_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    #[sqlx(skip)]
    pub services: Vec<BookingLineItem>,
    #[sqlx(skip)]
    pub cancellation: Option<Cancellation>,
}

pub struct NewBookingParams {
    pub customer_id: String,
    pub provider_id: String,
    pub address_id: String,
    pub scheduled_at: DateTime<Utc>,
    pub services: Vec<BookingLineItem>,
    pub payment_method: PaymentMethod,
    pub platform_fee_percent: i64,
    pub recipient_name: Option<String>,
    pub recipient_phone: Option<String>,
    pub notes: Option<String>,
    pub quote_response_id: Option<String>,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let total_price: i64 = params.services.iter().map(|s| s.price).sum();
        let (platform_fee, provider_payout) = split_price(total_price, params.platform_fee_percent);

        Self {
            id: Uuid::new_v4().to_string(),
            customer_id: params.customer_id,
            provider_id: params.provider_id,
            address_id: params.address_id,
            recipient_name: params.recipient_name,
            recipient_phone: params.recipient_phone,
            notes: params.notes,
            scheduled_at: params.scheduled_at,
            total_price,
            platform_fee,
            provider_payout,
            payment_method: params.payment_method,
            payment_status: PaymentStatus::Pending,
            status: BookingStatus::Pending,
            quote_response_id: params.quote_response_id,
            created_at: Utc::now(),
            completed_at: None,
            services: params.services,
            cancellation: None,
        }
    }

    pub fn duration_min(&self) -> i32 {
        self.services.iter().map(|s| s.duration_min).sum()
    }
}

impl Cancellation {
    pub fn new(booking: &Booking, cancelled_by: CancelledBy, reason: Option<String>, now: DateTime<Utc>) -> Self {
        let (was_within_24_hours, cancellation_fee) =
            cancellation_terms(booking.total_price, booking.scheduled_at, now);

        Self {
            booking_id: booking.id.clone(),
            cancelled_at: now,
            cancelled_by,
            reason,
            was_within_24_hours,
            cancellation_fee,
            fee_refunded: false,
            fee_refunded_at: None,
        }
    }
}

/// Splits a total into (platform fee, provider payout).
pub fn split_price(total_price: i64, fee_percent: i64) -> (i64, i64) {
    let fee = (total_price as f64 * fee_percent as f64 / 100.0).round() as i64;
    (fee, total_price - fee)
}

/// Late cancellations (less than 24h before start) cost half the price.
pub fn cancellation_terms(total_price: i64, scheduled_at: DateTime<Utc>, now: DateTime<Utc>) -> (bool, i64) {
    let within_24_hours = scheduled_at - now < Duration::hours(24);
    let fee = if within_24_hours {
        (total_price as f64 * 0.5).round() as i64
    } else {
        0
    };
    (within_24_hours, fee)
}
