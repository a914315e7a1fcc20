use crate::domain::{
    models::booking::{Booking, BookingLineItem, BookingStatus, Cancellation},
    ports::BookingRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{SqlitePool, Row};
use chrono::{DateTime, Utc};
use tracing::warn;

const SLOT_TAKEN: &str = "Tidspunktet er allerede booket";
const QUOTE_ALREADY_BOOKED: &str = "Tilbudet er allerede bestilt";

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Attaches line items and the cancellation record, which live in their own tables.
    async fn hydrate(&self, mut booking: Booking) -> Result<Booking, AppError> {
        booking.services = sqlx::query_as::<_, BookingLineItem>(
            "SELECT service_id, name, price, duration_min FROM booking_services WHERE booking_id = ? ORDER BY position ASC"
        )
            .bind(&booking.id).fetch_all(&self.pool).await.map_err(AppError::Database)?;

        booking.cancellation = sqlx::query_as::<_, Cancellation>("SELECT * FROM cancellations WHERE booking_id = ?")
            .bind(&booking.id).fetch_optional(&self.pool).await.map_err(AppError::Database)?;

        Ok(booking)
    }

    async fn hydrate_all(&self, bookings: Vec<Booking>) -> Result<Vec<Booking>, AppError> {
        let mut out = Vec::with_capacity(bookings.len());
        for booking in bookings {
            out.push(self.hydrate(booking).await?);
        }
        Ok(out)
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let taken = sqlx::query(
            "SELECT COUNT(*) AS count FROM bookings WHERE provider_id = ? AND scheduled_at = ? AND status IN ('pending', 'confirmed')"
        )
            .bind(&booking.provider_id).bind(booking.scheduled_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?
            .get::<i64, _>("count");
        if taken > 0 {
            warn!("Slot conflict for provider {} at {}", booking.provider_id, booking.scheduled_at);
            return Err(AppError::Conflict(SLOT_TAKEN.into()));
        }

        let mut created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, customer_id, provider_id, address_id, recipient_name, recipient_phone, notes, scheduled_at, total_price, platform_fee, provider_payout, payment_method, payment_status, status, quote_response_id, created_at, completed_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.customer_id).bind(&booking.provider_id).bind(&booking.address_id)
            .bind(&booking.recipient_name).bind(&booking.recipient_phone).bind(&booking.notes)
            .bind(booking.scheduled_at).bind(booking.total_price).bind(booking.platform_fee).bind(booking.provider_payout)
            .bind(booking.payment_method).bind(booking.payment_status).bind(booking.status)
            .bind(&booking.quote_response_id).bind(booking.created_at).bind(booking.completed_at)
            .fetch_one(&mut *tx).await
            .map_err(|e| {
                let quote_clash = match e.as_database_error() {
                    Some(d) if d.is_unique_violation() => Some(d.message().contains("quote_response_id")),
                    _ => None,
                };
                match quote_clash {
                    Some(true) => {
                        warn!("Quote response {:?} booked twice", booking.quote_response_id);
                        AppError::Conflict(QUOTE_ALREADY_BOOKED.into())
                    }
                    Some(false) => {
                        warn!("Concurrent booking lost the race for provider {} at {}", booking.provider_id, booking.scheduled_at);
                        AppError::Conflict(SLOT_TAKEN.into())
                    }
                    None => AppError::Database(e),
                }
            })?;

        for (position, item) in booking.services.iter().enumerate() {
            sqlx::query(
                "INSERT INTO booking_services (booking_id, position, service_id, name, price, duration_min) VALUES (?, ?, ?, ?, ?, ?)"
            )
                .bind(&booking.id).bind(position as i64).bind(&item.service_id)
                .bind(&item.name).bind(item.price).bind(item.duration_min)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        created.services = booking.services.clone();
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)?;
        match booking {
            Some(b) => Ok(Some(self.hydrate(b).await?)),
            None => Ok(None),
        }
    }

    async fn list_by_customer(&self, customer_id: &str) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE customer_id = ? ORDER BY scheduled_at DESC")
            .bind(customer_id).fetch_all(&self.pool).await.map_err(AppError::Database)?;
        self.hydrate_all(bookings).await
    }

    async fn list_by_provider(&self, provider_id: &str) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE provider_id = ? ORDER BY scheduled_at ASC")
            .bind(provider_id).fetch_all(&self.pool).await.map_err(AppError::Database)?;
        self.hydrate_all(bookings).await
    }

    async fn list_active_by_range(&self, provider_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE provider_id = ? AND scheduled_at >= ? AND scheduled_at < ? AND status IN ('pending', 'confirmed') ORDER BY scheduled_at ASC"
        )
            .bind(provider_id).bind(start).bind(end)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_status(&self, id: &str, status: BookingStatus, completed_at: Option<DateTime<Utc>>) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = ?, completed_at = COALESCE(?, completed_at) WHERE id = ? RETURNING *"
        )
            .bind(status).bind(completed_at).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Fant ikke bookingen".into()))?;
        self.hydrate(booking).await
    }

    async fn cancel(&self, cancellation: &Cancellation) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let cancelled = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = 'cancelled' WHERE id = ? AND status IN ('pending', 'confirmed') RETURNING *"
        )
            .bind(&cancellation.booking_id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::Conflict("Bookingen kan ikke kanselleres i nåværende status".into()))?;

        sqlx::query(
            "INSERT INTO cancellations (booking_id, cancelled_at, cancelled_by, reason, was_within_24_hours, cancellation_fee, fee_refunded, fee_refunded_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
            .bind(&cancellation.booking_id).bind(cancellation.cancelled_at).bind(cancellation.cancelled_by)
            .bind(&cancellation.reason).bind(cancellation.was_within_24_hours).bind(cancellation.cancellation_fee)
            .bind(cancellation.fee_refunded).bind(cancellation.fee_refunded_at)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        self.hydrate(cancelled).await
    }

    async fn mark_fee_refunded(&self, booking_id: &str, at: DateTime<Utc>) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let result = sqlx::query(
            "UPDATE cancellations SET fee_refunded = 1, fee_refunded_at = ? WHERE booking_id = ? AND fee_refunded = 0"
        )
            .bind(at).bind(booking_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::Conflict("Gebyret er allerede refundert".into()));
        }

        let booking = sqlx::query_as::<_, Booking>("UPDATE bookings SET payment_status = 'refunded' WHERE id = ? RETURNING *")
            .bind(booking_id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        self.hydrate(booking).await
    }

    async fn exists_for_quote_response(&self, quote_response_id: &str) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM bookings WHERE quote_response_id = ? AND status != 'cancelled'")
            .bind(quote_response_id).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count") > 0)
    }

    async fn count_by_status(&self, status: BookingStatus) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM bookings WHERE status = ?")
            .bind(status).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }
}
