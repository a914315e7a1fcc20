use std::sync::Arc;
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use crate::domain::models::booking::{
    Booking, BookingLineItem, BookingStatus, Cancellation, CancelledBy, NewBookingParams, PaymentMethod,
};
use crate::domain::models::user::{Actor, Role};
use crate::domain::ports::{AddressRepository, BookingRepository, ProviderRepository};
use crate::domain::services::availability::{ensure_on_grid, AvailabilityService};
use crate::domain::services::guards::{ensure_owner, ensure_provider_owner, require_admin, require_role, resolve_provider};
use crate::error::AppError;

pub struct CreateBookingInput {
    pub provider_id: String,
    pub address_id: String,
    pub service_ids: Vec<String>,
    pub scheduled_at: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub recipient_name: Option<String>,
    pub recipient_phone: Option<String>,
    pub notes: Option<String>,
}

pub struct BookingService {
    booking_repo: Arc<dyn BookingRepository>,
    provider_repo: Arc<dyn ProviderRepository>,
    address_repo: Arc<dyn AddressRepository>,
    availability: AvailabilityService,
    platform_fee_percent: i64,
    auto_confirm: bool,
}

impl BookingService {
    pub fn new(
        booking_repo: Arc<dyn BookingRepository>,
        provider_repo: Arc<dyn ProviderRepository>,
        address_repo: Arc<dyn AddressRepository>,
        availability: AvailabilityService,
        platform_fee_percent: i64,
        auto_confirm: bool,
    ) -> Self {
        Self { booking_repo, provider_repo, address_repo, availability, platform_fee_percent, auto_confirm }
    }

    async fn load(&self, booking_id: &str) -> Result<Booking, AppError> {
        self.booking_repo.find_by_id(booking_id).await?
            .ok_or(AppError::NotFound("Fant ikke bookingen".into()))
    }

    pub async fn create_booking(&self, actor: &Actor, input: CreateBookingInput) -> Result<Booking, AppError> {
        require_role(actor, Role::Customer, "Kun kunder kan bestille tjenester")?;

        let address = self.address_repo.find_by_id(&input.address_id).await?
            .ok_or(AppError::NotFound("Fant ikke adressen".into()))?;
        ensure_owner(&address.user_id, actor, "Adressen tilhører ikke deg")?;

        let provider = self.provider_repo.find_by_id(&input.provider_id).await?
            .ok_or(AppError::NotFound("Fant ikke leverandøren".into()))?;
        if !provider.is_approved() {
            return Err(AppError::Conflict("Leverandøren er ikke godkjent ennå".into()));
        }

        if input.service_ids.is_empty() {
            return Err(AppError::Validation("Velg minst én tjeneste".into()));
        }

        let mut line_items = Vec::with_capacity(input.service_ids.len());
        for service_id in &input.service_ids {
            let service = self.provider_repo.find_service(service_id).await?
                .ok_or(AppError::NotFound("Fant ikke tjenesten".into()))?;
            if service.provider_id != provider.id || !service.is_active {
                return Err(AppError::Validation("Tjenesten tilbys ikke av denne leverandøren".into()));
            }
            line_items.push(BookingLineItem {
                service_id: Some(service.id),
                name: service.name,
                price: service.price,
                duration_min: service.duration_min,
            });
        }

        if input.scheduled_at <= Utc::now() {
            return Err(AppError::Validation("Kan ikke bestille tilbake i tid".into()));
        }

        ensure_on_grid(input.scheduled_at, self.availability.tz())?;

        let check = self.availability.check_availability(&provider.id, input.scheduled_at).await?;
        if !check.available {
            let reason = check.reason.unwrap_or_else(|| "Tidspunktet er ikke ledig".into());
            warn!("Booking rejected for provider {} at {}: {}", provider.id, input.scheduled_at, reason);
            return Err(AppError::Conflict(reason));
        }

        let mut booking = Booking::new(NewBookingParams {
            customer_id: actor.user_id.clone(),
            provider_id: provider.id.clone(),
            address_id: address.id,
            scheduled_at: input.scheduled_at,
            services: line_items,
            payment_method: input.payment_method,
            platform_fee_percent: self.platform_fee_percent,
            recipient_name: input.recipient_name,
            recipient_phone: input.recipient_phone,
            notes: input.notes,
            quote_response_id: None,
        });

        if self.auto_confirm {
            booking.status = BookingStatus::Confirmed;
        }

        let created = self.booking_repo.create(&booking).await?;
        info!("Booking created: {} with provider {} ({:?})", created.id, created.provider_id, created.status);
        Ok(created)
    }

    pub async fn confirm_booking(&self, actor: &Actor, booking_id: &str) -> Result<Booking, AppError> {
        let booking = self.load(booking_id).await?;
        ensure_provider_owner(self.provider_repo.as_ref(), &booking.provider_id, actor).await?;

        match booking.status {
            BookingStatus::Pending => {
                let confirmed = self.booking_repo.update_status(&booking.id, BookingStatus::Confirmed, None).await?;
                info!("Booking confirmed: {}", confirmed.id);
                Ok(confirmed)
            }
            BookingStatus::Confirmed => Ok(booking),
            BookingStatus::Completed | BookingStatus::Cancelled => {
                Err(AppError::Conflict("Bookingen kan ikke bekreftes i nåværende status".into()))
            }
        }
    }

    pub async fn complete_booking(&self, actor: &Actor, booking_id: &str) -> Result<Booking, AppError> {
        let booking = self.load(booking_id).await?;
        ensure_provider_owner(self.provider_repo.as_ref(), &booking.provider_id, actor).await?;

        if booking.status.is_terminal() {
            return Err(AppError::Conflict("Bookingen er allerede avsluttet".into()));
        }

        let completed = self.booking_repo
            .update_status(&booking.id, BookingStatus::Completed, Some(Utc::now()))
            .await?;
        info!("Booking completed: {}", completed.id);
        Ok(completed)
    }

    pub async fn cancel_booking(&self, actor: &Actor, booking_id: &str, reason: Option<String>) -> Result<Booking, AppError> {
        let booking = self.load(booking_id).await?;

        let cancelled_by = if booking.customer_id == actor.user_id {
            CancelledBy::Customer
        } else {
            match self.provider_repo.find_by_user_id(&actor.user_id).await? {
                Some(p) if p.id == booking.provider_id => CancelledBy::Provider,
                _ => return Err(AppError::Unauthorized("Du kan ikke kansellere denne bookingen".into())),
            }
        };

        if booking.status.is_terminal() {
            return Err(AppError::Conflict("Bookingen kan ikke kanselleres i nåværende status".into()));
        }

        let cancellation = Cancellation::new(&booking, cancelled_by, reason, Utc::now());
        let cancelled = self.booking_repo.cancel(&cancellation).await?;
        info!(
            "Booking cancelled: {} by {:?} (fee {})",
            cancelled.id, cancellation.cancelled_by, cancellation.cancellation_fee
        );
        Ok(cancelled)
    }

    pub async fn get_booking(&self, actor: &Actor, booking_id: &str) -> Result<Booking, AppError> {
        let booking = self.load(booking_id).await?;
        if actor.is_admin() || booking.customer_id == actor.user_id {
            return Ok(booking);
        }
        ensure_provider_owner(self.provider_repo.as_ref(), &booking.provider_id, actor).await?;
        Ok(booking)
    }

    pub async fn list_customer_bookings(&self, actor: &Actor) -> Result<Vec<Booking>, AppError> {
        self.booking_repo.list_by_customer(&actor.user_id).await
    }

    pub async fn list_provider_bookings(&self, actor: &Actor) -> Result<Vec<Booking>, AppError> {
        let provider = resolve_provider(self.provider_repo.as_ref(), actor).await?;
        self.booking_repo.list_by_provider(&provider.id).await
    }

    pub async fn refund_cancellation_fee(&self, actor: &Actor, booking_id: &str) -> Result<Booking, AppError> {
        require_admin(actor)?;
        let booking = self.load(booking_id).await?;

        let cancellation = booking.cancellation.as_ref()
            .ok_or(AppError::Conflict("Bookingen er ikke kansellert".into()))?;
        if cancellation.cancellation_fee == 0 {
            return Err(AppError::Conflict("Det er ikke noe gebyr å refundere".into()));
        }
        if cancellation.fee_refunded {
            return Err(AppError::Conflict("Gebyret er allerede refundert".into()));
        }

        let refunded = self.booking_repo.mark_fee_refunded(&booking.id, Utc::now()).await?;
        info!("Cancellation fee refunded for booking {}", refunded.id);
        Ok(refunded)
    }
}
