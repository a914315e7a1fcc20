use std::sync::Arc;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;
use crate::domain::models::booking::{Booking, BookingLineItem, BookingStatus, NewBookingParams, PaymentMethod};
use crate::domain::models::quote::{
    NewQuoteRequestParams, NewQuoteResponseParams, QuoteAnswer, QuoteRequest, QuoteRequestDetail,
    QuoteResponse, QuoteResponseStatus,
};
use crate::domain::models::user::{Actor, Role};
use crate::domain::ports::{AddressRepository, BookingRepository, ProviderRepository, QuoteRepository};
use crate::domain::services::availability::{ensure_on_grid, AvailabilityService, REASON_BLOCKED};
use crate::domain::services::guards::{ensure_owner, require_role, resolve_provider};
use crate::error::AppError;

pub struct CreateQuoteRequestInput {
    pub category_id: String,
    pub address_id: String,
    pub title: String,
    pub description: String,
    pub answers: Vec<QuoteAnswer>,
    pub photos: Vec<String>,
    pub preferred_dates: Vec<NaiveDate>,
}

pub struct RespondToQuoteInput {
    pub price: i64,
    pub estimated_duration: i32,
    pub materials_included: bool,
    pub materials_estimate: Option<i64>,
    pub message: String,
}

pub struct BookQuoteInput {
    pub scheduled_at: DateTime<Utc>,
    pub address_id: Option<String>,
    pub payment_method: PaymentMethod,
}

pub struct QuoteService {
    quote_repo: Arc<dyn QuoteRepository>,
    provider_repo: Arc<dyn ProviderRepository>,
    address_repo: Arc<dyn AddressRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    availability: AvailabilityService,
    platform_fee_percent: i64,
    request_ttl_days: i64,
    response_valid_days: i64,
}

impl QuoteService {
    pub fn new(
        quote_repo: Arc<dyn QuoteRepository>,
        provider_repo: Arc<dyn ProviderRepository>,
        address_repo: Arc<dyn AddressRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        availability: AvailabilityService,
        platform_fee_percent: i64,
        request_ttl_days: i64,
        response_valid_days: i64,
    ) -> Self {
        Self {
            quote_repo,
            provider_repo,
            address_repo,
            booking_repo,
            availability,
            platform_fee_percent,
            request_ttl_days,
            response_valid_days,
        }
    }

    async fn load_request(&self, id: &str) -> Result<QuoteRequest, AppError> {
        self.quote_repo.find_request(id).await?
            .ok_or(AppError::NotFound("Fant ikke forespørselen".into()))
    }

    async fn load_response(&self, id: &str) -> Result<QuoteResponse, AppError> {
        self.quote_repo.find_response(id).await?
            .ok_or(AppError::NotFound("Fant ikke tilbudet".into()))
    }

    async fn ensure_own_address(&self, actor: &Actor, address_id: &str) -> Result<(), AppError> {
        let address = self.address_repo.find_by_id(address_id).await?
            .ok_or(AppError::NotFound("Fant ikke adressen".into()))?;
        ensure_owner(&address.user_id, actor, "Adressen tilhører ikke deg")
    }

    pub async fn create_quote_request(&self, actor: &Actor, input: CreateQuoteRequestInput) -> Result<QuoteRequest, AppError> {
        require_role(actor, Role::Customer, "Kun kunder kan be om tilbud")?;

        if input.category_id.trim().is_empty() {
            return Err(AppError::Validation("Velg en kategori".into()));
        }
        if input.title.trim().is_empty() || input.description.trim().is_empty() {
            return Err(AppError::Validation("Tittel og beskrivelse må fylles ut".into()));
        }
        self.ensure_own_address(actor, &input.address_id).await?;

        let request = QuoteRequest::new(NewQuoteRequestParams {
            customer_id: actor.user_id.clone(),
            category_id: input.category_id,
            address_id: input.address_id,
            title: input.title.trim().to_string(),
            description: input.description,
            answers: input.answers,
            photos: input.photos,
            preferred_dates: input.preferred_dates,
            ttl_days: self.request_ttl_days,
        });

        let created = self.quote_repo.create_request(&request).await?;
        info!("Quote request created: {} in category {}", created.id, created.category_id);
        Ok(created)
    }

    pub async fn respond_to_quote(&self, actor: &Actor, quote_request_id: &str, input: RespondToQuoteInput) -> Result<QuoteResponse, AppError> {
        let provider = self.provider_repo.find_by_user_id(&actor.user_id).await?
            .ok_or(AppError::Conflict("Kun leverandører kan gi tilbud".into()))?;
        if !provider.is_approved() {
            return Err(AppError::Conflict("Leverandøren er ikke godkjent ennå".into()));
        }

        if input.price <= 0 {
            return Err(AppError::Validation("Prisen må være større enn 0".into()));
        }
        if input.estimated_duration <= 0 {
            return Err(AppError::Validation("Estimert varighet må være større enn 0".into()));
        }
        if input.materials_estimate.is_some_and(|m| m < 0) {
            return Err(AppError::Validation("Materialkostnaden kan ikke være negativ".into()));
        }
        if input.message.trim().is_empty() {
            return Err(AppError::Validation("Skriv en melding til kunden".into()));
        }

        let request = self.load_request(quote_request_id).await?;
        if !request.status.is_live() || request.is_expired_at(Utc::now()) {
            return Err(AppError::Conflict("Forespørselen tar ikke imot flere tilbud".into()));
        }

        let existing = self.quote_repo.list_responses_for_request(&request.id).await?;
        if existing.iter().any(|r| r.provider_id == provider.id) {
            return Err(AppError::Conflict("Du har allerede gitt tilbud på denne forespørselen".into()));
        }

        let response = QuoteResponse::new(NewQuoteResponseParams {
            quote_request_id: request.id.clone(),
            provider_id: provider.id.clone(),
            price: input.price,
            estimated_duration: input.estimated_duration,
            materials_included: input.materials_included,
            materials_estimate: input.materials_estimate,
            message: input.message,
            valid_days: self.response_valid_days,
        });

        let created = self.quote_repo.create_response(&response).await?;
        info!("Quote response {} from provider {} on request {}", created.id, provider.id, request.id);
        Ok(created)
    }

    pub async fn accept_quote_response(&self, actor: &Actor, response_id: &str) -> Result<QuoteResponse, AppError> {
        let response = self.load_response(response_id).await?;
        let request = self.load_request(&response.quote_request_id).await?;
        ensure_owner(&request.customer_id, actor, "Du kan ikke godta dette tilbudet")?;

        if response.status != QuoteResponseStatus::Pending {
            return Err(AppError::Conflict("Tilbudet kan ikke godtas i nåværende status".into()));
        }
        if response.valid_until <= Utc::now() {
            return Err(AppError::Conflict("Tilbudet har utløpt".into()));
        }
        if !request.status.is_live() {
            return Err(AppError::Conflict("Forespørselen er ikke lenger åpen".into()));
        }

        let accepted = self.quote_repo.accept_response(&response).await?;
        info!("Quote response {} accepted for request {}", accepted.id, request.id);
        Ok(accepted)
    }

    pub async fn cancel_quote_request(&self, actor: &Actor, quote_request_id: &str) -> Result<QuoteRequest, AppError> {
        let request = self.load_request(quote_request_id).await?;
        ensure_owner(&request.customer_id, actor, "Du kan ikke avbryte denne forespørselen")?;

        if !request.status.is_live() {
            return Err(AppError::Conflict("Forespørselen kan ikke avbrytes i nåværende status".into()));
        }

        let cancelled = self.quote_repo.cancel_request(&request.id).await?;
        info!("Quote request cancelled: {}", cancelled.id);
        Ok(cancelled)
    }

    /// Turns an accepted response into a confirmed single-item booking. The weekly
    /// schedule does not apply, blocked dates and taken instants do.
    pub async fn book_accepted_quote(&self, actor: &Actor, response_id: &str, input: BookQuoteInput) -> Result<Booking, AppError> {
        let response = self.load_response(response_id).await?;
        let request = self.load_request(&response.quote_request_id).await?;
        ensure_owner(&request.customer_id, actor, "Du kan ikke bestille dette tilbudet")?;

        if response.status != QuoteResponseStatus::Accepted {
            return Err(AppError::Conflict("Tilbudet må godtas før det kan bestilles".into()));
        }
        if self.booking_repo.exists_for_quote_response(&response.id).await? {
            return Err(AppError::Conflict("Tilbudet er allerede bestilt".into()));
        }
        if input.scheduled_at <= Utc::now() {
            return Err(AppError::Validation("Kan ikke bestille tilbake i tid".into()));
        }
        ensure_on_grid(input.scheduled_at, self.availability.tz())?;
        if self.availability.is_blocked_at(&response.provider_id, input.scheduled_at).await? {
            return Err(AppError::Conflict(REASON_BLOCKED.into()));
        }

        let address_id = match input.address_id {
            Some(id) => {
                self.ensure_own_address(actor, &id).await?;
                id
            }
            None => request.address_id.clone(),
        };

        let mut booking = Booking::new(NewBookingParams {
            customer_id: request.customer_id.clone(),
            provider_id: response.provider_id.clone(),
            address_id,
            scheduled_at: input.scheduled_at,
            services: vec![BookingLineItem {
                service_id: None,
                name: request.title.clone(),
                price: response.price,
                duration_min: response.estimated_duration,
            }],
            payment_method: input.payment_method,
            platform_fee_percent: self.platform_fee_percent,
            recipient_name: None,
            recipient_phone: None,
            notes: Some(response.message.clone()),
            quote_response_id: Some(response.id.clone()),
        });

        booking.status = BookingStatus::Confirmed;

        let created = self.booking_repo.create(&booking).await?;
        info!("Booking {} created from quote response {}", created.id, response.id);
        Ok(created)
    }

    /// Customers see every response on their own request; providers only their own.
    pub async fn get_quote_request(&self, actor: &Actor, quote_request_id: &str) -> Result<QuoteRequestDetail, AppError> {
        let request = self.load_request(quote_request_id).await?;
        let responses = self.quote_repo.list_responses_for_request(&request.id).await?;

        if actor.is_admin() || request.customer_id == actor.user_id {
            return Ok(QuoteRequestDetail { request, responses });
        }

        let provider = resolve_provider(self.provider_repo.as_ref(), actor).await?;
        let own: Vec<QuoteResponse> = responses.into_iter().filter(|r| r.provider_id == provider.id).collect();
        if own.is_empty() && !request.status.is_live() {
            return Err(AppError::Unauthorized("Du har ikke tilgang til denne forespørselen".into()));
        }
        Ok(QuoteRequestDetail { request, responses: own })
    }

    pub async fn list_my_quote_requests(&self, actor: &Actor) -> Result<Vec<QuoteRequest>, AppError> {
        self.quote_repo.list_requests_by_customer(&actor.user_id).await
    }

    pub async fn list_open_quote_requests(&self, actor: &Actor, category_id: Option<&str>) -> Result<Vec<QuoteRequest>, AppError> {
        resolve_provider(self.provider_repo.as_ref(), actor).await?;
        self.quote_repo.list_open_requests(category_id, Utc::now()).await
    }

    pub async fn list_my_responses(&self, actor: &Actor) -> Result<Vec<QuoteResponse>, AppError> {
        let provider = resolve_provider(self.provider_repo.as_ref(), actor).await?;
        self.quote_repo.list_responses_by_provider(&provider.id).await
    }
}
