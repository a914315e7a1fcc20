use std::sync::Arc;
use crate::domain::ports::{
    AddressRepository, AuthRepository, BookingRepository, ChangeRequestRepository, ProviderRepository,
    QuoteRepository, ReviewRepository, ScheduleRepository, SupportRepository, UserRepository,
};
use crate::domain::services::{
    address_service::AddressService, admin_service::AdminService, auth_service::AuthService,
    availability::AvailabilityService, booking_service::BookingService, provider_service::ProviderDirectory,
    quote_service::QuoteService, review_service::ReviewService, schedule_service::ScheduleService,
    support_service::SupportService,
};
use crate::config::Config;
use crate::error::AppError;

/// Store handles. Everything the services need comes from here.
#[derive(Clone)]
pub struct Repositories {
    pub user_repo: Arc<dyn UserRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub address_repo: Arc<dyn AddressRepository>,
    pub provider_repo: Arc<dyn ProviderRepository>,
    pub schedule_repo: Arc<dyn ScheduleRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub quote_repo: Arc<dyn QuoteRepository>,
    pub review_repo: Arc<dyn ReviewRepository>,
    pub support_repo: Arc<dyn SupportRepository>,
    pub change_repo: Arc<dyn ChangeRequestRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub provider_repo: Arc<dyn ProviderRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub quote_repo: Arc<dyn QuoteRepository>,
    pub auth_service: Arc<AuthService>,
    pub address_service: Arc<AddressService>,
    pub provider_service: Arc<ProviderDirectory>,
    pub schedule_service: Arc<ScheduleService>,
    pub availability_service: AvailabilityService,
    pub booking_service: Arc<BookingService>,
    pub quote_service: Arc<QuoteService>,
    pub review_service: Arc<ReviewService>,
    pub support_service: Arc<SupportService>,
    pub admin_service: Arc<AdminService>,
}

impl AppState {
    pub fn new(config: Config, repos: Repositories) -> Result<Self, AppError> {
        let tz = config.tz();
        let availability_service = AvailabilityService::new(repos.schedule_repo.clone(), repos.booking_repo.clone(), tz);

        let auth_service = Arc::new(AuthService::new(repos.auth_repo.clone(), repos.user_repo.clone(), config.clone())?);

        let booking_service = Arc::new(BookingService::new(
            repos.booking_repo.clone(),
            repos.provider_repo.clone(),
            repos.address_repo.clone(),
            availability_service.clone(),
            config.platform_fee_percent,
            config.auto_confirm_bookings,
        ));

        let quote_service = Arc::new(QuoteService::new(
            repos.quote_repo.clone(),
            repos.provider_repo.clone(),
            repos.address_repo.clone(),
            repos.booking_repo.clone(),
            availability_service.clone(),
            config.platform_fee_percent,
            config.quote_request_ttl_days,
            config.quote_response_valid_days,
        ));

        Ok(Self {
            user_repo: repos.user_repo.clone(),
            provider_repo: repos.provider_repo.clone(),
            booking_repo: repos.booking_repo.clone(),
            quote_repo: repos.quote_repo.clone(),
            auth_service,
            address_service: Arc::new(AddressService::new(repos.address_repo.clone())),
            provider_service: Arc::new(ProviderDirectory::new(repos.provider_repo.clone(), repos.change_repo.clone())),
            schedule_service: Arc::new(ScheduleService::new(repos.schedule_repo.clone(), repos.provider_repo.clone())),
            availability_service,
            booking_service,
            quote_service,
            review_service: Arc::new(ReviewService::new(repos.review_repo.clone(), repos.booking_repo.clone())),
            support_service: Arc::new(SupportService::new(repos.support_repo.clone())),
            admin_service: Arc::new(AdminService::new(
                repos.user_repo.clone(),
                repos.provider_repo.clone(),
                repos.booking_repo.clone(),
                repos.support_repo.clone(),
                repos.change_repo.clone(),
            )),
            config,
        })
    }
}
