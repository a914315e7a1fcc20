use std::sync::Arc;
use serde::Serialize;
use crate::domain::models::booking::BookingStatus;
use crate::domain::models::change_request::ChangeRequestStatus;
use crate::domain::models::provider::ProviderStatus;
use crate::domain::models::support::TicketStatus;
use crate::domain::models::user::Actor;
use crate::domain::ports::{BookingRepository, ChangeRequestRepository, ProviderRepository, SupportRepository, UserRepository};
use crate::domain::services::guards::require_admin;
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct BookingCounts {
    pub pending: i64,
    pub confirmed: i64,
    pub completed: i64,
    pub cancelled: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub users: i64,
    pub approved_providers: i64,
    pub pending_providers: i64,
    pub bookings: BookingCounts,
    pub open_tickets: i64,
    pub pending_change_requests: i64,
}

pub struct AdminService {
    user_repo: Arc<dyn UserRepository>,
    provider_repo: Arc<dyn ProviderRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    support_repo: Arc<dyn SupportRepository>,
    change_repo: Arc<dyn ChangeRequestRepository>,
}

impl AdminService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        provider_repo: Arc<dyn ProviderRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        support_repo: Arc<dyn SupportRepository>,
        change_repo: Arc<dyn ChangeRequestRepository>,
    ) -> Self {
        Self { user_repo, provider_repo, booking_repo, support_repo, change_repo }
    }

    pub async fn dashboard_stats(&self, actor: &Actor) -> Result<DashboardStats, AppError> {
        require_admin(actor)?;

        let (users, approved_providers, pending_providers, pending, confirmed, completed, cancelled, open_tickets, pending_change_requests) = tokio::try_join!(
            self.user_repo.count(),
            self.provider_repo.count_by_status(ProviderStatus::Approved),
            self.provider_repo.count_by_status(ProviderStatus::Pending),
            self.booking_repo.count_by_status(BookingStatus::Pending),
            self.booking_repo.count_by_status(BookingStatus::Confirmed),
            self.booking_repo.count_by_status(BookingStatus::Completed),
            self.booking_repo.count_by_status(BookingStatus::Cancelled),
            self.support_repo.count_by_status(TicketStatus::Open),
            self.change_repo.count_by_status(ChangeRequestStatus::Pending),
        )?;

        Ok(DashboardStats {
            users,
            approved_providers,
            pending_providers,
            bookings: BookingCounts { pending, confirmed, completed, cancelled },
            open_tickets,
            pending_change_requests,
        })
    }
}
