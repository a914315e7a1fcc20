use std::sync::Arc;
use tracing::info;
use crate::domain::models::booking::BookingStatus;
use crate::domain::models::review::{ProviderReviews, Review};
use crate::domain::models::user::Actor;
use crate::domain::ports::{BookingRepository, ReviewRepository};
use crate::domain::services::guards::ensure_owner;
use crate::error::AppError;

pub struct ReviewService {
    review_repo: Arc<dyn ReviewRepository>,
    booking_repo: Arc<dyn BookingRepository>,
}

impl ReviewService {
    pub fn new(review_repo: Arc<dyn ReviewRepository>, booking_repo: Arc<dyn BookingRepository>) -> Self {
        Self { review_repo, booking_repo }
    }

    /// One review per completed booking, written by the booking's customer.
    pub async fn create_review(&self, actor: &Actor, booking_id: &str, rating: i32, comment: Option<String>) -> Result<Review, AppError> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::Validation("Vurderingen må være mellom 1 og 5".into()));
        }

        let booking = self.booking_repo.find_by_id(booking_id).await?
            .ok_or(AppError::NotFound("Fant ikke bookingen".into()))?;
        ensure_owner(&booking.customer_id, actor, "Du kan bare vurdere dine egne bookinger")?;

        if booking.status != BookingStatus::Completed {
            return Err(AppError::Conflict("Du kan bare vurdere fullførte bookinger".into()));
        }
        if self.review_repo.find_by_booking(&booking.id).await?.is_some() {
            return Err(AppError::Conflict("Bookingen er allerede vurdert".into()));
        }

        let comment = comment.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        let review = Review::new(booking.id, actor.user_id.clone(), booking.provider_id, rating, comment);
        let created = self.review_repo.create(&review).await?;
        info!("Review {} ({} stars) for provider {}", created.id, created.rating, created.provider_id);
        Ok(created)
    }

    pub async fn list_provider_reviews(&self, provider_id: &str) -> Result<ProviderReviews, AppError> {
        let reviews = self.review_repo.list_by_provider(provider_id).await?;
        Ok(ProviderReviews::from_reviews(provider_id.to_string(), reviews))
    }
}
