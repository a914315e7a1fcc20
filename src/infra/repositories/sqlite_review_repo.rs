use crate::domain::{models::review::Review, ports::ReviewRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteReviewRepo {
    pool: SqlitePool,
}

impl SqliteReviewRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for SqliteReviewRepo {
    async fn create(&self, review: &Review) -> Result<Review, AppError> {
        sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (id, booking_id, customer_id, provider_id, rating, comment, created_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&review.id).bind(&review.booking_id).bind(&review.customer_id).bind(&review.provider_id)
            .bind(review.rating).bind(&review.comment).bind(review.created_at)
            .fetch_one(&self.pool).await
            .map_err(|e| {
                if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
                    return AppError::Conflict("Bookingen er allerede vurdert".into());
                }
                AppError::Database(e)
            })
    }

    async fn find_by_booking(&self, booking_id: &str) -> Result<Option<Review>, AppError> {
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE booking_id = ?")
            .bind(booking_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_provider(&self, provider_id: &str) -> Result<Vec<Review>, AppError> {
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE provider_id = ? ORDER BY created_at DESC")
            .bind(provider_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
