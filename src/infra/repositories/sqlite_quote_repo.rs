use crate::domain::{
    models::quote::{QuoteRequest, QuoteResponse},
    ports::QuoteRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteQuoteRepo {
    pool: SqlitePool,
}

impl SqliteQuoteRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuoteRepository for SqliteQuoteRepo {
    async fn create_request(&self, request: &QuoteRequest) -> Result<QuoteRequest, AppError> {
        sqlx::query_as::<_, QuoteRequest>(
            "INSERT INTO quote_requests (id, customer_id, category_id, address_id, title, description, answers, photos, preferred_dates, status, created_at, expires_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&request.id).bind(&request.customer_id).bind(&request.category_id).bind(&request.address_id)
            .bind(&request.title).bind(&request.description)
            .bind(&request.answers).bind(&request.photos).bind(&request.preferred_dates)
            .bind(request.status).bind(request.created_at).bind(request.expires_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_request(&self, id: &str) -> Result<Option<QuoteRequest>, AppError> {
        sqlx::query_as::<_, QuoteRequest>("SELECT * FROM quote_requests WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_requests_by_customer(&self, customer_id: &str) -> Result<Vec<QuoteRequest>, AppError> {
        sqlx::query_as::<_, QuoteRequest>("SELECT * FROM quote_requests WHERE customer_id = ? ORDER BY created_at DESC")
            .bind(customer_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_open_requests(&self, category_id: Option<&str>, now: DateTime<Utc>) -> Result<Vec<QuoteRequest>, AppError> {
        sqlx::query_as::<_, QuoteRequest>(
            "SELECT * FROM quote_requests
             WHERE status IN ('open', 'quoted') AND expires_at > ? AND (? IS NULL OR category_id = ?)
             ORDER BY created_at DESC"
        )
            .bind(now).bind(category_id).bind(category_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn cancel_request(&self, id: &str) -> Result<QuoteRequest, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let cancelled = sqlx::query_as::<_, QuoteRequest>(
            "UPDATE quote_requests SET status = 'cancelled' WHERE id = ? AND status IN ('open', 'quoted') RETURNING *"
        )
            .bind(id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::Conflict("Forespørselen kan ikke avbrytes i nåværende status".into()))?;

        sqlx::query("UPDATE quote_responses SET status = 'rejected' WHERE quote_request_id = ? AND status = 'pending'")
            .bind(id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(cancelled)
    }

    async fn create_response(&self, response: &QuoteResponse) -> Result<QuoteResponse, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, QuoteResponse>(
            "INSERT INTO quote_responses (id, quote_request_id, provider_id, price, estimated_duration, materials_included, materials_estimate, message, valid_until, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&response.id).bind(&response.quote_request_id).bind(&response.provider_id)
            .bind(response.price).bind(response.estimated_duration).bind(response.materials_included)
            .bind(response.materials_estimate).bind(&response.message).bind(response.valid_until)
            .bind(response.status).bind(response.created_at)
            .fetch_one(&mut *tx).await
            .map_err(|e| {
                if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
                    return AppError::Conflict("Du har allerede gitt tilbud på denne forespørselen".into());
                }
                AppError::Database(e)
            })?;

        sqlx::query("UPDATE quote_requests SET status = 'quoted' WHERE id = ? AND status = 'open'")
            .bind(&response.quote_request_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_response(&self, id: &str) -> Result<Option<QuoteResponse>, AppError> {
        sqlx::query_as::<_, QuoteResponse>("SELECT * FROM quote_responses WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_responses_for_request(&self, quote_request_id: &str) -> Result<Vec<QuoteResponse>, AppError> {
        sqlx::query_as::<_, QuoteResponse>("SELECT * FROM quote_responses WHERE quote_request_id = ? ORDER BY price ASC, created_at ASC")
            .bind(quote_request_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_responses_by_provider(&self, provider_id: &str) -> Result<Vec<QuoteResponse>, AppError> {
        sqlx::query_as::<_, QuoteResponse>("SELECT * FROM quote_responses WHERE provider_id = ? ORDER BY created_at DESC")
            .bind(provider_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn accept_response(&self, response: &QuoteResponse) -> Result<QuoteResponse, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let request_updated = sqlx::query(
            "UPDATE quote_requests SET status = 'accepted' WHERE id = ? AND status IN ('open', 'quoted')"
        )
            .bind(&response.quote_request_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        if request_updated.rows_affected() == 0 {
            return Err(AppError::Conflict("Forespørselen er ikke lenger åpen".into()));
        }

        let accepted = sqlx::query_as::<_, QuoteResponse>(
            "UPDATE quote_responses SET status = 'accepted' WHERE id = ? AND status = 'pending' RETURNING *"
        )
            .bind(&response.id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::Conflict("Tilbudet kan ikke godtas i nåværende status".into()))?;

        sqlx::query("UPDATE quote_responses SET status = 'rejected' WHERE quote_request_id = ? AND id != ? AND status = 'pending'")
            .bind(&response.quote_request_id).bind(&response.id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(accepted)
    }

    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<(u64, u64), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let requests = sqlx::query("UPDATE quote_requests SET status = 'expired' WHERE status IN ('open', 'quoted') AND expires_at <= ?")
            .bind(now)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        let responses = sqlx::query("UPDATE quote_responses SET status = 'expired' WHERE status = 'pending' AND valid_until <= ?")
            .bind(now)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok((requests.rows_affected(), responses.rows_affected()))
    }
}
