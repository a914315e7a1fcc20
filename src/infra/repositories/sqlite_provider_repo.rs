use crate::domain::{
    models::provider::{ProviderCertificate, ProviderLanguage, ProviderService, ProviderStatus, ServiceProvider},
    ports::ProviderRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

pub struct SqliteProviderRepo {
    pool: SqlitePool,
}

impl SqliteProviderRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProviderRepository for SqliteProviderRepo {
    async fn create(&self, provider: &ServiceProvider) -> Result<ServiceProvider, AppError> {
        sqlx::query_as::<_, ServiceProvider>(
            "INSERT INTO service_providers (id, user_id, business_name, bio, status, has_police_check, has_insurance, education, created_at, approved_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&provider.id).bind(&provider.user_id).bind(&provider.business_name).bind(&provider.bio)
            .bind(provider.status).bind(provider.has_police_check).bind(provider.has_insurance)
            .bind(&provider.education).bind(provider.created_at).bind(provider.approved_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ServiceProvider>, AppError> {
        sqlx::query_as::<_, ServiceProvider>("SELECT * FROM service_providers WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<ServiceProvider>, AppError> {
        sqlx::query_as::<_, ServiceProvider>("SELECT * FROM service_providers WHERE user_id = ?")
            .bind(user_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn set_status(&self, id: &str, status: ProviderStatus, approved_at: Option<DateTime<Utc>>) -> Result<ServiceProvider, AppError> {
        sqlx::query_as::<_, ServiceProvider>(
            "UPDATE service_providers SET status = ?, approved_at = ? WHERE id = ? RETURNING *"
        )
            .bind(status).bind(approved_at).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Fant ikke leverandøren".into()))
    }

    async fn count_by_status(&self, status: ProviderStatus) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM service_providers WHERE status = ?")
            .bind(status).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }

    async fn list_certificates(&self, provider_id: &str) -> Result<Vec<ProviderCertificate>, AppError> {
        sqlx::query_as::<_, ProviderCertificate>("SELECT * FROM provider_certificates WHERE provider_id = ? ORDER BY year DESC, name ASC")
            .bind(provider_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_languages(&self, provider_id: &str) -> Result<Vec<ProviderLanguage>, AppError> {
        sqlx::query_as::<_, ProviderLanguage>("SELECT * FROM provider_languages WHERE provider_id = ? ORDER BY language ASC")
            .bind(provider_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn create_service(&self, service: &ProviderService) -> Result<ProviderService, AppError> {
        sqlx::query_as::<_, ProviderService>(
            "INSERT INTO provider_services (id, provider_id, category_id, name, price, duration_min, is_active)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&service.id).bind(&service.provider_id).bind(&service.category_id).bind(&service.name)
            .bind(service.price).bind(service.duration_min).bind(service.is_active)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_service(&self, id: &str) -> Result<Option<ProviderService>, AppError> {
        sqlx::query_as::<_, ProviderService>("SELECT * FROM provider_services WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_services(&self, provider_id: &str) -> Result<Vec<ProviderService>, AppError> {
        sqlx::query_as::<_, ProviderService>("SELECT * FROM provider_services WHERE provider_id = ? ORDER BY name ASC")
            .bind(provider_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn deactivate_service(&self, id: &str) -> Result<ProviderService, AppError> {
        sqlx::query_as::<_, ProviderService>("UPDATE provider_services SET is_active = 0 WHERE id = ? RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Fant ikke tjenesten".into()))
    }
}
