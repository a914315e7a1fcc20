use crate::domain::{
    models::change_request::{ChangeRequestStatus, ProfileChange, ProviderChangeRequest},
    ports::ChangeRequestRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

pub struct SqliteChangeRequestRepo {
    pool: SqlitePool,
}

impl SqliteChangeRequestRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Writes one profile mutation inside the approval transaction.
async fn apply_change(tx: &mut Transaction<'_, Sqlite>, provider_id: &str, change: &ProfileChange) -> Result<(), AppError> {
    let result = match change {
        ProfileChange::AddCertificate { name, issuer, year } => {
            sqlx::query("INSERT INTO provider_certificates (id, provider_id, name, issuer, year) VALUES (?, ?, ?, ?, ?)")
                .bind(Uuid::new_v4().to_string()).bind(provider_id).bind(name).bind(issuer).bind(year)
                .execute(&mut **tx).await
        }
        ProfileChange::UpdateCertificate { certificate_id, name, issuer, year } => {
            sqlx::query("UPDATE provider_certificates SET name = ?, issuer = ?, year = ? WHERE id = ? AND provider_id = ?")
                .bind(name).bind(issuer).bind(year).bind(certificate_id).bind(provider_id)
                .execute(&mut **tx).await
        }
        ProfileChange::RemoveCertificate { certificate_id } => {
            sqlx::query("DELETE FROM provider_certificates WHERE id = ? AND provider_id = ?")
                .bind(certificate_id).bind(provider_id)
                .execute(&mut **tx).await
        }
        ProfileChange::AddLanguage { language } => {
            sqlx::query("INSERT OR IGNORE INTO provider_languages (id, provider_id, language) VALUES (?, ?, ?)")
                .bind(Uuid::new_v4().to_string()).bind(provider_id).bind(language.trim())
                .execute(&mut **tx).await
        }
        ProfileChange::UpdateLanguage { language, new_language } => {
            sqlx::query("UPDATE provider_languages SET language = ? WHERE provider_id = ? AND language = ?")
                .bind(new_language.trim()).bind(provider_id).bind(language.trim())
                .execute(&mut **tx).await
        }
        ProfileChange::RemoveLanguage { language } => {
            sqlx::query("DELETE FROM provider_languages WHERE provider_id = ? AND language = ?")
                .bind(provider_id).bind(language.trim())
                .execute(&mut **tx).await
        }
        ProfileChange::UpdatePoliceCheck { has_police_check } => {
            sqlx::query("UPDATE service_providers SET has_police_check = ? WHERE id = ?")
                .bind(has_police_check).bind(provider_id)
                .execute(&mut **tx).await
        }
        ProfileChange::UpdateInsurance { has_insurance } => {
            sqlx::query("UPDATE service_providers SET has_insurance = ? WHERE id = ?")
                .bind(has_insurance).bind(provider_id)
                .execute(&mut **tx).await
        }
        ProfileChange::UpdateEducation { education } => {
            sqlx::query("UPDATE service_providers SET education = ? WHERE id = ?")
                .bind(education).bind(provider_id)
                .execute(&mut **tx).await
        }
        ProfileChange::UpdateBio { bio } => {
            sqlx::query("UPDATE service_providers SET bio = ? WHERE id = ?")
                .bind(bio).bind(provider_id)
                .execute(&mut **tx).await
        }
    }
    .map_err(|e| {
        if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
            return AppError::Conflict("Språket er allerede registrert".into());
        }
        AppError::Database(e)
    })?;

    if matches!(change, ProfileChange::UpdateLanguage { .. }) && result.rows_affected() == 0 {
        return Err(AppError::NotFound("Fant ikke språket".into()));
    }

    let targets_certificate = matches!(
        change,
        ProfileChange::UpdateCertificate { .. } | ProfileChange::RemoveCertificate { .. }
    );
    if targets_certificate && result.rows_affected() == 0 {
        return Err(AppError::NotFound("Fant ikke sertifikatet".into()));
    }
    Ok(())
}

#[async_trait]
impl ChangeRequestRepository for SqliteChangeRequestRepo {
    async fn create(&self, request: &ProviderChangeRequest) -> Result<ProviderChangeRequest, AppError> {
        sqlx::query_as::<_, ProviderChangeRequest>(
            "INSERT INTO provider_change_requests (id, provider_id, change_type, payload, status, reviewed_by, reviewed_at, admin_note, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&request.id).bind(&request.provider_id).bind(&request.change_type).bind(&request.payload)
            .bind(request.status).bind(&request.reviewed_by).bind(request.reviewed_at)
            .bind(&request.admin_note).bind(request.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ProviderChangeRequest>, AppError> {
        sqlx::query_as::<_, ProviderChangeRequest>("SELECT * FROM provider_change_requests WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_provider(&self, provider_id: &str) -> Result<Vec<ProviderChangeRequest>, AppError> {
        sqlx::query_as::<_, ProviderChangeRequest>("SELECT * FROM provider_change_requests WHERE provider_id = ? ORDER BY created_at DESC")
            .bind(provider_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_status(&self, status: Option<ChangeRequestStatus>) -> Result<Vec<ProviderChangeRequest>, AppError> {
        sqlx::query_as::<_, ProviderChangeRequest>(
            "SELECT * FROM provider_change_requests WHERE (? IS NULL OR status = ?) ORDER BY created_at ASC"
        )
            .bind(status).bind(status)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn approve(&self, request: &ProviderChangeRequest, reviewer_id: &str, note: Option<String>, at: DateTime<Utc>) -> Result<ProviderChangeRequest, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        apply_change(&mut tx, &request.provider_id, &request.payload.0).await?;

        let approved = sqlx::query_as::<_, ProviderChangeRequest>(
            "UPDATE provider_change_requests SET status = 'APPROVED', reviewed_by = ?, reviewed_at = ?, admin_note = ?
             WHERE id = ? AND status = 'PENDING'
             RETURNING *"
        )
            .bind(reviewer_id).bind(at).bind(note).bind(&request.id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::Conflict("Endringsforespørselen er allerede behandlet".into()))?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(approved)
    }

    async fn reject(&self, id: &str, reviewer_id: &str, note: Option<String>, at: DateTime<Utc>) -> Result<ProviderChangeRequest, AppError> {
        sqlx::query_as::<_, ProviderChangeRequest>(
            "UPDATE provider_change_requests SET status = 'REJECTED', reviewed_by = ?, reviewed_at = ?, admin_note = ?
             WHERE id = ? AND status = 'PENDING'
             RETURNING *"
        )
            .bind(reviewer_id).bind(at).bind(note).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::Conflict("Endringsforespørselen er allerede behandlet".into()))
    }

    async fn count_by_status(&self, status: ChangeRequestStatus) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM provider_change_requests WHERE status = ?")
            .bind(status).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }
}
