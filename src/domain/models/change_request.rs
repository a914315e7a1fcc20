use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow};
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeRequestStatus {
    Pending,
    Approved,
    Rejected,
}

/// A proposed edit to the verified part of a provider profile.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "change_type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileChange {
    AddCertificate { name: String, issuer: Option<String>, year: Option<i32> },
    UpdateCertificate { certificate_id: String, name: String, issuer: Option<String>, year: Option<i32> },
    RemoveCertificate { certificate_id: String },
    AddLanguage { language: String },
    UpdateLanguage { language: String, new_language: String },
    RemoveLanguage { language: String },
    UpdatePoliceCheck { has_police_check: bool },
    UpdateInsurance { has_insurance: bool },
    UpdateEducation { education: String },
    UpdateBio { bio: String },
}

impl ProfileChange {
    pub fn parse(value: serde_json::Value) -> Result<Self, AppError> {
        let change: ProfileChange = serde_json::from_value(value)
            .map_err(|e| AppError::Validation(format!("Ugyldig endringsforespørsel: {}", e)))?;
        change.validate()?;
        Ok(change)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ProfileChange::AddCertificate { .. } => "ADD_CERTIFICATE",
            ProfileChange::UpdateCertificate { .. } => "UPDATE_CERTIFICATE",
            ProfileChange::RemoveCertificate { .. } => "REMOVE_CERTIFICATE",
            ProfileChange::AddLanguage { .. } => "ADD_LANGUAGE",
            ProfileChange::UpdateLanguage { .. } => "UPDATE_LANGUAGE",
            ProfileChange::RemoveLanguage { .. } => "REMOVE_LANGUAGE",
            ProfileChange::UpdatePoliceCheck { .. } => "UPDATE_POLICE_CHECK",
            ProfileChange::UpdateInsurance { .. } => "UPDATE_INSURANCE",
            ProfileChange::UpdateEducation { .. } => "UPDATE_EDUCATION",
            ProfileChange::UpdateBio { .. } => "UPDATE_BIO",
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        match self {
            ProfileChange::AddCertificate { name, year, .. }
            | ProfileChange::UpdateCertificate { name, year, .. } => {
                if name.trim().is_empty() {
                    return Err(AppError::Validation("Sertifikatet må ha et navn".into()));
                }
                if let Some(y) = year
                    && !(1900..=2100).contains(y) {
                    return Err(AppError::Validation("Ugyldig årstall".into()));
                }
            }
            ProfileChange::AddLanguage { language } | ProfileChange::RemoveLanguage { language } => {
                if language.trim().is_empty() {
                    return Err(AppError::Validation("Språk mangler".into()));
                }
            }
            ProfileChange::UpdateLanguage { language, new_language } => {
                if language.trim().is_empty() || new_language.trim().is_empty() {
                    return Err(AppError::Validation("Språk mangler".into()));
                }
                if language.trim() == new_language.trim() {
                    return Err(AppError::Validation("Nytt språk er likt det gamle".into()));
                }
            }
            ProfileChange::RemoveCertificate { certificate_id } => {
                if certificate_id.is_empty() {
                    return Err(AppError::Validation("Sertifikat-id mangler".into()));
                }
            }
            ProfileChange::UpdateEducation { education } => {
                if education.trim().is_empty() {
                    return Err(AppError::Validation("Utdanning mangler".into()));
                }
            }
            ProfileChange::UpdatePoliceCheck { .. }
            | ProfileChange::UpdateInsurance { .. }
            | ProfileChange::UpdateBio { .. } => {}
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ProviderChangeRequest {
    pub id: String,
    pub provider_id: String,
    pub change_type: String,
    pub payload: Json<ProfileChange>,
    pub status: ChangeRequestStatus,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub admin_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ProviderChangeRequest {
    pub fn new(provider_id: String, change: ProfileChange) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            provider_id,
            change_type: change.kind().to_string(),
            payload: Json(change),
            status: ChangeRequestStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            admin_note: None,
            created_at: Utc::now(),
        }
    }
}
