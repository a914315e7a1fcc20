use std::sync::Arc;
use chrono::Utc;
use tracing::info;
use crate::domain::models::change_request::{ChangeRequestStatus, ProfileChange, ProviderChangeRequest};
use crate::domain::models::provider::{ProviderProfile, ProviderService, ProviderStatus, ServiceProvider};
use crate::domain::models::user::{Actor, Role};
use crate::domain::ports::{ChangeRequestRepository, ProviderRepository};
use crate::domain::services::guards::{ensure_provider_owner, require_admin, require_role, resolve_provider};
use crate::error::AppError;

pub struct NewServiceInput {
    pub category_id: String,
    pub name: String,
    pub price: i64,
    pub duration_min: i32,
}

/// Provider onboarding, catalog and the admin review of profile changes.
pub struct ProviderDirectory {
    provider_repo: Arc<dyn ProviderRepository>,
    change_repo: Arc<dyn ChangeRequestRepository>,
}

impl ProviderDirectory {
    pub fn new(provider_repo: Arc<dyn ProviderRepository>, change_repo: Arc<dyn ChangeRequestRepository>) -> Self {
        Self { provider_repo, change_repo }
    }

    async fn load(&self, provider_id: &str) -> Result<ServiceProvider, AppError> {
        self.provider_repo.find_by_id(provider_id).await?
            .ok_or(AppError::NotFound("Fant ikke leverandøren".into()))
    }

    pub async fn create_profile(&self, actor: &Actor, business_name: String, bio: Option<String>) -> Result<ServiceProvider, AppError> {
        require_role(actor, Role::Provider, "Kun leverandørkontoer kan opprette en profil")?;
        if business_name.trim().is_empty() {
            return Err(AppError::Validation("Firmanavn må fylles ut".into()));
        }
        if self.provider_repo.find_by_user_id(&actor.user_id).await?.is_some() {
            return Err(AppError::Conflict("Du har allerede en leverandørprofil".into()));
        }

        let provider = ServiceProvider::new(actor.user_id.clone(), business_name.trim().to_string(), bio);
        let created = self.provider_repo.create(&provider).await?;
        info!("Provider profile created: {} for user {}", created.id, created.user_id);
        Ok(created)
    }

    /// Unapproved profiles are only visible to their owner and to admins.
    async fn load_visible(&self, viewer: Option<&Actor>, provider_id: &str) -> Result<ServiceProvider, AppError> {
        let provider = self.load(provider_id).await?;
        let privileged = viewer.is_some_and(|a| a.is_admin() || a.user_id == provider.user_id);
        if !provider.is_approved() && !privileged {
            return Err(AppError::NotFound("Fant ikke leverandøren".into()));
        }
        Ok(provider)
    }

    pub async fn get_profile(&self, viewer: Option<&Actor>, provider_id: &str) -> Result<ProviderProfile, AppError> {
        let provider = self.load_visible(viewer, provider_id).await?;
        let certificates = self.provider_repo.list_certificates(&provider.id).await?;
        let languages = self.provider_repo.list_languages(&provider.id).await?;
        Ok(ProviderProfile { provider, certificates, languages })
    }

    pub async fn add_service(&self, actor: &Actor, provider_id: &str, input: NewServiceInput) -> Result<ProviderService, AppError> {
        let provider = ensure_provider_owner(self.provider_repo.as_ref(), provider_id, actor).await?;
        if input.name.trim().is_empty() || input.category_id.trim().is_empty() {
            return Err(AppError::Validation("Navn og kategori må fylles ut".into()));
        }
        if input.price <= 0 {
            return Err(AppError::Validation("Prisen må være større enn 0".into()));
        }
        if input.duration_min <= 0 {
            return Err(AppError::Validation("Varigheten må være større enn 0".into()));
        }

        let service = ProviderService::new(provider.id, input.category_id, input.name.trim().to_string(), input.price, input.duration_min);
        let created = self.provider_repo.create_service(&service).await?;
        info!("Service {} added for provider {}", created.id, created.provider_id);
        Ok(created)
    }

    pub async fn list_services(&self, viewer: Option<&Actor>, provider_id: &str) -> Result<Vec<ProviderService>, AppError> {
        self.load_visible(viewer, provider_id).await?;
        let services = self.provider_repo.list_services(provider_id).await?;
        Ok(services.into_iter().filter(|s| s.is_active).collect())
    }

    pub async fn deactivate_service(&self, actor: &Actor, service_id: &str) -> Result<ProviderService, AppError> {
        let service = self.provider_repo.find_service(service_id).await?
            .ok_or(AppError::NotFound("Fant ikke tjenesten".into()))?;
        ensure_provider_owner(self.provider_repo.as_ref(), &service.provider_id, actor).await?;
        self.provider_repo.deactivate_service(&service.id).await
    }

    pub async fn set_provider_status(&self, actor: &Actor, provider_id: &str, status: ProviderStatus) -> Result<ServiceProvider, AppError> {
        require_admin(actor)?;
        let provider = self.load(provider_id).await?;
        let approved_at = (status == ProviderStatus::Approved).then(Utc::now);
        let updated = self.provider_repo.set_status(&provider.id, status, approved_at).await?;
        info!("Provider {} set to {:?} by {}", updated.id, updated.status, actor.user_id);
        Ok(updated)
    }

    pub async fn submit_change_request(&self, actor: &Actor, payload: serde_json::Value) -> Result<ProviderChangeRequest, AppError> {
        let provider = resolve_provider(self.provider_repo.as_ref(), actor).await?;
        let change = ProfileChange::parse(payload)?;

        let request = ProviderChangeRequest::new(provider.id, change);
        let created = self.change_repo.create(&request).await?;
        info!("Change request {} ({}) submitted", created.id, created.change_type);
        Ok(created)
    }

    pub async fn list_my_change_requests(&self, actor: &Actor) -> Result<Vec<ProviderChangeRequest>, AppError> {
        let provider = resolve_provider(self.provider_repo.as_ref(), actor).await?;
        self.change_repo.list_by_provider(&provider.id).await
    }

    pub async fn list_change_requests(&self, actor: &Actor, status: Option<ChangeRequestStatus>) -> Result<Vec<ProviderChangeRequest>, AppError> {
        require_admin(actor)?;
        self.change_repo.list_by_status(status).await
    }

    async fn load_pending_change(&self, id: &str) -> Result<ProviderChangeRequest, AppError> {
        let request = self.change_repo.find_by_id(id).await?
            .ok_or(AppError::NotFound("Fant ikke endringsforespørselen".into()))?;
        if request.status != ChangeRequestStatus::Pending {
            return Err(AppError::Conflict("Endringsforespørselen er allerede behandlet".into()));
        }
        Ok(request)
    }

    pub async fn approve_change_request(&self, actor: &Actor, id: &str, note: Option<String>) -> Result<ProviderChangeRequest, AppError> {
        require_admin(actor)?;
        let request = self.load_pending_change(id).await?;
        let approved = self.change_repo.approve(&request, &actor.user_id, note, Utc::now()).await?;
        info!("Change request {} ({}) approved for provider {}", approved.id, approved.change_type, approved.provider_id);
        Ok(approved)
    }

    pub async fn reject_change_request(&self, actor: &Actor, id: &str, note: Option<String>) -> Result<ProviderChangeRequest, AppError> {
        require_admin(actor)?;
        let request = self.load_pending_change(id).await?;
        let rejected = self.change_repo.reject(&request.id, &actor.user_id, note, Utc::now()).await?;
        info!("Change request {} rejected", rejected.id);
        Ok(rejected)
    }
}
