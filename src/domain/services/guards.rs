//! Ownership and role checks shared by every mutating operation.
//!
//! Each guard returns before any write happens, so a failed check never
//! leaves partial state behind.

use crate::domain::models::provider::ServiceProvider;
use crate::domain::models::user::{Actor, Role};
use crate::domain::ports::ProviderRepository;
use crate::error::AppError;

pub fn require_actor(actor: Option<Actor>) -> Result<Actor, AppError> {
    actor.ok_or(AppError::Unauthenticated)
}

pub fn require_admin(actor: &Actor) -> Result<(), AppError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::Unauthorized("Kun administratorer har tilgang".into()))
    }
}

pub fn require_role(actor: &Actor, role: Role, message: &str) -> Result<(), AppError> {
    if actor.role == role {
        Ok(())
    } else {
        Err(AppError::Unauthorized(message.into()))
    }
}

/// Customer-owned entities: the acting user must be the recorded owner.
pub fn ensure_owner(owner_id: &str, actor: &Actor, message: &str) -> Result<(), AppError> {
    if owner_id == actor.user_id {
        Ok(())
    } else {
        Err(AppError::Unauthorized(message.into()))
    }
}

/// Resolves the provider profile behind the acting user.
pub async fn resolve_provider(repo: &dyn ProviderRepository, actor: &Actor) -> Result<ServiceProvider, AppError> {
    repo.find_by_user_id(&actor.user_id).await?
        .ok_or(AppError::Unauthorized("Du har ingen leverandørprofil".into()))
}

/// Provider-owned entities: the acting user's provider profile must match.
pub async fn ensure_provider_owner(repo: &dyn ProviderRepository, provider_id: &str, actor: &Actor) -> Result<ServiceProvider, AppError> {
    let provider = resolve_provider(repo, actor).await?;
    if provider.id != provider_id {
        return Err(AppError::Unauthorized("Du har ikke tilgang til denne ressursen".into()));
    }
    Ok(provider)
}
