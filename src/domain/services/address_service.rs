use std::sync::Arc;
use tracing::info;
use crate::domain::models::user::{Actor, Address};
use crate::domain::ports::AddressRepository;
use crate::domain::services::guards::ensure_owner;
use crate::error::AppError;

pub struct AddressService {
    repo: Arc<dyn AddressRepository>,
}

impl AddressService {
    pub fn new(repo: Arc<dyn AddressRepository>) -> Self {
        Self { repo }
    }

    pub async fn add_address(
        &self,
        actor: &Actor,
        label: Option<String>,
        street: String,
        postal_code: String,
        city: String,
    ) -> Result<Address, AppError> {
        if street.trim().is_empty() || city.trim().is_empty() {
            return Err(AppError::Validation("Gate og sted må fylles ut".into()));
        }
        let postal_code = postal_code.trim().to_string();
        if postal_code.len() != 4 || !postal_code.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::Validation("Postnummer må være fire siffer".into()));
        }

        let mut address = Address::new(actor.user_id.clone(), label, street.trim().to_string(), postal_code, city.trim().to_string());
        address.is_default = self.repo.list_by_user(&actor.user_id).await?.is_empty();
        let created = self.repo.create(&address).await?;
        info!("Address {} added for user {}", created.id, actor.user_id);
        Ok(created)
    }

    pub async fn list_addresses(&self, actor: &Actor) -> Result<Vec<Address>, AppError> {
        self.repo.list_by_user(&actor.user_id).await
    }

    pub async fn delete_address(&self, actor: &Actor, id: &str) -> Result<(), AppError> {
        let address = self.repo.find_by_id(id).await?
            .ok_or(AppError::NotFound("Fant ikke adressen".into()))?;
        ensure_owner(&address.user_id, actor, "Adressen tilhører ikke deg")?;
        self.repo.delete(&actor.user_id, &address.id).await
    }
}
