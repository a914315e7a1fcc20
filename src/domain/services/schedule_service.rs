use std::sync::Arc;
use chrono::NaiveDate;
use tracing::info;
use crate::domain::models::provider::ServiceProvider;
use crate::domain::models::schedule::{BlockedDate, ScheduleSlotInput, WeeklyScheduleSlot};
use crate::domain::models::user::Actor;
use crate::domain::ports::{ProviderRepository, ScheduleRepository};
use crate::domain::services::availability::parse_hhmm;
use crate::domain::services::guards::resolve_provider;
use crate::error::AppError;

pub struct ScheduleService {
    schedule_repo: Arc<dyn ScheduleRepository>,
    provider_repo: Arc<dyn ProviderRepository>,
}

impl ScheduleService {
    pub fn new(schedule_repo: Arc<dyn ScheduleRepository>, provider_repo: Arc<dyn ProviderRepository>) -> Self {
        Self { schedule_repo, provider_repo }
    }

    /// Providers edit their own calendar; admins may name the provider to act for.
    async fn target_provider(&self, actor: &Actor, provider_id: Option<&str>) -> Result<ServiceProvider, AppError> {
        match provider_id {
            Some(id) if actor.is_admin() => self.provider_repo.find_by_id(id).await?
                .ok_or(AppError::NotFound("Fant ikke leverandøren".into())),
            _ => resolve_provider(self.provider_repo.as_ref(), actor).await,
        }
    }

    pub async fn update_weekly_schedule(
        &self,
        actor: &Actor,
        provider_id: Option<&str>,
        day_of_week: i32,
        slots: Vec<ScheduleSlotInput>,
    ) -> Result<Vec<WeeklyScheduleSlot>, AppError> {
        let provider = self.target_provider(actor, provider_id).await?;

        if !(0..=6).contains(&day_of_week) {
            return Err(AppError::Validation("Ugyldig ukedag".into()));
        }

        let mut rows = Vec::with_capacity(slots.len());
        for input in slots {
            let (Some(start), Some(end)) = (parse_hhmm(&input.start_time), parse_hhmm(&input.end_time)) else {
                return Err(AppError::Validation("Tidspunkt må ha formatet TT:MM".into()));
            };
            if start >= end {
                return Err(AppError::Validation("Starttid må være før sluttid".into()));
            }
            rows.push(WeeklyScheduleSlot::new(
                provider.id.clone(),
                day_of_week,
                start.format("%H:%M").to_string(),
                end.format("%H:%M").to_string(),
                input.is_active,
            ));
        }

        let saved = self.schedule_repo.replace_day(&provider.id, day_of_week, &rows).await?;
        info!("Replaced schedule for provider {} on day {} ({} slots)", provider.id, day_of_week, saved.len());
        Ok(saved)
    }

    pub async fn get_weekly_schedule(&self, provider_id: &str) -> Result<Vec<WeeklyScheduleSlot>, AppError> {
        self.provider_repo.find_by_id(provider_id).await?
            .ok_or(AppError::NotFound("Fant ikke leverandøren".into()))?;
        self.schedule_repo.list_weekly(provider_id).await
    }

    pub async fn add_blocked_date(&self, actor: &Actor, provider_id: Option<&str>, date: NaiveDate, reason: Option<String>) -> Result<BlockedDate, AppError> {
        let provider = self.target_provider(actor, provider_id).await?;
        let blocked = BlockedDate::new(provider.id.clone(), date, reason);
        let saved = self.schedule_repo.upsert_blocked_date(&blocked).await?;
        info!("Blocked {} for provider {}", date, provider.id);
        Ok(saved)
    }

    pub async fn remove_blocked_date(&self, actor: &Actor, provider_id: Option<&str>, date: NaiveDate) -> Result<(), AppError> {
        let provider = self.target_provider(actor, provider_id).await?;
        self.schedule_repo.delete_blocked_date(&provider.id, date).await?;
        info!("Unblocked {} for provider {}", date, provider.id);
        Ok(())
    }

    pub async fn list_blocked_dates(&self, provider_id: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<BlockedDate>, AppError> {
        if to < from {
            return Err(AppError::Validation("Sluttdato må være etter startdato".into()));
        }
        self.schedule_repo.list_blocked_dates(provider_id, from, to).await
    }
}
