use std::sync::Arc;
use chrono::Utc;
use tracing::info;
use crate::domain::models::support::{
    SupportTicket, SupportTicketResponse, SupportTicketThread, TicketCategory, TicketPriority, TicketStatus,
};
use crate::domain::models::user::Actor;
use crate::domain::ports::SupportRepository;
use crate::domain::services::guards::require_admin;
use crate::error::AppError;

pub struct SupportService {
    support_repo: Arc<dyn SupportRepository>,
}

impl SupportService {
    pub fn new(support_repo: Arc<dyn SupportRepository>) -> Self {
        Self { support_repo }
    }

    async fn load_visible(&self, actor: &Actor, ticket_id: &str) -> Result<SupportTicket, AppError> {
        let ticket = self.support_repo.find_ticket(ticket_id).await?
            .ok_or(AppError::NotFound("Fant ikke saken".into()))?;
        if !actor.is_admin() && ticket.user_id != actor.user_id {
            return Err(AppError::Unauthorized("Du har ikke tilgang til denne saken".into()));
        }
        Ok(ticket)
    }

    pub async fn create_ticket(
        &self,
        actor: &Actor,
        subject: String,
        message: String,
        category: TicketCategory,
        priority: Option<TicketPriority>,
    ) -> Result<SupportTicket, AppError> {
        if subject.trim().is_empty() || message.trim().is_empty() {
            return Err(AppError::Validation("Emne og melding må fylles ut".into()));
        }

        let ticket = SupportTicket::new(
            actor.user_id.clone(),
            subject.trim().to_string(),
            message,
            category,
            priority.unwrap_or(TicketPriority::Medium),
        );
        let created = self.support_repo.create_ticket(&ticket).await?;
        info!("Support ticket opened: {} ({:?})", created.id, created.category);
        Ok(created)
    }

    pub async fn list_my_tickets(&self, actor: &Actor) -> Result<Vec<SupportTicket>, AppError> {
        self.support_repo.list_by_user(&actor.user_id).await
    }

    pub async fn get_thread(&self, actor: &Actor, ticket_id: &str) -> Result<SupportTicketThread, AppError> {
        let ticket = self.load_visible(actor, ticket_id).await?;
        let responses = self.support_repo.list_responses(&ticket.id).await?;
        Ok(SupportTicketThread { ticket, responses })
    }

    /// An admin reply to an untouched ticket moves it to in-progress.
    pub async fn respond(&self, actor: &Actor, ticket_id: &str, message: String) -> Result<SupportTicketResponse, AppError> {
        if message.trim().is_empty() {
            return Err(AppError::Validation("Meldingen kan ikke være tom".into()));
        }

        let ticket = self.load_visible(actor, ticket_id).await?;
        if ticket.status == TicketStatus::Resolved && !actor.is_admin() {
            return Err(AppError::Conflict("Saken er lukket".into()));
        }

        let is_admin = actor.is_admin();
        let advance_to = (is_admin && ticket.status == TicketStatus::Open).then_some(TicketStatus::InProgress);
        let response = SupportTicketResponse::new(ticket.id.clone(), actor.user_id.clone(), message, is_admin);
        let created = self.support_repo.add_response(&response, advance_to).await?;
        info!("Response added to ticket {} (admin: {})", ticket.id, is_admin);
        Ok(created)
    }

    pub async fn list_all(&self, actor: &Actor, status: Option<TicketStatus>) -> Result<Vec<SupportTicket>, AppError> {
        require_admin(actor)?;
        self.support_repo.list_all(status).await
    }

    pub async fn set_status(&self, actor: &Actor, ticket_id: &str, status: TicketStatus) -> Result<SupportTicket, AppError> {
        require_admin(actor)?;
        let ticket = self.support_repo.find_ticket(ticket_id).await?
            .ok_or(AppError::NotFound("Fant ikke saken".into()))?;

        let resolved_at = match status {
            TicketStatus::Resolved => Some(ticket.resolved_at.unwrap_or_else(Utc::now)),
            _ => None,
        };
        let updated = self.support_repo.update_status(&ticket.id, status, &actor.user_id, resolved_at).await?;
        info!("Ticket {} moved to {:?} by {}", updated.id, updated.status, actor.user_id);
        Ok(updated)
    }
}
