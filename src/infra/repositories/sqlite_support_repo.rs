use crate::domain::{
    models::support::{SupportTicket, SupportTicketResponse, TicketStatus},
    ports::SupportRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

pub struct SqliteSupportRepo {
    pool: SqlitePool,
}

impl SqliteSupportRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SupportRepository for SqliteSupportRepo {
    async fn create_ticket(&self, ticket: &SupportTicket) -> Result<SupportTicket, AppError> {
        sqlx::query_as::<_, SupportTicket>(
            "INSERT INTO support_tickets (id, user_id, subject, message, category, priority, status, assigned_to, created_at, resolved_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&ticket.id).bind(&ticket.user_id).bind(&ticket.subject).bind(&ticket.message)
            .bind(ticket.category).bind(ticket.priority).bind(ticket.status)
            .bind(&ticket.assigned_to).bind(ticket.created_at).bind(ticket.resolved_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_ticket(&self, id: &str) -> Result<Option<SupportTicket>, AppError> {
        sqlx::query_as::<_, SupportTicket>("SELECT * FROM support_tickets WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<SupportTicket>, AppError> {
        sqlx::query_as::<_, SupportTicket>("SELECT * FROM support_tickets WHERE user_id = ? ORDER BY created_at DESC")
            .bind(user_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_all(&self, status: Option<TicketStatus>) -> Result<Vec<SupportTicket>, AppError> {
        sqlx::query_as::<_, SupportTicket>(
            "SELECT * FROM support_tickets WHERE (? IS NULL OR status = ?) ORDER BY created_at DESC"
        )
            .bind(status).bind(status)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn add_response(&self, response: &SupportTicketResponse, advance_to: Option<TicketStatus>) -> Result<SupportTicketResponse, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, SupportTicketResponse>(
            "INSERT INTO support_ticket_responses (id, ticket_id, user_id, message, is_admin, created_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&response.id).bind(&response.ticket_id).bind(&response.user_id)
            .bind(&response.message).bind(response.is_admin).bind(response.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        if let Some(status) = advance_to {
            sqlx::query("UPDATE support_tickets SET status = ? WHERE id = ?")
                .bind(status).bind(&response.ticket_id)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn list_responses(&self, ticket_id: &str) -> Result<Vec<SupportTicketResponse>, AppError> {
        sqlx::query_as::<_, SupportTicketResponse>("SELECT * FROM support_ticket_responses WHERE ticket_id = ? ORDER BY created_at ASC")
            .bind(ticket_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_status(&self, id: &str, status: TicketStatus, assigned_to: &str, resolved_at: Option<DateTime<Utc>>) -> Result<SupportTicket, AppError> {
        sqlx::query_as::<_, SupportTicket>(
            "UPDATE support_tickets SET status = ?, assigned_to = ?, resolved_at = ? WHERE id = ? RETURNING *"
        )
            .bind(status).bind(assigned_to).bind(resolved_at).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Fant ikke saken".into()))
    }

    async fn count_by_status(&self, status: TicketStatus) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM support_tickets WHERE status = ?")
            .bind(status).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }
}
