use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
}

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketCategory {
    Booking,
    Payment,
    Account,
    Provider,
    Other,
}

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct SupportTicket {
    pub id: String,
    pub user_id: String,
    pub subject: String,
    pub message: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl SupportTicket {
    pub fn new(user_id: String, subject: String, message: String, category: TicketCategory, priority: TicketPriority) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            subject,
            message,
            category,
            priority,
            status: TicketStatus::Open,
            assigned_to: None,
            created_at: Utc::now(),
            resolved_at: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct SupportTicketResponse {
    pub id: String,
    pub ticket_id: String,
    pub user_id: String,
    pub message: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl SupportTicketResponse {
    pub fn new(ticket_id: String, user_id: String, message: String, is_admin: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ticket_id,
            user_id,
            message,
            is_admin,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SupportTicketThread {
    #[serde(flatten)]
    pub ticket: SupportTicket,
    pub responses: Vec<SupportTicketResponse>,
}
