use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Customer,
    Provider,
    Admin,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, name: String, password_hash: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.trim().to_lowercase(),
            name,
            phone: None,
            password_hash,
            role,
            created_at: Utc::now(),
        }
    }
}

/// The identity a request acts as. Resolved once at the edge and handed to
/// every domain operation.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: String,
    pub role: Role,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Address {
    pub id: String,
    pub user_id: String,
    pub label: Option<String>,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl Address {
    pub fn new(user_id: String, label: Option<String>, street: String, postal_code: String, city: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            label,
            street,
            postal_code,
            city,
            is_default: false,
            created_at: Utc::now(),
        }
    }
}
