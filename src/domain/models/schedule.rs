use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, Eq)]
pub struct WeeklyScheduleSlot {
    pub id: String,
    pub provider_id: String,
    /// 0 = Sunday ... 6 = Saturday
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub is_active: bool,
}

impl WeeklyScheduleSlot {
    pub fn new(provider_id: String, day_of_week: i32, start_time: String, end_time: String, is_active: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            provider_id,
            day_of_week,
            start_time,
            end_time,
            is_active,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BlockedDate {
    pub id: String,
    pub provider_id: String,
    pub date: NaiveDate,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BlockedDate {
    pub fn new(provider_id: String, date: NaiveDate, reason: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            provider_id,
            date,
            reason,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct AvailabilityCheck {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AvailabilityCheck {
    pub fn available() -> Self {
        Self { available: true, reason: None }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self { available: false, reason: Some(reason.to_string()) }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScheduleSlotInput {
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
