use crate::domain::{
    models::schedule::{BlockedDate, WeeklyScheduleSlot},
    ports::ScheduleRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

pub struct SqliteScheduleRepo {
    pool: SqlitePool,
}

impl SqliteScheduleRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScheduleRepository for SqliteScheduleRepo {
    async fn replace_day(&self, provider_id: &str, day_of_week: i32, slots: &[WeeklyScheduleSlot]) -> Result<Vec<WeeklyScheduleSlot>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM weekly_schedule_slots WHERE provider_id = ? AND day_of_week = ?")
            .bind(provider_id).bind(day_of_week)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        let mut inserted = Vec::with_capacity(slots.len());
        for slot in slots {
            let row = sqlx::query_as::<_, WeeklyScheduleSlot>(
                "INSERT INTO weekly_schedule_slots (id, provider_id, day_of_week, start_time, end_time, is_active)
                 VALUES (?, ?, ?, ?, ?, ?)
                 RETURNING *"
            )
                .bind(&slot.id).bind(provider_id).bind(day_of_week)
                .bind(&slot.start_time).bind(&slot.end_time).bind(slot.is_active)
                .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
            inserted.push(row);
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(inserted)
    }

    async fn list_weekly(&self, provider_id: &str) -> Result<Vec<WeeklyScheduleSlot>, AppError> {
        sqlx::query_as::<_, WeeklyScheduleSlot>(
            "SELECT * FROM weekly_schedule_slots WHERE provider_id = ? ORDER BY day_of_week ASC, start_time ASC"
        )
            .bind(provider_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_active_for_day(&self, provider_id: &str, day_of_week: i32) -> Result<Vec<WeeklyScheduleSlot>, AppError> {
        sqlx::query_as::<_, WeeklyScheduleSlot>(
            "SELECT * FROM weekly_schedule_slots WHERE provider_id = ? AND day_of_week = ? AND is_active = 1 ORDER BY start_time ASC"
        )
            .bind(provider_id).bind(day_of_week).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn upsert_blocked_date(&self, blocked: &BlockedDate) -> Result<BlockedDate, AppError> {
        sqlx::query_as::<_, BlockedDate>(
            "INSERT INTO blocked_dates (id, provider_id, date, reason, created_at) VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(provider_id, date) DO UPDATE SET reason = excluded.reason
             RETURNING *"
        )
            .bind(&blocked.id).bind(&blocked.provider_id).bind(blocked.date)
            .bind(&blocked.reason).bind(blocked.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_blocked_date(&self, provider_id: &str, date: NaiveDate) -> Result<Option<BlockedDate>, AppError> {
        sqlx::query_as::<_, BlockedDate>("SELECT * FROM blocked_dates WHERE provider_id = ? AND date = ?")
            .bind(provider_id).bind(date).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_blocked_dates(&self, provider_id: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<BlockedDate>, AppError> {
        sqlx::query_as::<_, BlockedDate>(
            "SELECT * FROM blocked_dates WHERE provider_id = ? AND date >= ? AND date <= ? ORDER BY date ASC"
        )
            .bind(provider_id).bind(from).bind(to).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete_blocked_date(&self, provider_id: &str, date: NaiveDate) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM blocked_dates WHERE provider_id = ? AND date = ?")
            .bind(provider_id).bind(date)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Datoen er ikke blokkert".into()));
        }
        Ok(())
    }
}
