use crate::domain::{models::user::Address, ports::AddressRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::error;

pub struct SqliteAddressRepo {
    pool: SqlitePool,
}

impl SqliteAddressRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AddressRepository for SqliteAddressRepo {
    async fn create(&self, address: &Address) -> Result<Address, AppError> {
        sqlx::query_as::<_, Address>(
            "INSERT INTO addresses (id, user_id, label, street, postal_code, city, is_default, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
            .bind(&address.id)
            .bind(&address.user_id)
            .bind(&address.label)
            .bind(&address.street)
            .bind(&address.postal_code)
            .bind(&address.city)
            .bind(address.is_default)
            .bind(address.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Address>, AppError> {
        sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Address>, AppError> {
        sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE user_id = ? ORDER BY is_default DESC, created_at ASC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, user_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if e.as_database_error().is_some_and(|d| d.is_foreign_key_violation()) {
                    return AppError::Conflict("Adressen er i bruk og kan ikke slettes".into());
                }
                error!("SQLite Address Deletion Failed: {:?}", e);
                AppError::Database(e)
            })?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Fant ikke adressen".into()));
        }
        Ok(())
    }
}
