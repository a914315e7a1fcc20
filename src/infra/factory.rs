use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions};
use sqlx::{SqlitePool, ConnectOptions};
use tracing::{info, warn};
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::{AppState, Repositories};
use crate::error::AppError;
use crate::domain::models::user::{Role, User};
use crate::domain::services::auth_service::AuthService;
use crate::infra::repositories::{
    sqlite_address_repo::SqliteAddressRepo, sqlite_auth_repo::SqliteAuthRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_change_request_repo::SqliteChangeRequestRepo,
    sqlite_provider_repo::SqliteProviderRepo, sqlite_quote_repo::SqliteQuoteRepo,
    sqlite_review_repo::SqliteReviewRepo, sqlite_schedule_repo::SqliteScheduleRepo,
    sqlite_support_repo::SqliteSupportRepo, sqlite_user_repo::SqliteUserRepo,
};

pub fn sqlite_repositories(pool: &SqlitePool) -> Repositories {
    Repositories {
        user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
        auth_repo: Arc::new(SqliteAuthRepo::new(pool.clone())),
        address_repo: Arc::new(SqliteAddressRepo::new(pool.clone())),
        provider_repo: Arc::new(SqliteProviderRepo::new(pool.clone())),
        schedule_repo: Arc::new(SqliteScheduleRepo::new(pool.clone())),
        booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
        quote_repo: Arc::new(SqliteQuoteRepo::new(pool.clone())),
        review_repo: Arc::new(SqliteReviewRepo::new(pool.clone())),
        support_repo: Arc::new(SqliteSupportRepo::new(pool.clone())),
        change_repo: Arc::new(SqliteChangeRequestRepo::new(pool.clone())),
    }
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    info!("Initializing SQLite connection with WAL Mode...");

    let opts = SqliteConnectOptions::from_str(&config.database_url)
        .expect("Invalid SQLite connection string")
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .expect("Failed to connect to SQLite");

    run_migrations(&pool).await;

    let repos = sqlite_repositories(&pool);
    if let Err(e) = seed_admin(config, &repos).await {
        warn!("Admin seed skipped: {}", e);
    }

    AppState::new(config.clone(), repos).expect("Invalid auth configuration")
}

/// Creates the configured admin account once. Existing accounts are left alone.
pub async fn seed_admin(config: &Config, repos: &Repositories) -> Result<(), AppError> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(());
    };

    if repos.user_repo.find_by_email(&email.trim().to_lowercase()).await?.is_some() {
        return Ok(());
    }

    let admin = User::new(email.clone(), "Administrator".to_string(), AuthService::hash_password(password)?, Role::Admin);
    repos.user_repo.create(&admin).await?;
    info!("Seeded admin account {}", admin.email);
    Ok(())
}

async fn run_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
