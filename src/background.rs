use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};
use crate::domain::ports::QuoteRepository;
use crate::error::AppError;
use crate::state::AppState;

/// Marks overdue quote requests and responses expired, then sleeps.
pub async fn start_expiry_sweeper(state: Arc<AppState>) {
    let interval = Duration::from_secs(state.config.expiry_sweep_secs.max(1));
    info!("Starting quote expiry sweeper (every {:?})...", interval);

    loop {
        let span = info_span!("expiry_sweep");
        async {
            if let Err(e) = sweep_expired(state.quote_repo.as_ref()).await {
                error!("Expiry sweep failed: {:?}", e);
            }
        }
        .instrument(span)
        .await;

        sleep(interval).await;
    }
}

pub async fn sweep_expired(repo: &dyn QuoteRepository) -> Result<(u64, u64), AppError> {
    let (requests, responses) = repo.expire_overdue(Utc::now()).await?;
    if requests > 0 || responses > 0 {
        info!("Expired {} quote requests and {} quote responses", requests, responses);
    }
    Ok((requests, responses))
}
