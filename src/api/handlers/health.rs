use axum::{extract::State, response::IntoResponse, Json};
use crate::api::dtos::responses::StatusResponse;
use crate::state::AppState;
use crate::error::AppError;
use std::sync::Arc;

pub async fn health_check(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    state.user_repo.count().await?;
    Ok(Json(StatusResponse { status: "ok" }))
}
