use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::api::extractors::auth::AuthUser;
use crate::state::AppState;
use crate::error::AppError;
use std::sync::Arc;

/// Takes the raw body so an unknown change type surfaces as a validation error.
pub async fn submit_change_request(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<serde_json::Value>,
) -> Result<impl IntoResponse, AppError> {
    let request = state.provider_service.submit_change_request(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn list_my_change_requests(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.provider_service.list_my_change_requests(&actor).await?))
}
