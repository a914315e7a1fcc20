use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::CreateReviewRequest;
use crate::api::extractors::auth::AuthUser;
use crate::state::AppState;
use crate::error::AppError;
use std::sync::Arc;

pub async fn create_review(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    let review = state.review_service
        .create_review(&actor, &payload.booking_id, payload.rating, payload.comment)
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn list_provider_reviews(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.review_service.list_provider_reviews(&provider_id).await?))
}
