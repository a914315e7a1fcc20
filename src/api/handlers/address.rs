use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::CreateAddressRequest;
use crate::api::extractors::auth::AuthUser;
use crate::state::AppState;
use crate::error::AppError;
use std::sync::Arc;

pub async fn create_address(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<CreateAddressRequest>,
) -> Result<impl IntoResponse, AppError> {
    let address = state.address_service
        .add_address(&actor, payload.label, payload.street, payload.postal_code, payload.city)
        .await?;
    Ok((StatusCode::CREATED, Json(address)))
}

pub async fn list_addresses(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.address_service.list_addresses(&actor).await?))
}

pub async fn delete_address(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(address_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.address_service.delete_address(&actor, &address_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
