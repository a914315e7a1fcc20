use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::{CancelBookingRequest, CreateBookingRequest};
use crate::api::extractors::auth::AuthUser;
use crate::domain::services::booking_service::CreateBookingInput;
use crate::state::AppState;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("create_booking: provider {} at {}", payload.provider_id, payload.scheduled_at);

    let booking = state.booking_service.create_booking(&actor, CreateBookingInput {
        provider_id: payload.provider_id,
        address_id: payload.address_id,
        service_ids: payload.service_ids,
        scheduled_at: payload.scheduled_at,
        payment_method: payload.payment_method,
        recipient_name: payload.recipient_name,
        recipient_phone: payload.recipient_phone,
        notes: payload.notes,
    }).await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn list_my_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.booking_service.list_customer_bookings(&actor).await?))
}

pub async fn list_provider_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.booking_service.list_provider_bookings(&actor).await?))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.booking_service.get_booking(&actor, &booking_id).await?))
}

pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.booking_service.confirm_booking(&actor, &booking_id).await?))
}

pub async fn complete_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.booking_service.complete_booking(&actor, &booking_id).await?))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<CancelBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.booking_service.cancel_booking(&actor, &booking_id, payload.reason).await?))
}
