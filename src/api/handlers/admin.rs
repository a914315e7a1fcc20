use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::{ChangeRequestListQuery, ReviewDecisionRequest, TicketListQuery, TicketStatusRequest};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::provider::ProviderStatus;
use crate::state::AppState;
use crate::error::AppError;
use std::sync::Arc;

pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.admin_service.dashboard_stats(&actor).await?))
}

pub async fn approve_provider(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(provider_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.provider_service.set_provider_status(&actor, &provider_id, ProviderStatus::Approved).await?))
}

pub async fn reject_provider(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(provider_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.provider_service.set_provider_status(&actor, &provider_id, ProviderStatus::Rejected).await?))
}

pub async fn list_change_requests(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Query(query): Query<ChangeRequestListQuery>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.provider_service.list_change_requests(&actor, query.status).await?))
}

pub async fn approve_change_request(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<ReviewDecisionRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.provider_service.approve_change_request(&actor, &id, payload.note).await?))
}

pub async fn reject_change_request(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<ReviewDecisionRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.provider_service.reject_change_request(&actor, &id, payload.note).await?))
}

pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Query(query): Query<TicketListQuery>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.support_service.list_all(&actor, query.status).await?))
}

pub async fn set_ticket_status(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(ticket_id): Path<String>,
    Json(payload): Json<TicketStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.support_service.set_status(&actor, &ticket_id, payload.status).await?))
}

pub async fn refund_cancellation_fee(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.booking_service.refund_cancellation_fee(&actor, &booking_id).await?))
}
