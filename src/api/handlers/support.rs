use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::{CreateTicketRequest, TicketMessageRequest};
use crate::api::extractors::auth::AuthUser;
use crate::state::AppState;
use crate::error::AppError;
use std::sync::Arc;

pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<CreateTicketRequest>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = state.support_service
        .create_ticket(&actor, payload.subject, payload.message, payload.category, payload.priority)
        .await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

pub async fn list_my_tickets(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.support_service.list_my_tickets(&actor).await?))
}

pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(ticket_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.support_service.get_thread(&actor, &ticket_id).await?))
}

pub async fn respond_to_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(ticket_id): Path<String>,
    Json(payload): Json<TicketMessageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.support_service.respond(&actor, &ticket_id, payload.message).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
