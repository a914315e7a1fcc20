use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::{BookQuoteRequest, CreateQuoteRequestRequest, OpenQuotesQuery, RespondToQuoteRequest};
use crate::api::extractors::auth::AuthUser;
use crate::domain::services::quote_service::{BookQuoteInput, CreateQuoteRequestInput, RespondToQuoteInput};
use crate::state::AppState;
use crate::error::AppError;
use std::sync::Arc;

pub async fn create_quote_request(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<CreateQuoteRequestRequest>,
) -> Result<impl IntoResponse, AppError> {
    let request = state.quote_service.create_quote_request(&actor, CreateQuoteRequestInput {
        category_id: payload.category_id,
        address_id: payload.address_id,
        title: payload.title,
        description: payload.description,
        answers: payload.answers,
        photos: payload.photos,
        preferred_dates: payload.preferred_dates,
    }).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn list_my_quote_requests(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.quote_service.list_my_quote_requests(&actor).await?))
}

pub async fn list_open_quote_requests(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Query(query): Query<OpenQuotesQuery>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.quote_service.list_open_quote_requests(&actor, query.category_id.as_deref()).await?))
}

pub async fn get_quote_request(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(quote_request_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.quote_service.get_quote_request(&actor, &quote_request_id).await?))
}

pub async fn cancel_quote_request(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(quote_request_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.quote_service.cancel_quote_request(&actor, &quote_request_id).await?))
}

pub async fn respond_to_quote(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(quote_request_id): Path<String>,
    Json(payload): Json<RespondToQuoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.quote_service.respond_to_quote(&actor, &quote_request_id, RespondToQuoteInput {
        price: payload.price,
        estimated_duration: payload.estimated_duration,
        materials_included: payload.materials_included,
        materials_estimate: payload.materials_estimate,
        message: payload.message,
    }).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn list_my_responses(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.quote_service.list_my_responses(&actor).await?))
}

pub async fn accept_quote_response(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(response_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.quote_service.accept_quote_response(&actor, &response_id).await?))
}

pub async fn book_accepted_quote(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(response_id): Path<String>,
    Json(payload): Json<BookQuoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.quote_service.book_accepted_quote(&actor, &response_id, BookQuoteInput {
        scheduled_at: payload.scheduled_at,
        address_id: payload.address_id,
        payment_method: payload.payment_method,
    }).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}
