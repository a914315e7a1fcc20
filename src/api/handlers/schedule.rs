use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::{AvailabilityQuery, BlockDateRequest, DateRangeQuery, ProviderScopeQuery, SlotsQuery, UpdateScheduleRequest};
use crate::api::dtos::responses::SlotsResponse;
use crate::api::extractors::auth::AuthUser;
use crate::state::AppState;
use crate::error::AppError;
use chrono::NaiveDate;
use std::sync::Arc;

pub async fn get_weekly_schedule(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.schedule_service.get_weekly_schedule(&provider_id).await?))
}

pub async fn update_weekly_schedule(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(day_of_week): Path<i32>,
    Json(payload): Json<UpdateScheduleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let slots = state.schedule_service
        .update_weekly_schedule(&actor, payload.provider_id.as_deref(), day_of_week, payload.slots)
        .await?;
    Ok(Json(slots))
}

pub async fn list_blocked_dates(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
    Query(range): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.schedule_service.list_blocked_dates(&provider_id, range.from, range.to).await?))
}

pub async fn add_blocked_date(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<BlockDateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let blocked = state.schedule_service
        .add_blocked_date(&actor, payload.provider_id.as_deref(), payload.date, payload.reason)
        .await?;
    Ok((StatusCode::CREATED, Json(blocked)))
}

pub async fn remove_blocked_date(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(date): Path<String>,
    Query(scope): Query<ProviderScopeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Ugyldig datoformat".into()))?;
    state.schedule_service.remove_blocked_date(&actor, scope.provider_id.as_deref(), date).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let slots = state.availability_service.available_slots(&provider_id, query.date).await?;
    Ok(Json(SlotsResponse {
        provider_id,
        date: query.date.format("%Y-%m-%d").to_string(),
        slots,
    }))
}

pub async fn check_availability(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.availability_service.check_availability(&provider_id, query.at).await?))
}
