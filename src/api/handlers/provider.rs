use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::{CreateProviderRequest, CreateServiceRequest};
use crate::api::extractors::{auth::AuthUser, maybe_auth::MaybeAuthUser};
use crate::domain::services::provider_service::NewServiceInput;
use crate::state::AppState;
use crate::error::AppError;
use std::sync::Arc;

pub async fn create_provider(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<CreateProviderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let provider = state.provider_service.create_profile(&actor, payload.business_name, payload.bio).await?;
    Ok((StatusCode::CREATED, Json(provider)))
}

pub async fn get_provider(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(provider_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.provider_service.get_profile(viewer.as_ref(), &provider_id).await?))
}

pub async fn list_services(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(provider_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.provider_service.list_services(viewer.as_ref(), &provider_id).await?))
}

pub async fn create_service(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(provider_id): Path<String>,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = state.provider_service.add_service(&actor, &provider_id, NewServiceInput {
        category_id: payload.category_id,
        name: payload.name,
        price: payload.price,
        duration_min: payload.duration_min,
    }).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

pub async fn deactivate_service(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(service_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.provider_service.deactivate_service(&actor, &service_id).await?))
}
