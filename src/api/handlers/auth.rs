use axum::{extract::State, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::{LoginRequest, RegisterRequest};
use crate::api::dtos::responses::RevokedSessionsResponse;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::auth::{AuthResponse, UserProfile};
use crate::domain::models::user::User;
use std::sync::Arc;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::SameSite;
use time::Duration;
use tracing::info;

fn profile(user: User) -> UserProfile {
    UserProfile {
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
    }
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth_service
        .register(&payload.email, &payload.name, &payload.password, &payload.confirm_password, payload.role)
        .await?;

    Ok((StatusCode::CREATED, Json(profile(user))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth_service.authenticate(&payload.email, &payload.password).await?;

    let (access_jwt, refresh_token, csrf_token) = state.auth_service.login(&user).await?;

    set_cookies(&cookies, &access_jwt, &refresh_token);

    info!("User logged in: {}", user.id);

    Ok(Json(AuthResponse {
        csrf_token,
        user: profile(user),
    }))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    let refresh_cookie = cookies.get("refresh_token").ok_or(AppError::Unauthenticated)?;

    let (user, (new_access, new_refresh, new_csrf)) = state.auth_service.refresh(refresh_cookie.value()).await?;

    set_cookies(&cookies, &new_access, &new_refresh);

    info!("Token refreshed for user: {}", user.id);

    Ok(Json(AuthResponse {
        csrf_token: new_csrf,
        user: profile(user),
    }))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    if let Some(cookie) = cookies.get("refresh_token") {
        state.auth_service.logout(cookie.value()).await?;
    }

    clear_cookies(&cookies);
    info!("User logged out");

    Ok(StatusCode::OK)
}

pub async fn logout_everywhere(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    let revoked = state.auth_service.logout_everywhere(&actor.user_id).await?;
    clear_cookies(&cookies);
    Ok(Json(RevokedSessionsResponse { revoked }))
}

fn clear_cookies(cookies: &Cookies) {
    cookies.remove(Cookie::build(("access_token", "")).path("/").into());
    cookies.remove(Cookie::build(("refresh_token", "")).path("/").into());
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_id(&actor.user_id).await?
        .ok_or(AppError::Unauthenticated)?;
    Ok(Json(profile(user)))
}

fn set_cookies(cookies: &Cookies, access: &str, refresh: &str) {
    let mut access_c = Cookie::new("access_token", access.to_string());
    access_c.set_http_only(true);
    access_c.set_secure(true);
    access_c.set_same_site(SameSite::Strict);
    access_c.set_path("/");
    access_c.set_max_age(Duration::minutes(15));
    cookies.add(access_c);

    let mut refresh_c = Cookie::new("refresh_token", refresh.to_string());
    refresh_c.set_http_only(true);
    refresh_c.set_secure(true);
    refresh_c.set_same_site(SameSite::Strict);
    refresh_c.set_path("/");
    refresh_c.set_max_age(Duration::days(7));
    cookies.add(refresh_c);
}
