use axum::{
    extract::{FromRequestParts, FromRef},
    http::{request::Parts, Method},
};
use crate::state::AppState;
use crate::domain::models::auth::Claims;
use crate::domain::models::user::Actor;
use crate::domain::services::auth_service::TOKEN_AUDIENCE;
use crate::domain::services::guards::require_actor;
use crate::error::AppError;
use std::sync::Arc;
use tower_cookies::Cookies;
use jsonwebtoken::{decode, DecodingKey, Validation, Algorithm};
use tracing::{debug, Span};

pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Verifies the access-token cookie. `None` when absent or invalid.
pub(crate) fn decode_claims(parts: &Parts, state: &AppState) -> Option<Claims> {
    let cookies = parts.extensions.get::<Cookies>()?;
    let access_token = cookies.get("access_token")?.value().to_string();

    let decoding_key = match DecodingKey::from_ed_pem(state.config.jwt_public_key.as_bytes()) {
        Ok(key) => key,
        Err(e) => {
            debug!("Invalid JWT public key config: {}", e);
            return None;
        }
    };

    let mut validation = Validation::new(Algorithm::EdDSA);
    validation.set_audience(&[TOKEN_AUDIENCE]);
    validation.set_issuer(&[state.config.auth_issuer.as_str()]);

    decode::<Claims>(&access_token, &decoding_key, &validation)
        .map(|data| data.claims)
        .ok()
}

pub struct AuthUser(pub Actor);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let claims = decode_claims(parts, &app_state);

        if let Some(claims) = &claims {
            let method = &parts.method;
            if method != Method::GET && method != Method::HEAD && method != Method::OPTIONS {
                let csrf_header_val = parts.headers.get(CSRF_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .ok_or(AppError::Unauthorized("Mangler CSRF-token".into()))?;

                if csrf_header_val != claims.csrf_token {
                    return Err(AppError::Unauthorized("Ugyldig CSRF-token".into()));
                }
            }
        }

        let actor = require_actor(claims.map(|c| Actor { user_id: c.sub, role: c.role }))?;

        Span::current().record("user_id", actor.user_id.as_str());

        Ok(AuthUser(actor))
    }
}
