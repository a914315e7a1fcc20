use axum::{
    extract::{FromRequestParts, FromRef},
    http::request::Parts,
};
use crate::api::extractors::auth::decode_claims;
use crate::state::AppState;
use crate::domain::models::user::Actor;
use std::convert::Infallible;
use std::sync::Arc;

/// Identity for read-only routes that also serve guests.
pub struct MaybeAuthUser(pub Option<Actor>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let actor = decode_claims(parts, &app_state)
            .map(|claims| Actor { user_id: claims.sub, role: claims.role });

        Ok(MaybeAuthUser(actor))
    }
}
