use axum::{
    extract::{FromRequestParts, FromRef},
    http::request::Parts,
};
use crate::api::extractors::auth::session_token;
use crate::state::AppState;
use crate::domain::models::user::User;
use crate::error::AppError;
use std::sync::Arc;
use tracing::{debug, Span};

/// The signed-in user when a valid token is present; guests get `None`.
pub struct MaybeAuthUser(pub Option<User>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(parts) else {
            return Ok(MaybeAuthUser(None));
        };

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        match app_state.auth_service.authenticate(&token).await {
            Ok(user) => {
                Span::current().record("user_id", &user.id);
                Ok(MaybeAuthUser(Some(user)))
            }
            Err(AppError::Unauthorized) => {
                debug!("MaybeAuth: token rejected, continuing as guest");
                Ok(MaybeAuthUser(None))
            }
            Err(e) => Err(e),
        }
    }
}
