/// Authenticated-caller extractor
///
/// Wraps [`AuthorizationGate::authenticate`] for axum. Put it first in a
/// handler's argument list: request-parts extractors run in order and before
/// the body is read, so an unauthenticated request is rejected with 401
/// before the handler body or any task operation runs.
///
/// # Example
///
/// ```no_run
/// use axum::Json;
/// use kvtodo_api::extract::Authenticated;
/// use kvtodo_shared::models::user::PublicUser;
///
/// async fn whoami(Authenticated(identity): Authenticated) -> Json<PublicUser> {
///     Json(identity.to_public())
/// }
/// ```
///
/// [`AuthorizationGate::authenticate`]: kvtodo_shared::auth::AuthorizationGate::authenticate

use crate::{app::AppState, cookie, error::ApiError};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use kvtodo_shared::auth::Identity;

/// Identity of the caller, resolved from the session cookie
#[derive(Debug, Clone)]
pub struct Authenticated(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = cookie::read_cookie(&parts.headers, &state.config.session.cookie_name);
        let identity = state.gate.authenticate(token.as_deref()).await?;

        tracing::debug!(user_id = identity.user_id, "Request authenticated");
        Ok(Authenticated(identity))
    }
}
