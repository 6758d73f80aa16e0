/// Authorization gate: session token to identity
///
/// Runs before every task operation. The resolved [`Identity`] is returned
/// to the caller, which passes it on explicitly; nothing is stashed in
/// ambient request state.
///
/// A session whose user record has vanished is treated as unauthenticated,
/// not as a server error. Store failures still surface as
/// `StoreUnavailable`.

use super::credentials::CredentialStore;
use super::session::SessionManager;
use crate::error::{CoreError, CoreResult};
use crate::models::user::{PublicUser, User};
use serde::Serialize;

/// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
    pub name: String,
}

impl Identity {
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.user_id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

/// Authorization gate
#[derive(Clone)]
pub struct AuthorizationGate {
    sessions: SessionManager,
    credentials: CredentialStore,
}

impl AuthorizationGate {
    pub fn new(sessions: SessionManager, credentials: CredentialStore) -> Self {
        Self {
            sessions,
            credentials,
        }
    }

    /// Resolves the session token carried by a request
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the token is absent, empty, unknown, expired, or
    ///   points at a user that no longer exists
    /// - `StoreUnavailable` on store failure
    pub async fn authenticate(&self, token: Option<&str>) -> CoreResult<Identity> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(CoreError::Unauthorized)?;

        let user_id = self.sessions.resolve_session(token).await?;

        let user = self.credentials.find_by_id(user_id).await?.ok_or_else(|| {
            tracing::warn!(user_id, "Session refers to a missing user");
            CoreError::Unauthorized
        })?;

        Ok(Identity::from(user))
    }
}
