/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`credentials`]: registration and credential verification
/// - [`session`]: session token issue, lookup and invalidation
/// - [`gate`]: request-time resolution of a session token to an identity
///
/// # Flow
///
/// ```text
/// register ──> CredentialStore::register
/// login    ──> CredentialStore::verify ──> SessionManager::create_session
/// logout   ──> SessionManager::invalidate_session
/// tasks    ──> AuthorizationGate::authenticate ──> TaskStore::*
/// ```
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use kvtodo_shared::auth::{AuthorizationGate, CredentialStore, SessionManager};
/// use kvtodo_shared::store::{MemoryStore, StoreHandle};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store: StoreHandle = Arc::new(MemoryStore::new());
/// let credentials = CredentialStore::new(store.clone());
/// let sessions = SessionManager::new(store.clone());
/// let gate = AuthorizationGate::new(sessions.clone(), credentials.clone());
///
/// credentials.register("a@b.com", "Alice", "pw123").await?;
/// let user = credentials.verify("a@b.com", "pw123").await?;
/// let session = sessions.create_session(user.id).await?;
///
/// let identity = gate.authenticate(Some(&session.token)).await?;
/// assert_eq!(identity.user_id, user.id);
/// # Ok(())
/// # }
/// ```

pub mod credentials;
pub mod gate;
pub mod password;
pub mod session;

pub use credentials::CredentialStore;
pub use gate::{AuthorizationGate, Identity};
pub use session::{Session, SessionConfig, SessionManager};
