/// Session manager: opaque session tokens stored with a TTL
///
/// # Session Protocol
///
/// - **Key**: `session:{token}`
/// - **Value**: user id (decimal string)
/// - **TTL**: 24 hours by default, enforced by the store
/// - **Token**: 32 random bytes, hex-encoded (64 chars)
///
/// Expiry is never re-checked in application code: once the store drops the
/// key, the token stops resolving.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use kvtodo_shared::auth::session::SessionManager;
/// use kvtodo_shared::store::MemoryStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let sessions = SessionManager::new(Arc::new(MemoryStore::new()));
///
/// let session = sessions.create_session(7).await?;
/// assert_eq!(sessions.resolve_session(&session.token).await?, 7);
///
/// sessions.invalidate_session(&session.token).await?;
/// assert!(sessions.resolve_session(&session.token).await.is_err());
/// # Ok(())
/// # }
/// ```

use super::credentials::parse_id;
use crate::error::{CoreError, CoreResult};
use crate::store::{keys, StoreHandle};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::time::Duration;

/// Number of random bytes in a session token
const TOKEN_BYTES: usize = 32;

/// Configuration for session behavior
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Session lifetime (store TTL)
    ///
    /// Default: 24 hours
    pub ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// A freshly issued session
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Opaque token, the only handle to the session
    pub token: String,

    /// User the token identifies for its whole lifetime
    pub user_id: i64,

    /// When the store will drop the session
    pub expires_at: DateTime<Utc>,
}

/// Session manager
#[derive(Clone)]
pub struct SessionManager {
    store: StoreHandle,
    config: SessionConfig,
}

impl SessionManager {
    /// Creates a session manager with the default 24h TTL
    pub fn new(store: StoreHandle) -> Self {
        Self::with_config(store, SessionConfig::default())
    }

    pub fn with_config(store: StoreHandle, config: SessionConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Issues a new session token for `user_id`
    ///
    /// Token collisions are not checked; at 256 bits they are negligible.
    pub async fn create_session(&self, user_id: i64) -> CoreResult<Session> {
        let token = generate_token();

        self.store
            .set(
                &keys::session_key(&token),
                user_id.to_string().as_bytes(),
                Some(self.config.ttl),
            )
            .await?;

        let ttl = chrono::Duration::from_std(self.config.ttl)
            .map_err(|e| CoreError::Internal(format!("session TTL out of range: {}", e)))?;

        tracing::info!(
            user_id,
            token = %token_prefix(&token),
            ttl_secs = self.config.ttl.as_secs(),
            "Session created"
        );

        Ok(Session {
            token,
            user_id,
            expires_at: Utc::now() + ttl,
        })
    }

    /// Resolves a token to its user id
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the token is empty, unknown, or expired
    /// - `StoreUnavailable` on store failure
    pub async fn resolve_session(&self, token: &str) -> CoreResult<i64> {
        if token.is_empty() {
            return Err(CoreError::Unauthorized);
        }

        let raw = self
            .store
            .get(&keys::session_key(token))
            .await?
            .ok_or(CoreError::Unauthorized)?;

        parse_id(&raw).map_err(|_| {
            tracing::warn!(token = %token_prefix(token), "Session holds a malformed user id");
            CoreError::Unauthorized
        })
    }

    /// Deletes a session; unknown or empty tokens are ignored
    pub async fn invalidate_session(&self, token: &str) -> CoreResult<()> {
        if token.is_empty() {
            return Ok(());
        }

        self.store.del(&keys::session_key(token)).await?;

        tracing::info!(token = %token_prefix(token), "Session invalidated");
        Ok(())
    }
}

/// Generates a hex-encoded token from 32 bytes of CSPRNG output
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill(&mut bytes);
    hex::encode(bytes)
}

/// Shortened token for logs
fn token_prefix(token: &str) -> &str {
    token.get(..8).unwrap_or(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KvStore, MemoryStore};
    use std::sync::Arc;

    fn setup() -> (Arc<MemoryStore>, SessionManager) {
        let store = Arc::new(MemoryStore::new());
        let sessions = SessionManager::new(store.clone());
        (store, sessions)
    }

    #[test]
    fn test_generate_token() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));

        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn test_token_prefix() {
        assert_eq!(token_prefix("0123456789abcdef"), "01234567");
        assert_eq!(token_prefix("abc"), "abc");
    }

    #[test]
    fn test_default_ttl_is_one_day() {
        assert_eq!(SessionConfig::default().ttl, Duration::from_secs(86_400));
    }

    #[tokio::test]
    async fn test_create_and_resolve() {
        let (store, sessions) = setup();

        let session = sessions.create_session(42).await.unwrap();
        assert_eq!(session.user_id, 42);
        assert!(session.expires_at > Utc::now());

        assert_eq!(sessions.resolve_session(&session.token).await.unwrap(), 42);

        let stored = store
            .get(&keys::session_key(&session.token))
            .await
            .unwrap();
        assert_eq!(stored, Some(b"42".to_vec()));
    }

    #[tokio::test]
    async fn test_tokens_are_distinct_per_session() {
        let (_, sessions) = setup();

        let a = sessions.create_session(1).await.unwrap();
        let b = sessions.create_session(1).await.unwrap();
        assert_ne!(a.token, b.token);

        // Invalidating one leaves the other intact
        sessions.invalidate_session(&a.token).await.unwrap();
        assert_eq!(sessions.resolve_session(&b.token).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_then_resolve_fails() {
        let (_, sessions) = setup();
        let session = sessions.create_session(5).await.unwrap();

        sessions.invalidate_session(&session.token).await.unwrap();

        assert!(matches!(
            sessions.resolve_session(&session.token).await,
            Err(CoreError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_invalidate_is_idempotent() {
        let (_, sessions) = setup();

        sessions.invalidate_session("does-not-exist").await.unwrap();
        sessions.invalidate_session("").await.unwrap();
    }

    #[tokio::test]
    async fn test_resolve_unknown_or_empty_token() {
        let (_, sessions) = setup();

        assert!(matches!(
            sessions.resolve_session("").await,
            Err(CoreError::Unauthorized)
        ));
        assert!(matches!(
            sessions.resolve_session("nope").await,
            Err(CoreError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_resolve_malformed_value_is_unauthorized() {
        let (store, sessions) = setup();
        store
            .set(&keys::session_key("bad"), b"not-a-number", None)
            .await
            .unwrap();

        assert!(matches!(
            sessions.resolve_session("bad").await,
            Err(CoreError::Unauthorized)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_expires_with_ttl() {
        let store = Arc::new(MemoryStore::new());
        let sessions = SessionManager::with_config(
            store,
            SessionConfig {
                ttl: Duration::from_secs(60),
            },
        );

        let session = sessions.create_session(9).await.unwrap();

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(sessions.resolve_session(&session.token).await.unwrap(), 9);

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(matches!(
            sessions.resolve_session(&session.token).await,
            Err(CoreError::Unauthorized)
        ));
    }
}
