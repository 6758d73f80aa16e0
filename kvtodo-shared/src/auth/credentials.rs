/// Credential store: registration and credential verification
///
/// Owns the user records and the email index. Registration writes both keys
/// in one conditional batch (MSETNX), so a user record without its index
/// entry (or the reverse) is never observable, and of two concurrent
/// registrations for the same email exactly one succeeds.
///
/// Unknown email and wrong password both fail with
/// [`CoreError::InvalidCredentials`] and carry no detail. Both paths run one
/// Argon2 verification, so response time does not reveal which emails are
/// registered either.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use kvtodo_shared::auth::credentials::CredentialStore;
/// use kvtodo_shared::store::MemoryStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = CredentialStore::new(Arc::new(MemoryStore::new()));
///
/// let user = credentials.register("A@B.com", "Alice", "pw123").await?;
/// assert_eq!(user.email, "a@b.com");
///
/// let same = credentials.verify("a@b.com ", "pw123").await?;
/// assert_eq!(same.id, user.id);
/// # Ok(())
/// # }
/// ```

use super::password;
use crate::error::{CoreError, CoreResult};
use crate::models::user::{normalize_email, PublicUser, User};
use crate::store::{keys, StoreHandle};

/// Credential store
#[derive(Clone)]
pub struct CredentialStore {
    store: StoreHandle,
}

impl CredentialStore {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Registers a new user
    ///
    /// Email is trimmed and lowercased, name is trimmed. The password is kept
    /// as given.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if email, name or password is empty
    /// - `Conflict` if the normalized email is already registered
    /// - `StoreUnavailable` on store failure
    pub async fn register(&self, email: &str, name: &str, password: &str) -> CoreResult<PublicUser> {
        let email = normalize_email(email);
        let name = name.trim();

        if email.is_empty() || name.is_empty() || password.is_empty() {
            return Err(CoreError::validation("email, name and password required"));
        }

        // Fast path; the batch below is what enforces uniqueness
        if self.store.get(&keys::user_email_key(&email)).await?.is_some() {
            return Err(email_taken());
        }

        let password_hash = hash_in_background(password.to_string()).await?;

        let id = self.store.incr(keys::USER_ID_COUNTER).await?;
        let user = User {
            id,
            email,
            name: name.to_string(),
            password_hash,
        };

        let record = serde_json::to_vec(&user)?;
        let written = self
            .store
            .set_all_if_absent(&[
                (keys::user_key(id), record),
                (keys::user_email_key(&user.email), id.to_string().into_bytes()),
            ])
            .await?;
        if !written {
            tracing::debug!(user_id = id, "Lost registration race for email");
            return Err(email_taken());
        }

        tracing::info!(user_id = id, "User registered");
        Ok(user.to_public())
    }

    /// Verifies an email/password pair
    ///
    /// # Errors
    ///
    /// - `ValidationError` if email or password is empty
    /// - `InvalidCredentials` if the email is unknown, its record is gone, or
    ///   the password does not match
    /// - `StoreUnavailable` on store failure
    pub async fn verify(&self, email: &str, password: &str) -> CoreResult<PublicUser> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(CoreError::validation("email and password required"));
        }

        let Some(raw_id) = self.store.get(&keys::user_email_key(&email)).await? else {
            tracing::debug!("Login for unknown email");
            verify_in_background(password.to_string(), DUMMY_HASH.to_string()).await?;
            return Err(CoreError::InvalidCredentials);
        };
        let id = parse_id(&raw_id)?;

        let Some(user) = self.find_by_id(id).await? else {
            tracing::warn!(user_id = id, "Email index points at a missing user record");
            verify_in_background(password.to_string(), DUMMY_HASH.to_string()).await?;
            return Err(CoreError::InvalidCredentials);
        };

        let matches = verify_in_background(password.to_string(), user.password_hash.clone()).await?;
        if !matches {
            tracing::debug!(user_id = id, "Login with wrong password");
            return Err(CoreError::InvalidCredentials);
        }

        Ok(user.to_public())
    }

    /// Loads a user record by id
    pub async fn find_by_id(&self, id: i64) -> CoreResult<Option<User>> {
        match self.store.get(&keys::user_key(id)).await? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }
}

/// Argon2id hash with the same parameters as real records, verified against
/// when no user matches so a miss costs as much as a wrong password
const DUMMY_HASH: &str = "$argon2id$v=19$m=65536,t=3,p=4$c2FsdHNhbHRzYWx0c2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

fn email_taken() -> CoreError {
    CoreError::Conflict("email already registered".to_string())
}

/// Parses a stored decimal id
pub(crate) fn parse_id(raw: &[u8]) -> CoreResult<i64> {
    std::str::from_utf8(raw)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| CoreError::Internal("stored id is not an integer".to_string()))
}

// Argon2 with 64 MB of memory is too heavy for a runtime worker thread.
async fn hash_in_background(password: String) -> CoreResult<String> {
    tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| CoreError::Internal(format!("hashing task failed: {}", e)))?
        .map_err(|e| CoreError::Internal(e.to_string()))
}

async fn verify_in_background(password: String, hash: String) -> CoreResult<bool> {
    tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .map_err(|e| CoreError::Internal(format!("verification task failed: {}", e)))?
        .map_err(|e| CoreError::Internal(e.to_string()))
}
