/// User record and its public projection
///
/// Users are created by registration and never modified afterwards. The
/// stored record carries the Argon2id password hash; everything that leaves
/// the core uses [`PublicUser`] instead, which has no hash field at all.
///
/// # Storage
///
/// ```text
/// user:<id>            {"id":1,"email":"a@b.com","name":"Alice","password_hash":"$argon2id$..."}
/// user:email:<email>   1
/// ```
///
/// # Example
///
/// ```
/// use kvtodo_shared::models::user::normalize_email;
///
/// assert_eq!(normalize_email("  A@B.com "), "a@b.com");
/// ```

use serde::{Deserialize, Serialize};

/// Stored user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Id allocated from the `user:id` counter
    pub id: i64,

    /// Normalized email (trimmed, lowercased, unique)
    pub email: String,

    /// Display name (trimmed)
    pub name: String,

    /// Argon2id hash in PHC string format
    ///
    /// Never returned to callers.
    pub password_hash: String,
}

impl User {
    /// Public projection of this user
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// User as seen by callers (no password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub name: String,
}

/// Normalizes an email for storage and lookup: trim, then lowercase
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
