/// Error kinds returned by every core operation
///
/// Callers (the HTTP layer, tests) match on the variant to pick a transport
/// status. Messages are safe to show to clients except for `Internal`, whose
/// detail is meant for logs only.
///
/// # Example
///
/// ```
/// use kvtodo_shared::error::CoreError;
///
/// let err = CoreError::validation("title is required");
/// assert_eq!(err.kind(), "validation_error");
/// ```

use crate::store::StoreError;
use thiserror::Error;

/// Result alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Core error type
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed or missing required input
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Duplicate email on registration
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unknown email or wrong password
    ///
    /// Carries no detail so both causes look identical to the caller.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, expired or invalid session, or a session whose user is gone
    #[error("Unauthorized")]
    Unauthorized,

    /// Operation targets a nonexistent task
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network or store failure
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// Hashing failure or a stored record that cannot be decoded
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::ValidationError`]
    pub fn validation(msg: impl Into<String>) -> Self {
        CoreError::ValidationError(msg.into())
    }

    /// Stable snake_case name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::ValidationError(_) => "validation_error",
            CoreError::Conflict(_) => "conflict",
            CoreError::InvalidCredentials => "invalid_credentials",
            CoreError::Unauthorized => "unauthorized",
            CoreError::NotFound(_) => "not_found",
            CoreError::StoreUnavailable(_) => "store_unavailable",
            CoreError::Internal(_) => "internal_error",
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Internal(format!("Corrupt record: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::validation("email is required");
        assert_eq!(err.to_string(), "Validation failed: email is required");

        assert_eq!(CoreError::InvalidCredentials.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_store_error_becomes_unavailable() {
        let err: CoreError = StoreError::Timeout.into();
        assert_eq!(err.kind(), "store_unavailable");
    }

    #[test]
    fn test_json_error_is_internal() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert_eq!(err.kind(), "internal_error");
    }
}
