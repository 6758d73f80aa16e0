/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: register, login, logout, me
/// - `todos`: task list CRUD

pub mod auth;
pub mod health;
pub mod todos;

use crate::error::{ApiError, ApiResult};
use serde::de::DeserializeOwned;

/// Decodes a JSON request body, reporting failures as 400
pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("invalid JSON: {}", e)))
}
