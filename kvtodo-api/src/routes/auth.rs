/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/register` - Register new user
/// - `POST /api/login` - Verify credentials and start a session
/// - `POST /api/logout` - End the session and clear the cookie
/// - `GET  /api/me` - Current user (session required)

use super::parse_json;
use crate::{
    app::AppState,
    cookie,
    error::ApiResult,
    extract::Authenticated,
};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use kvtodo_shared::models::user::PublicUser;
use serde::{Deserialize, Serialize};

/// Register request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Always "ok"
    pub status: &'static str,

    pub user: PublicUser,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/register
/// Content-Type: application/json
///
/// { "email": "A@B.com", "name": "Alice", "password": "pw123" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "id": 1, "email": "a@b.com", "name": "Alice" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: invalid JSON or missing field
/// - `409 Conflict`: email already registered
pub async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<PublicUser>)> {
    let req: RegisterRequest = parse_json(&body)?;

    let user = state
        .credentials
        .register(&req.email, &req.name, &req.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Login endpoint
///
/// Verifies the credentials, creates a session and sets it as an `HttpOnly`
/// cookie.
///
/// # Endpoint
///
/// ```text
/// POST /api/login
/// Content-Type: application/json
///
/// { "email": "a@b.com", "password": "pw123" }
/// ```
///
/// # Response
///
/// ```json
/// { "status": "ok", "user": { "id": 1, "email": "a@b.com", "name": "Alice" } }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: invalid JSON or missing field
/// - `401 Unauthorized`: invalid credentials
pub async fn login(State(state): State<AppState>, body: Bytes) -> ApiResult<Response> {
    let req: LoginRequest = parse_json(&body)?;

    let user = state.credentials.verify(&req.email, &req.password).await?;
    let session = state.sessions.create_session(user.id).await?;

    let set_cookie = cookie::issue_cookie(&state.config.session, &session.token)?;

    Ok((
        [(header::SET_COOKIE, set_cookie)],
        Json(LoginResponse { status: "ok", user }),
    )
        .into_response())
}

/// Logout endpoint
///
/// Deletes the session named by the cookie, if any, and always clears the
/// cookie. Not gated: logging out without a session is a no-op.
///
/// # Response
///
/// `204 No Content`
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    if let Some(token) = cookie::read_cookie(&headers, &state.config.session.cookie_name) {
        state.sessions.invalidate_session(&token).await?;
    }

    let set_cookie = cookie::clear_cookie(&state.config.session)?;

    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, set_cookie)]).into_response())
}

/// Current user
///
/// # Response
///
/// ```json
/// { "id": 1, "email": "a@b.com", "name": "Alice" }
/// ```
pub async fn me(Authenticated(identity): Authenticated) -> Json<PublicUser> {
    Json(identity.to_public())
}
