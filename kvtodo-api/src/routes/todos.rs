/// Task list endpoints
///
/// Every handler takes [`Authenticated`] first, so the session check runs
/// before the body is read and before the task store is touched. Tasks are
/// not scoped by user; the identity is only recorded in logs.
///
/// # Endpoints
///
/// - `GET    /api/todos` - List all tasks
/// - `POST   /api/todos` - Create a task
/// - `PUT    /api/todos/:id` - Partially update a task
/// - `DELETE /api/todos/:id` - Delete a task

use super::parse_json;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::Authenticated,
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use kvtodo_shared::models::task::Task;
use serde::Deserialize;

/// Create request
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub title: String,
}

fn parse_task_id(raw: &str) -> ApiResult<i64> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid task id '{}'", raw)))
}

/// List all tasks
///
/// # Response
///
/// ```json
/// [ { "id": 1, "title": "Buy milk", "done": false } ]
/// ```
pub async fn list_todos(
    Authenticated(identity): Authenticated,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state.tasks.list().await?;

    tracing::debug!(user_id = identity.user_id, count = tasks.len(), "Listed tasks");
    Ok(Json(tasks))
}

/// Create a task
///
/// # Endpoint
///
/// ```text
/// POST /api/todos
/// Content-Type: application/json
///
/// { "title": "Buy milk" }
/// ```
///
/// # Response
///
/// `201 Created` with the new task.
///
/// # Errors
///
/// - `400 Bad Request`: invalid JSON or empty title
pub async fn create_todo(
    Authenticated(identity): Authenticated,
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let req: CreateTodoRequest = parse_json(&body)?;

    let task = state.tasks.create(&req.title).await?;

    tracing::debug!(user_id = identity.user_id, task_id = task.id, "Created task");
    Ok((StatusCode::CREATED, Json(task)))
}

/// Partially update a task
///
/// # Endpoint
///
/// ```text
/// PUT /api/todos/1
/// Content-Type: application/json
///
/// { "done": true }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: invalid id, invalid JSON, or blank title
/// - `404 Not Found`: no such task (checked before the body is parsed)
pub async fn update_todo(
    Authenticated(identity): Authenticated,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Task>> {
    let id = parse_task_id(&id)?;

    let task = state.tasks.update(id, &body).await?;

    tracing::debug!(user_id = identity.user_id, task_id = id, "Updated task");
    Ok(Json(task))
}

/// Delete a task
///
/// Succeeds whether or not the task exists.
///
/// # Response
///
/// `204 No Content`
pub async fn delete_todo(
    Authenticated(identity): Authenticated,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_task_id(&id)?;

    state.tasks.delete(id).await?;

    tracing::debug!(user_id = identity.user_id, task_id = id, "Deleted task");
    Ok(StatusCode::NO_CONTENT)
}
