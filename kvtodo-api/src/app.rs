/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use kvtodo_api::{app::{build_router, AppState}, config::Config};
/// use kvtodo_shared::store::{RedisStore, StoreHandle};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let store: StoreHandle = Arc::new(RedisStore::new(config.store.redis.clone()).await?);
/// let app = build_router(AppState::new(store, config));
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use kvtodo_shared::auth::{AuthorizationGate, CredentialStore, SessionConfig, SessionManager};
use kvtodo_shared::models::task::TaskStore;
use kvtodo_shared::store::StoreHandle;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Every
/// component holds the same store handle, which is created once at startup.
#[derive(Clone)]
pub struct AppState {
    /// Backing store (used directly only by the health check)
    pub store: StoreHandle,

    pub credentials: CredentialStore,

    pub sessions: SessionManager,

    pub gate: AuthorizationGate,

    pub tasks: TaskStore,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires every core component to `store`
    pub fn new(store: StoreHandle, config: Config) -> Self {
        let credentials = CredentialStore::new(store.clone());
        let sessions = SessionManager::with_config(
            store.clone(),
            SessionConfig {
                ttl: config.session.ttl(),
            },
        );
        let gate = AuthorizationGate::new(sessions.clone(), credentials.clone());
        let tasks = TaskStore::new(store.clone());

        Self {
            store,
            credentials,
            sessions,
            gate,
            tasks,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /health                 # Health check (public)
/// └── /api/
///     ├── POST   /register        # public
///     ├── POST   /login           # public, sets session cookie
///     ├── POST   /logout          # public, clears session cookie
///     ├── GET    /me              # session required
///     ├── GET    /todos           # session required
///     ├── POST   /todos           # session required
///     ├── PUT    /todos/:id       # session required
///     └── DELETE /todos/:id       # session required
/// ```
///
/// Session checks are done by the [`Authenticated`](crate::extract::Authenticated)
/// extractor on each protected handler.
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route("/me", get(routes::auth::me));

    let todo_routes = Router::new()
        .route(
            "/todos",
            get(routes::todos::list_todos).post(routes::todos::create_todo),
        )
        .route(
            "/todos/:id",
            put(routes::todos::update_todo).delete(routes::todos::delete_todo),
        );

    let api_routes = Router::new().merge(auth_routes).merge(todo_routes);

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        // Cookies cross origins only with credentials allowed
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvtodo_shared::store::MemoryStore;

    #[test]
    fn test_app_state_uses_configured_ttl() {
        let mut config = Config::for_test();
        config.session.ttl_secs = 120;

        let state = AppState::new(Arc::new(MemoryStore::new()), config);
        assert_eq!(state.sessions.config().ttl.as_secs(), 120);
    }
}
