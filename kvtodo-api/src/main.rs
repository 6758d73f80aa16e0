//! # kvtodo API Server
//!
//! Task list service with cookie-session authentication, backed by Redis.
//!
//! ## Usage
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379 cargo run -p kvtodo-api
//! STORE_BACKEND=memory cargo run -p kvtodo-api
//! ```

use kvtodo_api::{
    app::{build_router, AppState},
    config::{Config, StoreBackend},
};
use kvtodo_shared::store::{MemoryStore, RedisStore, StoreHandle};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kvtodo_api=debug,kvtodo_shared=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "kvtodo API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let store: StoreHandle = match config.store.backend {
        StoreBackend::Redis => Arc::new(RedisStore::new(config.store.redis.clone()).await?),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received, exiting...");
}
