/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, `*` for any (default: *)
/// - `STORE_BACKEND`: `redis` or `memory` (default: redis)
/// - `REDIS_URL` / `REDIS_ADDR` / `REDIS_PASSWORD`: see [`RedisConfig::from_env`]
/// - `SESSION_COOKIE_NAME`: Session cookie name (default: session_id)
/// - `SESSION_TTL_SECS`: Session lifetime (default: 86400)
/// - `COOKIE_SECURE`: Set the `Secure` cookie attribute (default: false)
/// - `RUST_LOG`: Log level (default: debug for this crate)
///
/// # Example
///
/// ```no_run
/// use kvtodo_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use kvtodo_shared::store::RedisConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Backing store configuration
    pub store: StoreConfig,

    /// Session cookie configuration
    pub session: SessionSettings,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins (`*` means permissive)
    pub cors_origins: Vec<String>,
}

/// Which store implementation to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            other => anyhow::bail!("unknown STORE_BACKEND '{}', expected redis or memory", other),
        }
    }
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Only read when `backend` is `Redis`
    pub redis: RedisConfig,
}

/// Session cookie configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Name of the cookie carrying the session token
    pub cookie_name: String,

    /// Session lifetime in seconds
    pub ttl_secs: u64,

    /// Whether to mark the cookie `Secure` (enable behind HTTPS)
    pub cookie_secure: bool,
}

impl SessionSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: "session_id".to_string(),
            ttl_secs: 24 * 60 * 60,
            cookie_secure: false,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable has an invalid value.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let backend = env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "redis".to_string())
            .parse::<StoreBackend>()?;
        let redis = RedisConfig::from_env()?;

        let defaults = SessionSettings::default();
        let cookie_name = env::var("SESSION_COOKIE_NAME").unwrap_or(defaults.cookie_name);
        if cookie_name.is_empty() || cookie_name.contains(|c: char| c == '=' || c == ';' || c.is_whitespace()) {
            anyhow::bail!("SESSION_COOKIE_NAME is not a valid cookie name");
        }

        let ttl_secs = match env::var("SESSION_TTL_SECS") {
            Ok(raw) => raw.parse::<u64>()?,
            Err(_) => defaults.ttl_secs,
        };
        if ttl_secs == 0 {
            anyhow::bail!("SESSION_TTL_SECS must be greater than zero");
        }

        let cookie_secure = match env::var("COOKIE_SECURE") {
            Ok(raw) => raw.parse::<bool>()?,
            Err(_) => defaults.cookie_secure,
        };

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            store: StoreConfig { backend, redis },
            session: SessionSettings {
                cookie_name,
                ttl_secs,
                cookie_secure,
            },
        })
    }

    /// Configuration for tests: in-memory store, default session settings
    pub fn for_test() -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                redis: RedisConfig::default_for_test(),
            },
            session: SessionSettings::default(),
        }
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
