/// Key-value store abstraction shared by every core component
///
/// All state the service owns lives behind [`KvStore`]. Components receive a
/// [`StoreHandle`] at construction time; nothing in the core keeps in-process
/// mutable state of its own.
///
/// # Backends
///
/// - [`RedisStore`]: production backend over a Redis `ConnectionManager`
/// - [`MemoryStore`]: in-process backend with native TTL, used by tests and
///   local development
///
/// # Key Layout
///
/// ```text
/// user:id                  counter (INCR)
/// user:<id>                user JSON
/// user:email:<email>       user id
/// session:<token>          user id, TTL 24h
/// todo:id                  counter (INCR)
/// todo:<id>                task JSON
/// todos                    set of task ids
/// ```
///
/// # Example
///
/// ```
/// use kvtodo_shared::store::{KvStore, MemoryStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// store.set("greeting", b"hello", None).await?;
/// assert_eq!(store.get("greeting").await?, Some(b"hello".to_vec()));
/// assert_eq!(store.incr("counter").await?, 1);
/// # Ok(())
/// # }
/// ```

pub mod client;
pub mod keys;
pub mod memory;

#[cfg(test)]
pub(crate) mod failing;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub use client::{RedisConfig, RedisStore};
pub use memory::MemoryStore;

/// Store errors
///
/// Every variant means the store could not serve the request; the core maps
/// all of them to `StoreUnavailable`.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Connection error
    #[error("Store connection error: {0}")]
    ConnectionError(String),

    /// Command execution error
    #[error("Store command error: {0}")]
    CommandError(String),

    /// Configuration error
    #[error("Store configuration error: {0}")]
    ConfigError(String),

    /// Command did not complete within the configured timeout
    #[error("Store command timed out")]
    Timeout,
}

/// Operations the core needs from the backing store
///
/// Single-key operations are linearizable. `set_all_if_absent` is
/// all-or-nothing: no reader ever observes part of a batch.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Reads a string value; `None` if absent or expired
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Writes a string value, replacing any previous value and expiry
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<(), StoreError>;

    /// Deletes a key; deleting a missing key is not an error
    async fn del(&self, key: &str) -> Result<(), StoreError>;

    /// Atomically increments an integer counter and returns the new value
    async fn incr(&self, key: &str) -> Result<i64, StoreError>;

    /// Adds a member to a set
    async fn sadd(&self, key: &str, member: &str) -> Result<(), StoreError>;

    /// Removes a member from a set
    async fn srem(&self, key: &str, member: &str) -> Result<(), StoreError>;

    /// Returns all members of a set (empty if the set does not exist)
    async fn smembers(&self, key: &str) -> Result<Vec<String>, StoreError>;

    /// Writes every entry atomically, but only if none of the keys exist
    /// (MSETNX semantics)
    ///
    /// Returns `false`, writing nothing, when any key is already present.
    async fn set_all_if_absent(&self, entries: &[(String, Vec<u8>)]) -> Result<bool, StoreError>;

    /// Health check
    async fn ping(&self) -> Result<bool, StoreError>;
}

/// Shared, process-wide store handle
pub type StoreHandle = Arc<dyn KvStore>;
