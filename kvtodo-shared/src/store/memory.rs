//! In-process store with TTL support (stands in for Redis in tests and dev)
//!
//! Strings, counters and sets share one keyspace, as in Redis. An expired key
//! is dropped when it is next touched, and writes sweep every expired key at
//! most once per [`SWEEP_INTERVAL`], so keys that are never read again (old
//! sessions) do not pile up. Expiry is measured with `tokio::time::Instant`,
//! so paused-clock tests can advance past a TTL.

use super::{KvStore, StoreError};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Minimum time between two full sweeps of expired keys
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

enum Value {
    Bytes(Vec<u8>),
    Set(BTreeSet<String>),
}

struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.map(|at| now >= at).unwrap_or(false)
    }
}

struct Keyspace {
    entries: HashMap<String, Entry>,
    last_sweep: Instant,
}

impl Default for Keyspace {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            last_sweep: Instant::now(),
        }
    }
}

impl Keyspace {
    /// Returns the live entry for `key`, evicting it first if it has expired
    fn live(&mut self, key: &str) -> Option<&mut Entry> {
        let now = Instant::now();
        if self.entries.get(key).map(|e| e.is_expired(now)).unwrap_or(false) {
            self.entries.remove(key);
        }
        self.entries.get_mut(key)
    }

    fn insert(&mut self, key: String, value: Value, expires_at: Option<Instant>) {
        self.sweep_if_due();
        self.entries.insert(key, Entry { value, expires_at });
    }

    fn sweep_if_due(&mut self) {
        let now = Instant::now();
        if now.duration_since(self.last_sweep) < SWEEP_INTERVAL {
            return;
        }

        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        self.last_sweep = now;

        let evicted = before - self.entries.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Swept expired keys");
        }
    }
}

/// In-memory key-value store
///
/// One lock guards the whole keyspace, which makes batch writes trivially
/// all-or-nothing.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<Keyspace>,
}

fn wrong_type(key: &str) -> StoreError {
    StoreError::CommandError(format!(
        "WRONGTYPE Operation against key '{}' holding the wrong kind of value",
        key
    ))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let data = self.data.lock().await;
        data.entries.values().filter(|e| !e.is_expired(now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of stored entries, expired or not
    #[cfg(test)]
    async fn stored(&self) -> usize {
        self.data.lock().await.entries.len()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut data = self.data.lock().await;
        match data.live(key) {
            Some(Entry {
                value: Value::Bytes(bytes),
                ..
            }) => Ok(Some(bytes.clone())),
            Some(_) => Err(wrong_type(key)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        data.insert(
            key.to_string(),
            Value::Bytes(value.to_vec()),
            ttl.map(|ttl| Instant::now() + ttl),
        );
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        self.data.lock().await.entries.remove(key);
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64, StoreError> {
        let mut data = self.data.lock().await;
        let next = match data.live(key) {
            Some(entry) => {
                let Value::Bytes(bytes) = &mut entry.value else {
                    return Err(wrong_type(key));
                };
                let current: i64 = std::str::from_utf8(bytes)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| {
                        StoreError::CommandError(
                            "ERR value is not an integer or out of range".to_string(),
                        )
                    })?;
                let next = current
                    .checked_add(1)
                    .ok_or_else(|| StoreError::CommandError("ERR increment would overflow".to_string()))?;
                // INCR keeps the key's expiry
                *bytes = next.to_string().into_bytes();
                next
            }
            None => {
                data.insert(key.to_string(), Value::Bytes(b"1".to_vec()), None);
                1
            }
        };
        Ok(next)
    }

    async fn sadd(&self, key: &str, member: &str) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        match data.live(key) {
            Some(Entry {
                value: Value::Set(members),
                ..
            }) => {
                members.insert(member.to_string());
            }
            Some(_) => return Err(wrong_type(key)),
            None => {
                data.insert(
                    key.to_string(),
                    Value::Set(BTreeSet::from([member.to_string()])),
                    None,
                );
            }
        }
        Ok(())
    }

    async fn srem(&self, key: &str, member: &str) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        let now_empty = match data.live(key) {
            Some(Entry {
                value: Value::Set(members),
                ..
            }) => {
                members.remove(member);
                members.is_empty()
            }
            Some(_) => return Err(wrong_type(key)),
            None => false,
        };
        // Redis drops a set once its last member is removed
        if now_empty {
            data.entries.remove(key);
        }
        Ok(())
    }

    async fn smembers(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let mut data = self.data.lock().await;
        match data.live(key) {
            Some(Entry {
                value: Value::Set(members),
                ..
            }) => Ok(members.iter().cloned().collect()),
            Some(_) => Err(wrong_type(key)),
            None => Ok(Vec::new()),
        }
    }

    async fn set_all_if_absent(&self, entries: &[(String, Vec<u8>)]) -> Result<bool, StoreError> {
        let mut data = self.data.lock().await;
        // MSETNX: refuse the whole batch if any key is live
        for (key, _) in entries {
            if data.live(key).is_some() {
                return Ok(false);
            }
        }
        for (key, value) in entries {
            data.insert(key.clone(), Value::Bytes(value.clone()), None);
        }
        Ok(true)
    }

    async fn ping(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
