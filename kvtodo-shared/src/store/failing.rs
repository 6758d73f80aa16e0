//! Store double whose every command times out

use super::{KvStore, StoreError};
use async_trait::async_trait;
use std::time::Duration;

pub(crate) struct FailingStore;

#[async_trait]
impl KvStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Err(StoreError::Timeout)
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Option<Duration>) -> Result<(), StoreError> {
        Err(StoreError::Timeout)
    }

    async fn del(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Timeout)
    }

    async fn incr(&self, _key: &str) -> Result<i64, StoreError> {
        Err(StoreError::Timeout)
    }

    async fn sadd(&self, _key: &str, _member: &str) -> Result<(), StoreError> {
        Err(StoreError::Timeout)
    }

    async fn srem(&self, _key: &str, _member: &str) -> Result<(), StoreError> {
        Err(StoreError::Timeout)
    }

    async fn smembers(&self, _key: &str) -> Result<Vec<String>, StoreError> {
        Err(StoreError::Timeout)
    }

    async fn set_all_if_absent(&self, _entries: &[(String, Vec<u8>)]) -> Result<bool, StoreError> {
        Err(StoreError::Timeout)
    }

    async fn ping(&self) -> Result<bool, StoreError> {
        Err(StoreError::Timeout)
    }
}
