//! Key-value store port for the rate cache, with Redis and in-memory adapters.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use redis::AsyncCommands;

/// Error type for cache-store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Cache store error: {0}")]
    Backend(String),
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Port trait for the shared key-value store backing the rate cache.
///
/// The store must provide atomic per-key operations; no further coordination
/// is required because concurrent writers for the same key compute the same
/// value and last-write-wins is safe. TTL enforcement is delegated to the
/// store: an expired key simply stops being visible to `get` and `keys`.
#[async_trait::async_trait]
pub trait RateStore: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes a value with a time-to-live, resetting the TTL clock on
    /// overwrite.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Lists live keys starting with `prefix`.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Redis adapter
// ─────────────────────────────────────────────────────────────────────────────

/// Redis-backed store, shared across service instances.
#[derive(Clone)]
pub struct RedisRateStore {
    conn: redis::aio::ConnectionManager,
}

impl RedisRateStore {
    /// Connects to Redis and establishes a reconnecting connection manager.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let conn = redis::aio::ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

#[async_trait::async_trait]
impl RateStore for RedisRateStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        Ok(conn.get(key).await?)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(key, value, ttl.as_secs()).await?;
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn.clone();
        Ok(conn.keys(format!("{prefix}*")).await?)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory adapter
// ─────────────────────────────────────────────────────────────────────────────

/// Process-local store for tests and single-node development.
///
/// TTL is enforced lazily: expired entries are dropped when touched by
/// `get` or `keys_with_prefix`, matching the visibility semantics of the
/// Redis adapter.
#[derive(Default)]
pub struct InMemoryRateStore {
    entries: DashMap<String, (String, Instant)>,
}

impl InMemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RateStore for InMemoryRateStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if let Some(entry) = self.entries.get(key) {
            let (value, deadline) = entry.value().clone();
            if Instant::now() < deadline {
                return Ok(Some(value));
            }
        }
        self.entries.remove(key);
        Ok(None)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        self.entries
            .insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let now = Instant::now();
        self.entries.retain(|_, (_, deadline)| now < *deadline);
        Ok(self
            .entries
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|key| key.starts_with(prefix))
            .collect())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}
