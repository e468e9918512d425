use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, interval};
use crate::error::CacheError;
use crate::metrics::CACHE_SIZE;

// Create a cache key from proposal id + timestamp, no normalization
pub fn cache_key(proposal_id: &str, timestamp: &str) -> String {
    format!("proposal:{}:timestamp:{}", proposal_id, timestamp)
}

// Expiry in whole seconds for stores that only take seconds, never zero
pub fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

/// Key-value capability with store-managed expiry.
///
/// The handler only ever reads and writes; expired entries must read as
/// absent and are dropped by the store itself.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;
}

// Cache entry with timestamp
#[derive(Clone)]
pub struct CacheEntry {
    pub response: String,
    pub created_at: Instant,
    pub ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }
}

// In-process store, used by default and in tests
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // Drop every expired entry, returns how many went
    pub fn sweep_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        CACHE_SIZE.set(self.entries.len() as f64);
        before.saturating_sub(self.entries.len())
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.response.clone())),
            Some(_) => true,
            None => false,
        };
        // guard is released above, safe to remove now
        if expired {
            self.entries.remove_if(key, |_, entry| entry.is_expired());
            CACHE_SIZE.set(self.entries.len() as f64);
        }
        Ok(None)
    }

    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                response: value,
                created_at: Instant::now(),
                ttl,
            },
        );
        CACHE_SIZE.set(self.entries.len() as f64);
        Ok(())
    }
}

// Background sweeper - drops expired entries every `sweep_interval`
pub async fn expiry_sweeper(store: Arc<MemoryStore>, sweep_interval: Duration) {
    let mut interval = interval(sweep_interval);

    tracing::info!(interval = ?sweep_interval, "cache sweeper started");

    loop {
        interval.tick().await;
        let evicted = store.sweep_expired();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = store.len(), "swept expired cache entries");
        }
    }
}

#[cfg(feature = "redis")]
pub use redis_store::RedisStore;

#[cfg(feature = "redis")]
mod redis_store {
    use super::{KvStore, ttl_secs};
    use crate::error::CacheError;
    use async_trait::async_trait;
    use redis::AsyncCommands;
    use redis::aio::ConnectionManager;
    use std::time::Duration;

    // Shared store backed by redis GET / SET EX
    #[derive(Clone)]
    pub struct RedisStore {
        conn: ConnectionManager,
    }

    fn backend(err: redis::RedisError) -> CacheError {
        CacheError::Backend(err.to_string())
    }

    impl RedisStore {
        pub async fn connect(url: &str) -> Result<Self, CacheError> {
            let client = redis::Client::open(url).map_err(backend)?;
            let conn = ConnectionManager::new(client).await.map_err(backend)?;
            Ok(Self { conn })
        }
    }

    #[async_trait]
    impl KvStore for RedisStore {
        async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            let mut conn = self.conn.clone();
            let value: Option<String> = conn.get(key).await.map_err(backend)?;
            Ok(value)
        }

        async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
            let mut conn = self.conn.clone();
            let _: () = conn.set_ex(key, value, ttl_secs(ttl)).await.map_err(backend)?;
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        // needs a live server: REDIS_URL=redis://127.0.0.1/ cargo test --features redis -- --ignored
        #[tokio::test]
        #[ignore]
        async fn test_redis_round_trip() {
            let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".into());
            let store = RedisStore::connect(&url).await.unwrap();

            let key = format!("proposal:redis-test-{}:timestamp:t1", std::process::id());
            assert_eq!(store.get(&key).await.unwrap(), None);

            store.put(&key, r#"{"reply":"hello"}"#.into(), Duration::from_secs(5)).await.unwrap();
            assert_eq!(store.get(&key).await.unwrap().as_deref(), Some(r#"{"reply":"hello"}"#));

            let mut conn = store.conn.clone();
            let ttl: i64 = redis::cmd("TTL").arg(&key).query_async(&mut conn).await.unwrap();
            assert!((1..=5).contains(&ttl), "ttl was {ttl}");
        }
    }
}
