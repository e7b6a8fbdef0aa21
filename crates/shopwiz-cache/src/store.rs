use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheError;
use crate::memory::MemoryCache;
use crate::redis_store::RedisCache;

/// A string key-value store with per-entry expiry.
///
/// Expired entries read as absent. There is no delete; entries only expire.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key`, replacing any previous value, for `ttl`.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Round-trips to the backend to check it is reachable.
    async fn ping(&self) -> Result<(), CacheError>;

    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;
}

/// Picks the cache backend for this process.
///
/// Uses Redis when `redis_url` is set and answers a `PING`; otherwise falls
/// back to an in-process map and logs why.
pub async fn connect_store(redis_url: Option<&str>) -> Arc<dyn CacheStore> {
    let Some(url) = redis_url else {
        tracing::info!("no Redis endpoint configured, using in-memory cache");
        return Arc::new(MemoryCache::new());
    };

    match RedisCache::connect(url).await {
        Ok(cache) => match cache.ping().await {
            Ok(()) => {
                tracing::info!("connected to Redis cache");
                Arc::new(cache)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Redis did not answer PING, using in-memory cache");
                Arc::new(MemoryCache::new())
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "could not connect to Redis, using in-memory cache");
            Arc::new(MemoryCache::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_url_selects_memory_backend() {
        let store = connect_store(None).await;
        assert_eq!(store.backend(), "memory");
    }

    #[tokio::test]
    async fn malformed_url_falls_back_to_memory() {
        let store = connect_store(Some("not a redis url")).await;
        assert_eq!(store.backend(), "memory");
        store.ping().await.unwrap();
    }
}
