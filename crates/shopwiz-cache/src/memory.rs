use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::CacheError;
use crate::store::CacheStore;

/// Longest expiry honoured; larger TTLs are clamped to it.
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// In-process cache with the same expiry semantics as the Redis backend.
///
/// Used when no Redis endpoint is configured or reachable, and in tests.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        entries.values().filter(|(_, expires)| *expires > now).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some((value, expires)) if *expires > now => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, (_, expires)| *expires > now);
        let expires = now + ttl.min(MAX_TTL);
        entries.insert(key.to_owned(), (value.to_owned(), expires));
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_what_was_set() {
        let cache = MemoryCache::new();
        cache
            .set_ex("milk:1", "[]", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get("milk:1").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(cache.get("milk:2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_overwrites_previous_value() {
        let cache = MemoryCache::new();
        let ttl = Duration::from_secs(60);
        cache.set_ex("milk:totalPages", "2", ttl).await.unwrap();
        cache.set_ex("milk:totalPages", "3", ttl).await.unwrap();
        assert_eq!(
            cache.get("milk:totalPages").await.unwrap().as_deref(),
            Some("3")
        );
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = MemoryCache::new();
        cache
            .set_ex("milk:1", "[]", Duration::from_secs(3600))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(3599)).await;
        assert!(cache.get("milk:1").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get("milk:1").await.unwrap().is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn huge_ttl_is_clamped_instead_of_overflowing() {
        let cache = MemoryCache::new();
        cache.set_ex("milk:1", "[]", Duration::MAX).await.unwrap();
        cache
            .set_ex("milk:2", "[]", Duration::from_secs(u64::MAX))
            .await
            .unwrap();
        assert_eq!(cache.get("milk:1").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(cache.len().await, 2);
    }
}
