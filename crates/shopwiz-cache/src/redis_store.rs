use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::error::CacheError;
use crate::store::CacheStore;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Redis-backed cache using `GET` and `SET key value EX seconds`.
///
/// The connection manager reconnects on its own after a dropped connection,
/// so one instance lives for the whole process.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Opens a managed connection to `redis_url`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Redis`] if the URL is malformed or the first
    /// connection is refused, and [`CacheError::Unavailable`] if it does not
    /// complete within five seconds.
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let conn = tokio::time::timeout(CONNECT_TIMEOUT, ConnectionManager::new(client))
            .await
            .map_err(|_| {
                CacheError::Unavailable(format!(
                    "connection not established within {}s",
                    CONNECT_TIMEOUT.as_secs()
                ))
            })??;
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let () = conn.set_ex(key, value, ttl.as_secs().max(1)).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
