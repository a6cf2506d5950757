//! Redis wrapper with graceful degradation.
//!
//! Lookups return `Option<T>`: a missing client, a failed connection or a
//! missing key all read as `None`, with a warning logged for real failures.
//! Writes come in two flavours, a `try_` variant that reports the cause and
//! a plain one that logs and returns `bool`.
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::CommonError;

#[derive(Clone)]
pub struct RedisCache {
    client: Option<redis::Client>,
}

impl RedisCache {
    /// A `None` URL, or one that fails to parse, yields a cache that no-ops.
    pub fn new(url: Option<&str>) -> Self {
        let client = url.and_then(|u| {
            redis::Client::open(u)
                .inspect_err(|e| warn!(error = %e, url = u, "failed to create redis client, persistence disabled"))
                .ok()
        });
        Self { client }
    }

    pub fn disabled() -> Self {
        Self { client: None }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Sends a PING. `false` when unconfigured or unreachable.
    pub async fn is_available(&self) -> bool {
        let Ok(mut conn) = self.connection().await else {
            return false;
        };
        let pong: Result<String, _> = redis::cmd("PING").query_async(&mut conn).await;
        pong.is_ok()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self
            .connection()
            .await
            .inspect_err(|e| warn_unless_unavailable(e, key))
            .ok()?;
        let value: Option<String> = conn
            .get(key)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis GET failed"))
            .ok()?;
        value
    }

    /// Read and decode a JSON value. Undecodable payloads read as `None`.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key).await?;
        serde_json::from_str(&raw)
            .inspect_err(|e| warn!(error = %e, key, "stored value failed to deserialize"))
            .ok()
    }

    pub async fn try_set_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CommonError> {
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await?;
        Ok(())
    }

    pub async fn set_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) -> bool {
        self.try_set_with_ttl(key, value, ttl_secs)
            .await
            .inspect_err(|e| warn_unless_unavailable(e, key))
            .is_ok()
    }

    pub async fn try_set_json_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: u64,
    ) -> Result<(), CommonError> {
        let raw = serde_json::to_string(value)?;
        self.try_set_with_ttl(key, &raw, ttl_secs).await
    }

    pub async fn delete(&self, key: &str) -> bool {
        let Ok(mut conn) = self
            .connection()
            .await
            .inspect_err(|e| warn_unless_unavailable(e, key))
        else {
            return false;
        };
        conn.del::<_, ()>(key)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis DEL failed"))
            .is_ok()
    }

    async fn connection(&self) -> Result<MultiplexedConnection, CommonError> {
        let client = self.client.as_ref().ok_or(CommonError::RedisUnavailable)?;
        Ok(client.get_multiplexed_async_connection().await?)
    }
}

fn warn_unless_unavailable(err: &CommonError, key: &str) {
    if !matches!(err, CommonError::RedisUnavailable) {
        warn!(error = %err, key, "redis operation failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_cache_degrades() {
        let cache = RedisCache::new(None);
        assert!(!cache.is_configured());
        assert!(!cache.is_available().await);
        assert_eq!(cache.get("k").await, None);
        assert!(!cache.set_with_ttl("k", "v", 10).await);
        assert!(!cache.delete("k").await);
        assert!(matches!(
            cache.try_set_with_ttl("k", "v", 10).await,
            Err(CommonError::RedisUnavailable)
        ));
    }

    #[test]
    fn invalid_url_disables_cache() {
        let cache = RedisCache::new(Some("not a url"));
        assert!(!cache.is_configured());
    }
}
