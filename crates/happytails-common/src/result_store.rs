use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use quiz_engine::QuizResult;
use sha2::{Digest, Sha256};

use crate::error::CommonError;
use crate::redis::RedisCache;

static SESSION_COUNTER: AtomicU64 = AtomicU64::new(0);

const KEY_PREFIX: &str = "happytails:quiz:v1:";
pub const DEFAULT_RESULT_TTL_SECS: u64 = 86_400;

pub type SessionId = String;

/// Session-scoped persistence for completed quiz results.
///
/// Key schema: `happytails:quiz:v1:result:{session_id}` holding the JSON
/// `QuizResult`, expiring after `ttl_secs`.
#[derive(Clone)]
pub struct ResultStore {
    redis: RedisCache,
    ttl_secs: u64,
}

impl ResultStore {
    pub fn new(redis: RedisCache, ttl_secs: u64) -> Self {
        Self { redis, ttl_secs }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub async fn save(&self, session_id: &str, result: &QuizResult) -> Result<(), CommonError> {
        self.redis
            .try_set_json_with_ttl(&result_key(session_id), result, self.ttl_secs)
            .await
    }

    pub async fn load(&self, session_id: &str) -> Option<QuizResult> {
        self.redis.get_json(&result_key(session_id)).await
    }

    pub async fn clear(&self, session_id: &str) -> bool {
        self.redis.delete(&result_key(session_id)).await
    }
}

fn result_key(session_id: &str) -> String {
    format!("{KEY_PREFIX}result:{session_id}")
}

/// A fresh 32 hex character session id.
pub fn new_session_id() -> SessionId {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0));
    let counter = SESSION_COUNTER.fetch_add(1, Ordering::Relaxed);
    let pid = std::process::id();

    let mut h = Sha256::new();
    h.update(now.as_nanos().to_le_bytes());
    h.update(pid.to_le_bytes());
    h.update(counter.to_le_bytes());
    let digest = h.finalize();
    digest[..16].iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use quiz_engine::score_selections;

    use super::*;

    #[test]
    fn session_ids_are_unique_hex() {
        let a = new_session_id();
        let b = new_session_id();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(a, b);
    }

    #[test]
    fn keys_are_namespaced() {
        assert_eq!(result_key("abc"), "happytails:quiz:v1:result:abc");
    }

    #[tokio::test]
    async fn store_without_redis_reports_unavailable() {
        let store = ResultStore::new(RedisCache::disabled(), DEFAULT_RESULT_TTL_SECS);
        let result = score_selections(
            [
                ("q1", "home"),
                ("q2", "30"),
                ("q3", "shared"),
                ("q4", "minimalCare"),
                ("q5", "low"),
            ],
            chrono::Utc::now(),
        )
        .unwrap();

        assert!(matches!(
            store.save("s1", &result).await,
            Err(CommonError::RedisUnavailable)
        ));
        assert!(store.load("s1").await.is_none());
        assert!(!store.clear("s1").await);
        assert_eq!(store.ttl(), Duration::from_secs(86_400));
    }
}
