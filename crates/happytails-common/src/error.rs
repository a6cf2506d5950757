/// Error types for the shared infrastructure crate.
///
/// These cover storage and serialization failures underneath the quiz flow.
/// Callers match on `RedisUnavailable` to tell a missing backend from a failing one.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("redis unavailable, quiz results are not persisted")]
    RedisUnavailable,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
