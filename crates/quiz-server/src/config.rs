use happytails_common::result_store::DEFAULT_RESULT_TTL_SECS;

use crate::error::AppError;

/// Server configuration loaded from environment variables.
///
/// Nothing is required. Without `REDIS_URL` completed results live only in
/// process memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Redis connection URL (e.g. "redis://127.0.0.1:6379"). `None` disables persistence.
    pub redis_url: Option<String>,
    /// How long a completed result stays retrievable.
    pub result_ttl_secs: u64,
    /// Serve MCP over TCP on this address instead of stdio.
    pub tcp_listen_addr: Option<String>,
}

impl Config {
    /// Optional:
    /// - `REDIS_URL`
    /// - `QUIZ_RESULT_TTL_SECS` (default: 86400, must be > 0)
    /// - `MCP_TCP_LISTEN_ADDR`
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let result_ttl_secs = match lookup("QUIZ_RESULT_TTL_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| {
                    AppError::Config(format!(
                        "QUIZ_RESULT_TTL_SECS must be a positive integer, got '{raw}'"
                    ))
                })?,
            None => DEFAULT_RESULT_TTL_SECS,
        };

        Ok(Self {
            redis_url: lookup("REDIS_URL").filter(|s| !s.trim().is_empty()),
            result_ttl_secs,
            tcp_listen_addr: lookup("MCP_TCP_LISTEN_ADDR").filter(|s| !s.trim().is_empty()),
        })
    }
}
