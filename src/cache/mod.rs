//! Board cache.
//!
//! Cache-aside wrapper storage for board snapshots: Redis in production, an
//! in-process map when no Redis is configured. Values are JSON strings so
//! both backends round-trip identically. A miss is `Ok(None)`; only real
//! backend failures are errors, so callers can tell staleness from outage.

pub mod keys;
pub mod memory;
pub mod redis_client;

pub use memory::MemoryCache;
pub use redis_client::RedisCache;

use crate::models::Board;
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    Connection(String),

    #[error("cache operation failed: {0}")]
    Operation(String),

    #[error("cache serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Operation(err.to_string())
    }
}

/// Short-lived board snapshot storage.
#[async_trait]
pub trait BoardCache: Send + Sync {
    /// Cached snapshot under `key`, or `None` on a miss (including expiry).
    async fn get_board(&self, key: &str) -> Result<Option<Board>, CacheError>;

    /// Store a snapshot under `key` for `ttl`.
    async fn set_board(&self, key: &str, board: &Board, ttl: Duration) -> Result<(), CacheError>;
}
