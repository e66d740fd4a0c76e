//! Redis-backed board cache.

use super::{BoardCache, CacheError};
use crate::models::Board;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;

/// Board cache over a shared Redis connection manager (auto-reconnecting,
/// cheap to clone per operation).
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client =
            redis::Client::open(url).map_err(|e| CacheError::Connection(e.to_string()))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl BoardCache for RedisCache {
    async fn get_board(&self, key: &str) -> Result<Option<Board>, CacheError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(key).await?;
        match raw {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    async fn set_board(&self, key: &str, board: &Board, ttl: Duration) -> Result<(), CacheError> {
        let payload = serde_json::to_string(board)?;
        let mut conn = self.conn.clone();
        // SET EX takes whole seconds; never pass zero or the key would live
        // forever.
        let ttl_secs = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key, payload, ttl_secs).await?;
        Ok(())
    }
}
