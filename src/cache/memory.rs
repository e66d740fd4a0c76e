//! In-process board cache.
//!
//! Fallback backend when no Redis is configured, and the backend the tests
//! run against. Honors TTLs with the same semantics as the Redis cache:
//! an expired entry is a miss, not an error.

use super::{BoardCache, CacheError};
use crate::models::Board;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry {
    payload: String,
    expires_at: Instant,
}

#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject a raw JSON payload, bypassing serialization. Lets tests stage
    /// exactly what an external writer might have cached.
    #[cfg(test)]
    pub fn insert_raw(&self, key: &str, payload: &str, ttl: Duration) {
        self.entries.lock().unwrap().insert(
            key.to_string(),
            Entry {
                payload: payload.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
    }
}

#[async_trait]
impl BoardCache for MemoryCache {
    async fn get_board(&self, key: &str) -> Result<Option<Board>, CacheError> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                Ok(Some(serde_json::from_str(&entry.payload)?))
            }
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_board(&self, key: &str, board: &Board, ttl: Duration) -> Result<(), CacheError> {
        let payload = serde_json::to_string(board)?;
        self.entries.lock().unwrap().insert(
            key.to_string(),
            Entry {
                payload,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }
}
