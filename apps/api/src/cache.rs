//! Profile cache keyed by the SHA-256 of the extracted CV text.
//!
//! `AppState` holds an `Arc<dyn ProfileCache>`: Redis when `REDIS_URL` is set,
//! otherwise an in-process map. Only AI-produced profiles are stored.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::extraction::ParsedProfile;

const KEY_PREFIX: &str = "cv:profile:";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Cache serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Hex SHA-256 of the text; identical text always maps to the same key.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[async_trait]
pub trait ProfileCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<ParsedProfile>, CacheError>;
    async fn put(&self, key: &str, profile: &ParsedProfile) -> Result<(), CacheError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Redis
// ────────────────────────────────────────────────────────────────────────────

pub struct RedisProfileCache {
    client: redis::Client,
    ttl: Duration,
}

impl RedisProfileCache {
    pub fn new(client: redis::Client, ttl: Duration) -> Self {
        Self { client, ttl }
    }

    fn key(hash: &str) -> String {
        format!("{KEY_PREFIX}{hash}")
    }
}

#[async_trait]
impl ProfileCache for RedisProfileCache {
    async fn get(&self, key: &str) -> Result<Option<ParsedProfile>, CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = redis::cmd("GET")
            .arg(Self::key(key))
            .query_async(&mut conn)
            .await?;
        raw.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(CacheError::from)
    }

    async fn put(&self, key: &str, profile: &ParsedProfile) -> Result<(), CacheError> {
        let json = serde_json::to_string(profile)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("SET")
            .arg(Self::key(key))
            .arg(json)
            .arg("EX")
            .arg(self.ttl.as_secs().max(1))
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-process
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedProfile {
    profile: ParsedProfile,
    cached_at: DateTime<Utc>,
}

/// Map-backed cache for single-instance deployments and tests.
/// Expired entries are dropped on every read and write.
pub struct MemoryProfileCache {
    entries: RwLock<HashMap<String, CachedProfile>>,
    ttl: Duration,
}

impl MemoryProfileCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn is_fresh(&self, entry: &CachedProfile, now: DateTime<Utc>) -> bool {
        // A negative age (clock moved backwards) counts as fresh.
        (now - entry.cached_at)
            .to_std()
            .map_or(true, |age| age <= self.ttl)
    }
}

#[async_trait]
impl ProfileCache for MemoryProfileCache {
    async fn get(&self, key: &str) -> Result<Option<ParsedProfile>, CacheError> {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| self.is_fresh(entry, now));
        Ok(entries.get(key).map(|entry| entry.profile.clone()))
    }

    async fn put(&self, key: &str, profile: &ParsedProfile) -> Result<(), CacheError> {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| self.is_fresh(entry, now));
        entries.insert(
            key.to_string(),
            CachedProfile {
                profile: profile.clone(),
                cached_at: now,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_is_stable_hex() {
        let a = content_hash("John Smith");
        assert_eq!(a, content_hash("John Smith"));
        assert_ne!(a, content_hash("John Smith "));
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_redis_key_prefix() {
        assert_eq!(RedisProfileCache::key("abc"), "cv:profile:abc");
    }

    #[tokio::test]
    async fn test_memory_cache_round_trip() {
        let cache = MemoryProfileCache::new(Duration::from_secs(60));
        let mut profile = ParsedProfile::undetected();
        profile.name = "Ada Lovelace".to_string();

        assert!(cache.get("k").await.unwrap().is_none());
        cache.put("k", &profile).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some(profile));
    }

    #[tokio::test]
    async fn test_memory_cache_expiry() {
        let cache = MemoryProfileCache::new(Duration::ZERO);
        cache.put("k", &ParsedProfile::undetected()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(cache.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_cache_read_drops_expired_entries() {
        let cache = MemoryProfileCache::new(Duration::ZERO);
        cache.put("a", &ParsedProfile::undetected()).await.unwrap();
        cache.put("b", &ParsedProfile::undetected()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert!(cache.get("other").await.unwrap().is_none());
        assert!(cache.entries.read().await.is_empty());
    }
}
