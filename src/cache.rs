// src/cache.rs
//! Redis-backed cache adapter for resolved contact records.

use crate::error::{LookupError, Result};
use crate::lookup::CachedContact;
use anyhow::{anyhow, Result as AnyhowResult};
use async_trait::async_trait;
use log::{debug, error, info, warn};
use redis::{aio::ConnectionManager, AsyncCommands};
use std::fmt;

/// Store seam the lookup coordinator is generic over.
///
/// The production implementation is [`RedisCache`]; tests drive the
/// coordinator through an in-memory implementation instead.
#[async_trait]
pub trait ContactCache: Send + Sync {
    /// Fetch the cached contact for `name`, `None` on a miss.
    async fn get(&self, name: &str) -> Result<Option<CachedContact>>;

    /// Persist the contact under `name`, expiring after `ttl_secs`.
    async fn set_with_ttl(&self, name: &str, contact: &CachedContact, ttl_secs: u64) -> Result<()>;
}

/// A shared Redis cache client.
/// Uses a `ConnectionManager` for automatic reconnection and resilience.
#[derive(Clone)]
pub struct RedisCache {
    conn_manager: ConnectionManager,
    redis_url: String, // Store for debug purposes
}

// Manual Debug implementation, the manager itself is not Debug
impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("redis_url", &self.redis_url)
            .field("conn_manager", &"<ConnectionManager instance>")
            .finish()
    }
}

impl RedisCache {
    pub async fn new(redis_url: &str) -> AnyhowResult<Self> {
        info!("Initializing Redis connection manager for URL: {}", redis_url);
        let client = redis::Client::open(redis_url)?;
        let conn_manager = ConnectionManager::new(client).await.map_err(|e| {
            error!("Failed to create Redis ConnectionManager: {}", e);
            anyhow!("Failed to create Redis ConnectionManager: {}", e)
        })?;
        info!("Redis ConnectionManager initialized successfully");
        Ok(Self {
            conn_manager,
            redis_url: redis_url.to_string(),
        })
    }
}

/// Decodes a stored entry. An undecodable payload counts as a miss so the
/// next resolution overwrites it instead of wedging the name until expiry.
fn decode_entry(name: &str, raw: &str) -> Option<CachedContact> {
    match serde_json::from_str::<CachedContact>(raw) {
        Ok(contact) => Some(contact),
        Err(e) => {
            warn!(
                "Discarding undecodable cache entry for key {}: {}. Data: '{}'",
                name, e, raw
            );
            None
        }
    }
}

#[async_trait]
impl ContactCache for RedisCache {
    async fn get(&self, name: &str) -> Result<Option<CachedContact>> {
        debug!("Attempting to GET cache for key: {}", name);

        let mut conn = self.conn_manager.clone();
        match conn.get::<_, Option<String>>(name).await {
            Ok(Some(raw)) => {
                debug!("Cache HIT for key: {}", name);
                Ok(decode_entry(name, &raw))
            }
            Ok(None) => {
                debug!("Cache MISS for key: {}", name);
                Ok(None)
            }
            Err(e) => {
                error!("Redis GET error for key {}: {}", name, e);
                Err(LookupError::CacheError(format!(
                    "Redis GET error for key {}: {}",
                    name, e
                )))
            }
        }
    }

    async fn set_with_ttl(&self, name: &str, contact: &CachedContact, ttl_secs: u64) -> Result<()> {
        let raw = serde_json::to_string(contact)?;
        let mut conn = self.conn_manager.clone();

        match conn.set_ex::<_, _, ()>(name, raw, ttl_secs).await {
            Ok(_) => {
                debug!("Cache SETEX success for key: {} with TTL: {}s", name, ttl_secs);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to SETEX key '{}' in Redis: {}", name, e);
                Err(LookupError::CacheError(format!(
                    "Redis SETEX error for key {}: {}",
                    name, e
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_well_formed_entry() {
        let contact =
            decode_entry("alice.eth", r#"{"phone":"+15551234567","address":"0xABC"}"#).unwrap();
        assert_eq!(
            contact,
            CachedContact {
                phone: "+15551234567".to_string(),
                address: "0xABC".to_string(),
            }
        );
    }

    #[test]
    fn undecodable_entry_counts_as_miss() {
        assert!(decode_entry("alice.eth", "not json at all").is_none());
        assert!(decode_entry("alice.eth", r#"{"phone":42,"address":"0xABC"}"#).is_none());
        assert!(decode_entry("alice.eth", r#"{"phone":"+15551234567"}"#).is_none());
    }
}
