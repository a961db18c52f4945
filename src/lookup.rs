// src/lookup.rs
//! Read-through lookup coordination: trust the cache while an entry lives,
//! resolve upstream on a miss, populate with a bounded expiration.

use crate::cache::ContactCache;
use crate::ens_client::NameResolver;
use crate::error::Result;
use log::{debug, info};
use serde::{Deserialize, Serialize};

const SECONDS_PER_MINUTE: u64 = 60;

/// A fully resolved lookup: the queried name plus its on-chain contact data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRecord {
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// Persisted form of a [`LookupRecord`]; the cache key carries the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedContact {
    pub phone: String,
    pub address: String,
}

impl CachedContact {
    /// Rejoins a cached entry with the key it was stored under.
    pub fn into_record(self, name: &str) -> LookupRecord {
        LookupRecord {
            name: name.to_string(),
            phone: self.phone,
            address: self.address,
        }
    }
}

impl From<&LookupRecord> for CachedContact {
    fn from(record: &LookupRecord) -> Self {
        Self {
            phone: record.phone.clone(),
            address: record.address.clone(),
        }
    }
}

/// Coordinates the cache and the resolver behind a single lookup operation.
pub struct LookupService<C, R> {
    cache: C,
    resolver: R,
    ttl_secs: u64,
}

impl<C: ContactCache, R: NameResolver> LookupService<C, R> {
    /// The expiration window is configured in minutes and applied in seconds
    /// on every cache write.
    pub fn new(cache: C, resolver: R, expiration_minutes: u64) -> Self {
        Self {
            cache,
            resolver,
            ttl_secs: expiration_minutes * SECONDS_PER_MINUTE,
        }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Resolve `name` through the cache.
    ///
    /// A hit is returned as-is without refreshing its expiration, keeping
    /// staleness bounded to a fixed window from time-of-resolution. On a miss
    /// the record comes from the resolver and is persisted for the configured
    /// window; resolution failures propagate untouched and are never cached.
    pub async fn get_url(&self, name: &str) -> Result<LookupRecord> {
        if let Some(contact) = self.cache.get(name).await? {
            debug!("Serving '{}' from cache", name);
            return Ok(contact.into_record(name));
        }

        let record = self.resolver.resolve(name).await?;
        self.cache
            .set_with_ttl(name, &CachedContact::from(&record), self.ttl_secs)
            .await?;
        info!("Resolved '{}' upstream, cached for {}s", name, self.ttl_secs);

        Ok(record)
    }
}
