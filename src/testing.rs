// src/testing.rs
//! In-memory test doubles for the cache and resolver seams.

use crate::cache::ContactCache;
use crate::ens_client::NameResolver;
use crate::error::{LookupError, Result};
use crate::lookup::{CachedContact, LookupRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory [`ContactCache`] with inspectable entries and write counts.
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, (CachedContact, u64)>>>,
    writes: Arc<AtomicUsize>,
    fail_reads: bool,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache whose reads fail, for exercising the unexpected-error path.
    pub fn unreachable() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    /// The stored contact and TTL for `name`, if present.
    pub fn entry(&self, name: &str) -> Option<(CachedContact, u64)> {
        self.entries.lock().unwrap().get(name).cloned()
    }

    /// How many times an entry has been written.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry, standing in for TTL expiry.
    pub fn expire_all(&self) {
        self.entries.lock().unwrap().clear();
    }
}

#[async_trait]
impl ContactCache for MemoryCache {
    async fn get(&self, name: &str) -> Result<Option<CachedContact>> {
        if self.fail_reads {
            return Err(LookupError::CacheError("cache unreachable".to_string()));
        }
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(name)
            .map(|(contact, _)| contact.clone()))
    }

    async fn set_with_ttl(&self, name: &str, contact: &CachedContact, ttl_secs: u64) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .insert(name.to_string(), (contact.clone(), ttl_secs));
        Ok(())
    }
}

/// What a [`ScriptedResolver`] reports for every name it is asked about.
#[derive(Clone)]
pub enum ResolveOutcome {
    Found { phone: String, address: String },
    NoResolver,
    NoPhone { address: String },
    Unreachable,
}

/// Scripted [`NameResolver`] that counts how often it is consulted.
#[derive(Clone)]
pub struct ScriptedResolver {
    outcome: ResolveOutcome,
    calls: Arc<AtomicUsize>,
}

impl ScriptedResolver {
    pub fn new(outcome: ResolveOutcome) -> Self {
        Self {
            outcome,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn found(phone: &str, address: &str) -> Self {
        Self::new(ResolveOutcome::Found {
            phone: phone.to_string(),
            address: address.to_string(),
        })
    }

    pub fn no_resolver() -> Self {
        Self::new(ResolveOutcome::NoResolver)
    }

    pub fn no_phone(address: &str) -> Self {
        Self::new(ResolveOutcome::NoPhone {
            address: address.to_string(),
        })
    }

    pub fn unreachable() -> Self {
        Self::new(ResolveOutcome::Unreachable)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NameResolver for ScriptedResolver {
    async fn resolve(&self, name: &str) -> Result<LookupRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            ResolveOutcome::Found { phone, address } => Ok(LookupRecord {
                name: name.to_string(),
                phone: phone.clone(),
                address: address.clone(),
            }),
            ResolveOutcome::NoResolver => Err(LookupError::NameNotFound {
                name: name.to_string(),
            }),
            ResolveOutcome::NoPhone { address } => Err(LookupError::ContactNotFound {
                name: name.to_string(),
                address: address.clone(),
            }),
            ResolveOutcome::Unreachable => Err(LookupError::RpcError(
                "rpc endpoint unreachable".to_string(),
            )),
        }
    }
}
