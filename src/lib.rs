pub mod cache;
pub mod config;
pub mod ens_client;
pub mod error;
pub mod lookup;
pub mod server;
pub mod testing; // In-memory doubles for the cache/resolver seams
pub mod utils;

// Re-export the lookup pipeline for easy access
pub use cache::{ContactCache, RedisCache};
pub use ens_client::{EnsClient, EnsConfig, NameResolver};
pub use error::{LookupError, Result};
pub use lookup::{CachedContact, LookupRecord, LookupService};
pub use server::LookupServer;

// Re-export the test doubles for integration tests
pub use testing::{MemoryCache, ResolveOutcome, ScriptedResolver};
