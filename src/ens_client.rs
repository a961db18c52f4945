// src/ens_client.rs
//! ENS resolution client over an Alchemy mainnet JSON-RPC endpoint.
//!
//! Wraps the `ethers` provider middleware so the resolution protocol itself
//! (registry calls, resolver dispatch) stays opaque to the rest of the crate.

use crate::error::{LookupError, Result};
use crate::lookup::LookupRecord;
use async_trait::async_trait;
use ethers::providers::{Http, Middleware, Provider, ProviderError};
use ethers::utils::to_checksum;
use log::{debug, info};

const ETH_API_SERVER: &str = "https://eth-mainnet.alchemyapi.io/v2";

/// ENS text record key holding the phone contact.
const PHONE_TEXT_FIELD: &str = "phone";

/// Upstream resolution seam for the lookup coordinator.
#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Resolve `name` to its address and phone contact.
    async fn resolve(&self, name: &str) -> Result<LookupRecord>;
}

/// Configuration for the ENS client
#[derive(Debug, Clone)]
pub struct EnsConfig {
    pub api_token: String,
}

impl EnsConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
        }
    }

    /// Full JSON-RPC endpoint URL for the configured token.
    pub fn endpoint(&self) -> String {
        format!("{}/{}", ETH_API_SERVER, self.api_token)
    }
}

/// ENS resolution client backed by an HTTP JSON-RPC provider.
#[derive(Debug, Clone)]
pub struct EnsClient {
    provider: Provider<Http>,
    config: EnsConfig,
}

impl EnsClient {
    pub fn new(config: EnsConfig) -> Result<Self> {
        info!("Initializing ENS JSON-RPC provider");
        let provider = Provider::<Http>::try_from(config.endpoint())
            .map_err(|e| LookupError::ConfigError(format!("Invalid ENS endpoint URL: {}", e)))?;
        Ok(Self { provider, config })
    }

    pub fn config(&self) -> &EnsConfig {
        &self.config
    }
}

#[async_trait]
impl NameResolver for EnsClient {
    async fn resolve(&self, name: &str) -> Result<LookupRecord> {
        debug!("Resolving ENS name '{}' upstream", name);

        // Both sub-queries go out together; the phone-presence rule is only
        // applied once both have completed.
        let (address, phone) = tokio::join!(
            self.provider.resolve_name(name),
            self.provider.resolve_field(name, PHONE_TEXT_FIELD),
        );

        let address = match address {
            Ok(addr) => to_checksum(&addr, None),
            Err(e) if resolver_missing(&e) => {
                return Err(LookupError::NameNotFound {
                    name: name.to_string(),
                })
            }
            Err(e) => {
                return Err(LookupError::RpcError(format!(
                    "address lookup for '{}': {}",
                    name, e
                )))
            }
        };

        let phone = match phone {
            Ok(phone) => phone,
            // Same resolver backs both queries, so a missing-resolver error
            // here reduces to an absent text record.
            Err(e) if resolver_missing(&e) => String::new(),
            Err(e) => {
                return Err(LookupError::RpcError(format!(
                    "phone record lookup for '{}': {}",
                    name, e
                )))
            }
        };

        contact_from_parts(name, address, phone)
    }
}

/// Applies the phone-presence rule once both sub-queries have settled.
fn contact_from_parts(name: &str, address: String, phone: String) -> Result<LookupRecord> {
    if phone.is_empty() {
        return Err(LookupError::ContactNotFound {
            name: name.to_string(),
            address,
        });
    }
    Ok(LookupRecord {
        name: name.to_string(),
        phone,
        address,
    })
}

/// `ethers` signals "no resolver bound to this name" as an ENS-level error,
/// distinct from transport failures.
fn resolver_missing(err: &ProviderError) -> bool {
    matches!(err, ProviderError::EnsError(_))
}
