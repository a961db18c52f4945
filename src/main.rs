// src/main.rs
use ens_lookup_api::{
    cache::RedisCache,
    config,
    ens_client::{EnsClient, EnsConfig},
    error::LookupError,
    lookup::LookupService,
    server::LookupServer,
    utils::setup_logging,
};
use log::info;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), LookupError> {
    setup_logging().expect("Failed to initialize logging");
    info!("ENS lookup service starting...");

    // --- Configuration & Initialization ---
    let app_config = config::load_config()?;

    let redis_cache = RedisCache::new(&app_config.redis_url).await?;
    let ens_client = EnsClient::new(EnsConfig::new(app_config.ether_token.clone()))?;

    let service = Arc::new(LookupService::new(
        redis_cache,
        ens_client,
        app_config.cache_expiration_minutes,
    ));

    let server = LookupServer::new(app_config.server_port, service);
    server
        .start()
        .await
        .map_err(|e| LookupError::Unknown(format!("Server failed: {}", e)))?;

    Ok(())
}
