// src/server.rs
//! HTTP boundary: validates the inbound name and maps lookup outcomes to
//! status codes.

use crate::cache::ContactCache;
use crate::ens_client::NameResolver;
use crate::error::LookupError;
use crate::lookup::{LookupRecord, LookupService};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use log::{error, info};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Lookup server state
pub struct LookupState<C, R> {
    pub service: Arc<LookupService<C, R>>,
}

impl<C, R> Clone for LookupState<C, R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// Query parameters accepted by the lookup endpoint. `name` stays optional
/// here so its absence renders the documented 400 body instead of the
/// extractor's rejection.
#[derive(Debug, Deserialize)]
pub struct LookupParams {
    pub name: Option<String>,
}

/// HTTP server exposing the lookup endpoint
pub struct LookupServer<C, R> {
    port: u16,
    state: LookupState<C, R>,
}

impl<C, R> LookupServer<C, R>
where
    C: ContactCache + 'static,
    R: NameResolver + 'static,
{
    /// Create a new lookup server
    pub fn new(port: u16, service: Arc<LookupService<C, R>>) -> Self {
        Self {
            port,
            state: LookupState { service },
        }
    }

    /// Start the server
    pub async fn start(self) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.create_router();

        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", self.port)).await?;

        info!("Lookup server starting on port {}", self.port);
        info!("Ready to serve ENS lookups at /eth-lookup");

        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Create the router with all endpoints
    fn create_router(&self) -> Router {
        Router::new()
            .route("/eth-lookup", get(handle_lookup::<C, R>))
            .route("/health", get(health_check))
            .with_state(self.state.clone())
    }
}

/// Main lookup handler
async fn handle_lookup<C, R>(
    State(state): State<LookupState<C, R>>,
    Query(params): Query<LookupParams>,
) -> (StatusCode, Json<Value>)
where
    C: ContactCache + 'static,
    R: NameResolver + 'static,
{
    let name = match params.name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "message": "Name was not provided. Name is a required query param.",
                    "name": "BadRequest",
                })),
            )
        }
    };

    match state.service.get_url(name).await {
        Ok(record) => (StatusCode::OK, Json(record_body(&record))),
        Err(err) => error_response(err),
    }
}

fn record_body(record: &LookupRecord) -> Value {
    json!({
        "name": record.name,
        "phone": record.phone,
        "address": record.address,
    })
}

/// Maps lookup failures onto the documented status/body pairs. Anything
/// outside the two expected not-found variants is logged server-side and
/// rendered as an opaque 500.
fn error_response(err: LookupError) -> (StatusCode, Json<Value>) {
    match err {
        LookupError::NameNotFound { .. } => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "name": "ENSNotFound",
                "address": null,
                "message": "ENS name was not found",
            })),
        ),
        LookupError::ContactNotFound { address, .. } => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "name": "PhoneNotFound",
                "address": address,
                "message": "ENS name did not have a phone number",
            })),
        ),
        other => {
            error!("Unexpected error: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "message": "Unexpected error occurred",
                    "name": "UnexpectedError",
                })),
            )
        }
    }
}

/// Health check endpoint
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "ens-lookup-api",
        "timestamp": chrono::Utc::now().timestamp(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryCache, ScriptedResolver};
    use axum::body::to_bytes;
    use axum::response::IntoResponse;
    use pretty_assertions::assert_eq;

    const PHONE: &str = "+15551234567";
    const ADDRESS: &str = "0xABC0000000000000000000000000000000000001";

    fn state_with(
        cache: MemoryCache,
        resolver: ScriptedResolver,
    ) -> LookupState<MemoryCache, ScriptedResolver> {
        LookupState {
            service: Arc::new(LookupService::new(cache, resolver, 5)),
        }
    }

    fn named(name: &str) -> Query<LookupParams> {
        Query(LookupParams {
            name: Some(name.to_string()),
        })
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_name_is_rejected_before_any_lookup() {
        let resolver = ScriptedResolver::found(PHONE, ADDRESS);
        let state = state_with(MemoryCache::new(), resolver.clone());

        let response = handle_lookup(State(state), Query(LookupParams { name: None }))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["name"], "BadRequest");
        assert_eq!(
            body["message"],
            "Name was not provided. Name is a required query param."
        );
        assert_eq!(resolver.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_name_is_rejected_too() {
        let resolver = ScriptedResolver::found(PHONE, ADDRESS);
        let state = state_with(MemoryCache::new(), resolver.clone());

        let response = handle_lookup(State(state), named("")).await.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resolver.call_count(), 0);
    }

    #[tokio::test]
    async fn successful_lookup_returns_the_record() {
        let state = state_with(MemoryCache::new(), ScriptedResolver::found(PHONE, ADDRESS));

        let response = handle_lookup(State(state), named("alice.eth"))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({ "name": "alice.eth", "phone": PHONE, "address": ADDRESS })
        );
    }

    #[tokio::test]
    async fn unregistered_name_maps_to_ens_not_found() {
        let state = state_with(MemoryCache::new(), ScriptedResolver::no_resolver());

        let response = handle_lookup(State(state), named("bob.eth"))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["name"], "ENSNotFound");
        assert!(body["address"].is_null());
        assert_eq!(body["message"], "ENS name was not found");
    }

    #[tokio::test]
    async fn missing_phone_maps_to_phone_not_found_with_address() {
        let state = state_with(MemoryCache::new(), ScriptedResolver::no_phone(ADDRESS));

        let response = handle_lookup(State(state), named("carol.eth"))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["name"], "PhoneNotFound");
        assert_eq!(body["address"], ADDRESS);
        assert_eq!(body["message"], "ENS name did not have a phone number");
    }

    #[tokio::test]
    async fn cache_failure_renders_an_opaque_500() {
        let state = state_with(
            MemoryCache::unreachable(),
            ScriptedResolver::found(PHONE, ADDRESS),
        );

        let response = handle_lookup(State(state), named("alice.eth"))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({ "message": "Unexpected error occurred", "name": "UnexpectedError" })
        );
    }

    #[tokio::test]
    async fn rpc_failure_renders_an_opaque_500() {
        let state = state_with(MemoryCache::new(), ScriptedResolver::unreachable());

        let response = handle_lookup(State(state), named("alice.eth"))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["name"], "UnexpectedError");
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let Json(body) = health_check().await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "ens-lookup-api");
    }

    #[tokio::test]
    async fn lookup_server_creation() {
        let service = Arc::new(LookupService::new(
            MemoryCache::new(),
            ScriptedResolver::found(PHONE, ADDRESS),
            5,
        ));
        let server = LookupServer::new(8080, service);
        assert_eq!(server.port, 8080);
    }
}
