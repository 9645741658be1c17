//! HTTP adapters - REST API implementations.
//!
//! [`app_router`] assembles the billing and health routes with the shared
//! middleware stack.

pub mod billing;
pub mod health;

use std::time::Duration;

use http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

// Re-export key types for convenience
pub use billing::billing_router;
pub use billing::BillingAppState;

/// Build the full application router.
///
/// Requests pass through tracing, then the request timeout, then CORS.
pub fn app_router(state: BillingAppState, server: &ServerConfig) -> Router {
    Router::new()
        .merge(billing_router())
        .merge(health::health_routes())
        .with_state(state)
        .layer(cors_layer(server))
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
}

/// CORS for the storefront.
///
/// With no configured origins any origin is allowed, matching a storefront
/// served from a separate static host during development.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}
