//! Axum router configuration for billing endpoints.
//!
//! Paths match what the storefront and the Stripe dashboard are configured
//! with, so they sit at the root rather than under an `/api` prefix.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{create_checkout_session, handle_stripe_webhook, list_prices, BillingAppState};

/// Create the storefront router.
///
/// # Routes
/// - `GET /prices` - Active catalog with the publishable key
/// - `POST /create-checkout-session` - Start a hosted checkout
pub fn storefront_routes() -> Router<BillingAppState> {
    Router::new()
        .route("/prices", get(list_prices))
        .route("/create-checkout-session", post(create_checkout_session))
}

/// Create the Stripe webhook router.
///
/// Separate from the storefront routes because deliveries are authenticated
/// by signature, not by origin.
///
/// # Routes
/// - `POST /webhook` - Handle Stripe webhooks
pub fn webhook_routes() -> Router<BillingAppState> {
    Router::new().route("/webhook", post(handle_stripe_webhook))
}

/// Create the complete billing router.
///
/// # Example
///
/// ```ignore
/// let app = billing_router().with_state(state);
/// ```
pub fn billing_router() -> Router<BillingAppState> {
    Router::new()
        .merge(storefront_routes())
        .merge(webhook_routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::licensing::{InMemoryLicenseLedger, LedgerFulfillmentSink};
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::domain::licensing::TierMap;

    fn test_state() -> BillingAppState {
        BillingAppState {
            payment_provider: Arc::new(MockPaymentProvider::new()),
            fulfillment_sink: Arc::new(LedgerFulfillmentSink::new(Arc::new(
                InMemoryLicenseLedger::new(),
            ))),
            webhook_verifier: None,
            tier_map: Arc::new(TierMap::new()),
            public_domain: "http://localhost:4242".to_string(),
            publishable_key: None,
        }
    }

    #[tokio::test]
    async fn billing_router_mounts_prices() {
        let app = billing_router().with_state(test_state());

        let response = app
            .oneshot(Request::builder().uri("/prices").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn checkout_rejects_malformed_json() {
        let app = billing_router().with_state(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/create-checkout-session")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn webhook_only_accepts_post() {
        let app = billing_router().with_state(test_state());

        let response = app
            .oneshot(Request::builder().uri("/webhook").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
