//! HTTP handlers for billing endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::application::{
    CheckoutError, CreateCheckoutCommand, CreateCheckoutHandler, FulfillPurchaseHandler,
    HandleWebhookCommand, HandleWebhookHandler, ListPricesHandler, ListPricesQuery,
};
use crate::domain::licensing::TierMap;
use crate::domain::webhook::{StripeWebhookVerifier, WebhookError};
use crate::ports::{FulfillmentSink, PaymentError, PaymentErrorCode, PaymentProvider};

use super::dto::{
    CheckoutSessionResponse, CreateCheckoutSessionRequest, ErrorResponse, PricesResponse,
    WebhookResponse,
};

/// Header Stripe puts the webhook signature in.
pub const STRIPE_SIGNATURE_HEADER: &str = "Stripe-Signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned for each request; every dependency is behind an `Arc`.
#[derive(Clone)]
pub struct BillingAppState {
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub fulfillment_sink: Arc<dyn FulfillmentSink>,
    /// `None` when no signing secret is configured; webhooks are then refused.
    pub webhook_verifier: Option<Arc<StripeWebhookVerifier>>,
    pub tier_map: Arc<TierMap>,
    /// Storefront base URL for checkout redirects.
    pub public_domain: String,
    pub publishable_key: Option<String>,
}

impl BillingAppState {
    /// Create handlers on demand from the shared state.
    pub fn list_prices_handler(&self) -> ListPricesHandler {
        ListPricesHandler::new(self.payment_provider.clone())
    }

    pub fn create_checkout_handler(&self) -> CreateCheckoutHandler {
        CreateCheckoutHandler::new(self.payment_provider.clone(), self.public_domain.clone())
    }

    pub fn webhook_handler(&self) -> HandleWebhookHandler {
        let fulfill = FulfillPurchaseHandler::new(
            self.payment_provider.clone(),
            self.fulfillment_sink.clone(),
            self.tier_map.clone(),
        );
        HandleWebhookHandler::new(self.webhook_verifier.clone(), fulfill)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Catalog
// ════════════════════════════════════════════════════════════════════════════════

/// GET /prices - List the active catalog
pub async fn list_prices(
    State(state): State<BillingAppState>,
) -> Result<impl IntoResponse, BillingApiError> {
    let prices = state
        .list_prices_handler()
        .handle(ListPricesQuery::default())
        .await?;

    Ok(Json(PricesResponse {
        publishable_key: state.publishable_key.clone(),
        prices: prices.into_iter().map(Into::into).collect(),
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Checkout
// ════════════════════════════════════════════════════════════════════════════════

/// POST /create-checkout-session - Start a hosted checkout
pub async fn create_checkout_session(
    State(state): State<BillingAppState>,
    request: Result<Json<CreateCheckoutSessionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, BillingApiError> {
    let Json(request) = request.map_err(|e| BillingApiError::InvalidRequest(e.body_text()))?;

    let cmd = CreateCheckoutCommand {
        price_id: request.price_id,
        quantity: request.quantity,
    };
    let session = state.create_checkout_handler().handle(cmd).await?;

    tracing::info!(session_id = %session.id, "Checkout session created");
    Ok(Json(CheckoutSessionResponse::from(session)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Webhook
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhook - Handle Stripe webhooks
///
/// The body is taken as raw bytes; the signature covers them verbatim.
pub async fn handle_stripe_webhook(
    State(state): State<BillingAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, BillingApiError> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = HandleWebhookCommand {
        payload: body.to_vec(),
        signature,
    };

    let result = state.webhook_handler().handle(cmd).await?;

    Ok((StatusCode::OK, Json(WebhookResponse::from(result))))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts application errors to HTTP responses.
#[derive(Debug)]
pub enum BillingApiError {
    /// Request body could not be decoded.
    InvalidRequest(String),
    Checkout(CheckoutError),
    Payment(PaymentError),
    Webhook(WebhookError),
}

impl From<CheckoutError> for BillingApiError {
    fn from(err: CheckoutError) -> Self {
        Self::Checkout(err)
    }
}

impl From<PaymentError> for BillingApiError {
    fn from(err: PaymentError) -> Self {
        Self::Payment(err)
    }
}

impl From<WebhookError> for BillingApiError {
    fn from(err: WebhookError) -> Self {
        Self::Webhook(err)
    }
}

/// Status and code for a failed provider call.
///
/// Transient failures are 502 so callers know to retry. A rejected API key
/// is our misconfiguration, not the caller's.
fn payment_error_status(err: &PaymentError) -> (StatusCode, &'static str) {
    if err.retryable {
        return (StatusCode::BAD_GATEWAY, "PROVIDER_UNAVAILABLE");
    }
    match err.code {
        PaymentErrorCode::AuthenticationError => {
            (StatusCode::INTERNAL_SERVER_ERROR, "PROVIDER_MISCONFIGURED")
        }
        PaymentErrorCode::NotFound => (StatusCode::BAD_REQUEST, "PRICE_NOT_FOUND"),
        _ => (StatusCode::BAD_REQUEST, "PROVIDER_REJECTED"),
    }
}

impl IntoResponse for BillingApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code, message) = match &self {
            BillingApiError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone())
            }
            BillingApiError::Checkout(CheckoutError::InvalidPriceId) => {
                (StatusCode::BAD_REQUEST, "INVALID_PRICE_ID", self.message())
            }
            BillingApiError::Checkout(CheckoutError::InvalidQuantity) => {
                (StatusCode::BAD_REQUEST, "INVALID_QUANTITY", self.message())
            }
            BillingApiError::Checkout(CheckoutError::Provider(err))
            | BillingApiError::Payment(err) => {
                let (status, code) = payment_error_status(err);
                (status, code, err.message.clone())
            }
            BillingApiError::Webhook(err) => (err.status_code(), err.error_code(), err.to_string()),
        };

        if status.is_server_error() {
            tracing::error!(status = %status, error_code, error = %message, "Request failed");
        } else {
            tracing::warn!(status = %status, error_code, error = %message, "Request rejected");
        }

        let body = ErrorResponse::new(error_code, message);
        (status, Json(body)).into_response()
    }
}

impl BillingApiError {
    fn message(&self) -> String {
        match self {
            BillingApiError::InvalidRequest(msg) => msg.clone(),
            BillingApiError::Checkout(err) => err.to_string(),
            BillingApiError::Payment(err) => err.message.clone(),
            BillingApiError::Webhook(err) => err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::licensing::{InMemoryLicenseLedger, LedgerFulfillmentSink};
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::domain::licensing::LicenseTier;
    use crate::ports::{CheckoutSession, LicenseLedger, Price};
    use chrono::Utc;
    use serde_json::json;

    const SECRET: &str = "whsec_http_handler";

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn state_with(
        provider: MockPaymentProvider,
        verifier: Option<StripeWebhookVerifier>,
    ) -> (BillingAppState, Arc<InMemoryLicenseLedger>) {
        let ledger = Arc::new(InMemoryLicenseLedger::new());
        let state = BillingAppState {
            payment_provider: Arc::new(provider),
            fulfillment_sink: Arc::new(LedgerFulfillmentSink::new(ledger.clone())),
            webhook_verifier: verifier.map(Arc::new),
            tier_map: Arc::new(TierMap::new().with_price("price_pro", LicenseTier::Pro)),
            public_domain: "https://shop.example.com".to_string(),
            publishable_key: Some("pk_test_123".to_string()),
        };
        (state, ledger)
    }

    fn one_time_price(id: &str) -> Price {
        Price {
            id: id.to_string(),
            nickname: None,
            unit_amount: Some(1900),
            currency: "usd".to_string(),
            active: true,
            recurring: None,
            product: None,
        }
    }

    fn signed_headers(payload: &[u8]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let value = StripeWebhookVerifier::new(SECRET)
            .signature_header(Utc::now().timestamp(), payload)
            .unwrap();
        headers.insert(STRIPE_SIGNATURE_HEADER, value.parse().unwrap());
        headers
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Catalog
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn list_prices_includes_publishable_key() {
        let provider = MockPaymentProvider::new();
        provider.add_price(one_time_price("price_pro"));
        let (state, _) = state_with(provider, None);

        let response = list_prices(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["publishable_key"], "pk_test_123");
        assert_eq!(json["prices"][0]["id"], "price_pro");
    }

    #[tokio::test]
    async fn list_prices_maps_network_failure_to_bad_gateway() {
        let provider = MockPaymentProvider::new();
        provider.set_error(PaymentError::network("connection reset"));
        let (state, _) = state_with(provider, None);

        let response = list_prices(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["error_code"], "PROVIDER_UNAVAILABLE");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Checkout
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn create_checkout_returns_session_url() {
        let provider = MockPaymentProvider::new();
        provider.add_price(one_time_price("price_pro"));
        provider.set_checkout_session(CheckoutSession {
            id: "cs_test_1".to_string(),
            url: "https://checkout.stripe.com/c/cs_test_1".to_string(),
        });
        let (state, _) = state_with(provider, None);

        let request = CreateCheckoutSessionRequest {
            price_id: "price_pro".to_string(),
            quantity: 1,
        };
        let response = create_checkout_session(State(state), Ok(Json(request)))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["id"], "cs_test_1");
        assert_eq!(json["url"], "https://checkout.stripe.com/c/cs_test_1");
    }

    #[tokio::test]
    async fn create_checkout_with_unknown_price_is_client_error() {
        let (state, _) = state_with(MockPaymentProvider::new(), None);

        let request = CreateCheckoutSessionRequest {
            price_id: "price_missing".to_string(),
            quantity: 1,
        };
        let response = create_checkout_session(State(state), Ok(Json(request)))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error_code"], "PRICE_NOT_FOUND");
        assert!(json["message"].as_str().unwrap().contains("price_missing"));
    }

    #[tokio::test]
    async fn create_checkout_with_zero_quantity_is_rejected() {
        let (state, _) = state_with(MockPaymentProvider::new(), None);

        let request = CreateCheckoutSessionRequest {
            price_id: "price_pro".to_string(),
            quantity: 0,
        };
        let response = create_checkout_session(State(state), Ok(Json(request)))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error_code"], "INVALID_QUANTITY");
    }

    #[test]
    fn rejected_api_key_is_server_error() {
        let (status, code) = payment_error_status(&PaymentError::authentication("bad key"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "PROVIDER_MISCONFIGURED");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Webhook
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn webhook_issues_license_for_completed_checkout() {
        let (state, ledger) = state_with(
            MockPaymentProvider::new(),
            Some(StripeWebhookVerifier::new(SECRET)),
        );
        let payload = serde_json::to_vec(&json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": {"object": {
                "id": "cs_1",
                "customer_email": "a@example.com",
                "metadata": {"price": "price_pro"}
            }}
        }))
        .unwrap();

        let response = handle_stripe_webhook(
            State(state),
            signed_headers(&payload),
            Bytes::from(payload),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["tier"], "Pro");
        assert!(json["license"].as_str().unwrap().starts_with("ARPRO-"));
        assert_eq!(ledger.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn webhook_without_secret_is_service_unavailable() {
        let (state, _) = state_with(MockPaymentProvider::new(), None);
        let payload = b"{}".to_vec();

        let response = handle_stripe_webhook(
            State(state),
            signed_headers(&payload),
            Bytes::from(payload),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["error_code"], "WEBHOOK_NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn webhook_without_signature_header_is_bad_request() {
        let (state, _) = state_with(
            MockPaymentProvider::new(),
            Some(StripeWebhookVerifier::new(SECRET)),
        );

        let response =
            handle_stripe_webhook(State(state), HeaderMap::new(), Bytes::from_static(b"{}"))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error_code"], "MISSING_SIGNATURE");
    }
}
