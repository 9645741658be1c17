//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait over Stripe's REST API with
//! form-encoded requests and basic auth.
//!
//! Every request is bounded by the configured timeout. Network failures,
//! timeouts, 429 and 5xx responses are retried with exponential backoff;
//! nothing else is.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::from_payment_config(&app_config.payment);
//! let adapter = StripePaymentAdapter::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::config::PaymentConfig;
use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentErrorCode, PaymentProvider, Price,
    SessionLineItem,
};

use super::api_types::{
    StripeCheckoutSession, StripeErrorBody, StripeLineItem, StripeList, StripePrice,
};

/// Upper bound on catalog pages fetched by `list_prices`.
const MAX_PRICE_PAGES: usize = 10;

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Per-request timeout.
    timeout: Duration,

    /// Retries after the first attempt.
    max_retries: u32,

    /// First backoff delay; doubles on every retry.
    retry_backoff: Duration,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: "https://api.stripe.com".to_string(),
            timeout: Duration::from_secs(10),
            max_retries: 2,
            retry_backoff: Duration::from_secs(1),
        }
    }

    /// Build from the application's payment section.
    pub fn from_payment_config(config: &PaymentConfig) -> Self {
        Self {
            api_key: config.stripe_api_key.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
            max_retries: config.max_retries,
            retry_backoff: Duration::from_secs(1),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.api_base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the first retry delay.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Result<Self, PaymentError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    /// Runs a request, retrying transient failures.
    ///
    /// `build` is called once per attempt so every attempt sends the same
    /// request, including its idempotency key.
    async fn execute<T, F>(&self, operation: &'static str, build: F) -> Result<T, PaymentError>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        let mut retry_count: u32 = 0;

        loop {
            match self.send_once(build()).await {
                Ok(value) => return Ok(value),
                Err(err) if err.retryable && retry_count < self.config.max_retries => {
                    // Exponential backoff: 1x, 2x, 4x, ...
                    let delay = self.config.retry_backoff * (1u32 << retry_count);
                    tracing::warn!(
                        operation,
                        attempt = retry_count + 1,
                        error = %err,
                        delay_ms = delay.as_millis() as u64,
                        "Stripe request failed, retrying"
                    );
                    sleep(delay).await;
                    retry_count += 1;
                }
                Err(err) => {
                    tracing::error!(operation, error = %err, "Stripe request failed");
                    return Err(err);
                }
            }
        }
    }

    async fn send_once<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, PaymentError> {
        let response = request
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PaymentError::timeout(format!(
                        "Stripe did not respond within {}s",
                        self.config.timeout.as_secs_f32()
                    ))
                } else {
                    PaymentError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(error_from_response(status, &error_text));
        }

        response.json().await.map_err(|e| {
            PaymentError::new(
                PaymentErrorCode::ProviderError,
                format!("Failed to parse Stripe response: {}", e),
            )
        })
    }
}

/// Maps a non-2xx Stripe response to a payment error.
fn error_from_response(status: StatusCode, body: &str) -> PaymentError {
    let detail = serde_json::from_str::<StripeErrorBody>(body).ok().map(|b| b.error);
    let message = detail
        .as_ref()
        .and_then(|d| d.message.clone())
        .unwrap_or_else(|| format!("Stripe API error {}: {}", status, body));

    let code = match status.as_u16() {
        400 | 402 => PaymentErrorCode::InvalidRequest,
        401 | 403 => PaymentErrorCode::AuthenticationError,
        404 => PaymentErrorCode::NotFound,
        429 => PaymentErrorCode::RateLimitExceeded,
        500..=599 => PaymentErrorCode::ProviderUnavailable,
        _ => PaymentErrorCode::ProviderError,
    };

    let error = PaymentError::new(code, message);
    match detail.and_then(|d| d.code) {
        Some(provider_code) => error.with_provider_code(provider_code),
        None => error,
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn list_prices(&self) -> Result<Vec<Price>, PaymentError> {
        let url = self.url("/v1/prices");
        let mut prices = Vec::new();
        let mut starting_after: Option<String> = None;

        for _ in 0..MAX_PRICE_PAGES {
            let mut query = vec![
                ("active", "true".to_string()),
                ("limit", "100".to_string()),
                ("expand[]", "data.product".to_string()),
            ];
            if let Some(cursor) = &starting_after {
                query.push(("starting_after", cursor.clone()));
            }

            let page: StripeList<StripePrice> = self
                .execute("list_prices", || self.http_client.get(&url).query(&query))
                .await?;

            starting_after = page.data.last().map(|p| p.id.clone());
            let has_more = page.has_more;
            prices.extend(page.data.into_iter().map(Price::from));

            if !has_more || starting_after.is_none() {
                break;
            }
        }

        Ok(prices)
    }

    async fn retrieve_price(&self, price_id: &str) -> Result<Price, PaymentError> {
        let url = self.url(&format!("/v1/prices/{}", price_id));

        let price: StripePrice = self
            .execute("retrieve_price", || {
                self.http_client
                    .get(&url)
                    .query(&[("expand[]", "product")])
            })
            .await?;

        Ok(price.into())
    }

    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = self.url("/v1/checkout/sessions");
        let idempotency_key = uuid::Uuid::new_v4().to_string();

        let params = vec![
            ("mode", request.mode.as_str().to_string()),
            ("line_items[0][price]", request.price_id.clone()),
            ("line_items[0][quantity]", request.quantity.to_string()),
            ("success_url", request.success_url),
            ("cancel_url", request.cancel_url),
            ("custom_fields[0][key]", request.email_field_key),
            ("custom_fields[0][type]", "text".to_string()),
            ("custom_fields[0][label][type]", "custom".to_string()),
            ("custom_fields[0][label][custom]", request.email_field_label),
            ("metadata[price]", request.price_id),
        ];

        let session: StripeCheckoutSession = self
            .execute("create_checkout_session", || {
                self.http_client
                    .post(&url)
                    .header("Idempotency-Key", &idempotency_key)
                    .form(&params)
            })
            .await?;

        session.try_into()
    }

    async fn list_session_line_items(
        &self,
        session_id: &str,
    ) -> Result<Vec<SessionLineItem>, PaymentError> {
        let url = self.url(&format!("/v1/checkout/sessions/{}/line_items", session_id));

        let items: StripeList<StripeLineItem> = self
            .execute("list_session_line_items", || {
                self.http_client.get(&url).query(&[("limit", "100")])
            })
            .await?;

        Ok(items.data.into_iter().map(SessionLineItem::from).collect())
    }
}
