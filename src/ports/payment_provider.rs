//! Payment provider port for external payment processing.
//!
//! Defines the contract for the Stripe integration: reading the catalog,
//! starting checkout, and looking up what a completed session contained.
//!
//! # Design
//!
//! - **Read-mostly**: Only checkout creation writes to the provider
//! - **Typed failures**: Every error says whether a retry can help

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::webhook::WebhookError;

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// List active prices with their products expanded.
    async fn list_prices(&self) -> Result<Vec<Price>, PaymentError>;

    /// Retrieve a single price by ID.
    ///
    /// Unknown IDs return a `NotFound` or `InvalidRequest` error.
    async fn retrieve_price(&self, price_id: &str) -> Result<Price, PaymentError>;

    /// Create a hosted checkout session.
    ///
    /// Returns a URL for the customer to complete payment.
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError>;

    /// List the line items of a checkout session.
    ///
    /// Used when a webhook payload does not carry the purchased price.
    async fn list_session_line_items(
        &self,
        session_id: &str,
    ) -> Result<Vec<SessionLineItem>, PaymentError>;
}

/// A catalog price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Provider's price ID (price_xxx).
    pub id: String,

    /// Internal label.
    pub nickname: Option<String>,

    /// Amount in the smallest currency unit.
    pub unit_amount: Option<i64>,

    /// Three-letter ISO currency code.
    pub currency: String,

    /// Whether the price can be used for new purchases.
    pub active: bool,

    /// Present for subscription prices.
    pub recurring: Option<PriceRecurring>,

    /// Product the price belongs to, when expanded.
    pub product: Option<Product>,
}

impl Price {
    /// Checkout mode this price has to be sold in.
    pub fn checkout_mode(&self) -> CheckoutMode {
        if self.recurring.is_some() {
            CheckoutMode::Subscription
        } else {
            CheckoutMode::Payment
        }
    }
}

/// Billing cadence of a recurring price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRecurring {
    /// day, week, month or year.
    pub interval: String,

    /// Number of intervals between billings.
    pub interval_count: u32,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

/// Checkout session mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutMode {
    /// One-time purchase.
    Payment,
    /// Recurring purchase.
    Subscription,
}

impl CheckoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutMode::Payment => "payment",
            CheckoutMode::Subscription => "subscription",
        }
    }
}

/// Request to create a checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCheckoutRequest {
    /// Price being purchased.
    pub price_id: String,

    /// Number of units.
    pub quantity: u32,

    /// Payment or subscription.
    pub mode: CheckoutMode,

    /// URL to redirect after successful checkout.
    pub success_url: String,

    /// URL to redirect after canceled checkout.
    pub cancel_url: String,

    /// Key of the text custom field that collects the license email.
    pub email_field_key: String,

    /// Label shown next to the email field.
    pub email_field_label: String,
}

/// Checkout session for payment completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID.
    pub id: String,

    /// URL for customer to complete checkout.
    pub url: String,
}

/// A line item of a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLineItem {
    /// Price that was purchased, if Stripe still knows it.
    pub price_id: Option<String>,

    /// Units purchased.
    pub quantity: Option<u32>,
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Provider's error code (if available).
    pub provider_code: Option<String>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    /// Create with provider code.
    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Timeout, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationError, message)
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidRequest, message)
    }

    /// Create a not found error.
    pub fn not_found(resource: &str) -> Self {
        Self::new(PaymentErrorCode::NotFound, format!("{} not found", resource))
    }

    /// Create a provider-side (5xx) error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderUnavailable, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for WebhookError {
    fn from(err: PaymentError) -> Self {
        if err.retryable {
            WebhookError::ProviderUnavailable(err.message)
        } else {
            WebhookError::ProviderRejected(err.message)
        }
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// Request exceeded the configured timeout.
    Timeout,

    /// API authentication failed.
    AuthenticationError,

    /// Request rejected as invalid (unknown price, bad parameter).
    InvalidRequest,

    /// Resource not found.
    NotFound,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Provider returned a 5xx.
    ProviderUnavailable,

    /// Provider API error that fits no other code.
    ProviderError,

    /// Unknown error.
    Unknown,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError
                | PaymentErrorCode::Timeout
                | PaymentErrorCode::RateLimitExceeded
                | PaymentErrorCode::ProviderUnavailable
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::Timeout => "timeout",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::NotFound => "not_found",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::ProviderUnavailable => "provider_unavailable",
            PaymentErrorCode::ProviderError => "provider_error",
            PaymentErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}
