//! HTTP DTOs (Data Transfer Objects) for billing endpoints.
//!
//! These types define the JSON request/response structure for the storefront
//! API and the webhook acknowledgements returned to Stripe.

use serde::{Deserialize, Serialize};

use crate::application::HandleWebhookResult;
use crate::domain::licensing::LicenseTier;
use crate::ports::{CheckoutSession, Price, PriceRecurring, Product};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to start a hosted checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCheckoutSessionRequest {
    /// Stripe price being purchased.
    pub price_id: String,
    /// Units to purchase. Defaults to one.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Catalog listing.
#[derive(Debug, Clone, Serialize)]
pub struct PricesResponse {
    /// Key the storefront uses to initialize Stripe.js.
    pub publishable_key: Option<String>,
    pub prices: Vec<PriceResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceResponse {
    pub id: String,
    pub nickname: Option<String>,
    pub unit_amount: Option<i64>,
    pub currency: String,
    pub recurring: Option<RecurringResponse>,
    pub product: Option<ProductResponse>,
}

impl From<Price> for PriceResponse {
    fn from(price: Price) -> Self {
        Self {
            id: price.id,
            nickname: price.nickname,
            unit_amount: price.unit_amount,
            currency: price.currency,
            recurring: price.recurring.map(Into::into),
            product: price.product.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecurringResponse {
    pub interval: String,
    pub interval_count: u32,
}

impl From<PriceRecurring> for RecurringResponse {
    fn from(recurring: PriceRecurring) -> Self {
        Self {
            interval: recurring.interval,
            interval_count: recurring.interval_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
        }
    }
}

/// Created checkout session.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSessionResponse {
    pub id: String,
    /// Hosted checkout page to redirect the buyer to.
    pub url: String,
}

impl From<CheckoutSession> for CheckoutSessionResponse {
    fn from(session: CheckoutSession) -> Self {
        Self {
            id: session.id,
            url: session.url,
        }
    }
}

/// Acknowledgement for a webhook delivery.
///
/// License fields are only present for fulfilled checkouts.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookResponse {
    /// `success`, `acknowledged` or `ignored`.
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<LicenseTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate: Option<bool>,
}

impl WebhookResponse {
    fn status_only(status: &'static str) -> Self {
        Self {
            status,
            license: None,
            tier: None,
            duplicate: None,
        }
    }
}

impl From<HandleWebhookResult> for WebhookResponse {
    fn from(result: HandleWebhookResult) -> Self {
        match result {
            HandleWebhookResult::Fulfilled {
                license, duplicate, ..
            } => Self {
                status: "success",
                license: Some(license.key.as_str().to_string()),
                tier: Some(license.tier),
                duplicate: Some(duplicate),
            },
            HandleWebhookResult::Acknowledged { .. } => Self::status_only("acknowledged"),
            HandleWebhookResult::Ignored { .. } => Self::status_only("ignored"),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Response DTO
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Create an error response with details.
    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}
