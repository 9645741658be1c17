//! Stripe REST API objects.
//!
//! These types represent Stripe API objects as they arrive in API responses.
//! They parse the real JSON shapes (expanded or not) and convert into port
//! types.

use serde::Deserialize;

use crate::ports::{CheckoutSession, PaymentError, PaymentErrorCode, Price, PriceRecurring, Product, SessionLineItem};

// ════════════════════════════════════════════════════════════════════════════════
// Lists
// ════════════════════════════════════════════════════════════════════════════════

/// A paginated Stripe list object.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeList<T> {
    pub data: Vec<T>,

    #[serde(default)]
    pub has_more: bool,
}

// ════════════════════════════════════════════════════════════════════════════════
// Prices
// ════════════════════════════════════════════════════════════════════════════════

/// Stripe price object.
#[derive(Debug, Clone, Deserialize)]
pub struct StripePrice {
    pub id: String,

    #[serde(default)]
    pub nickname: Option<String>,

    #[serde(default)]
    pub unit_amount: Option<i64>,

    pub currency: String,

    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(default)]
    pub recurring: Option<StripeRecurring>,

    #[serde(default)]
    pub product: Option<StripeProductRef>,
}

fn default_true() -> bool {
    true
}

/// Recurring block of a price.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeRecurring {
    pub interval: String,

    #[serde(default = "default_interval_count")]
    pub interval_count: u32,
}

fn default_interval_count() -> u32 {
    1
}

/// Product reference: an ID unless `expand[]` was requested.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StripeProductRef {
    Expanded(StripeProduct),
    Id(String),
}

/// Stripe product object.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeProduct {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,
}

impl From<StripePrice> for Price {
    fn from(price: StripePrice) -> Self {
        let product = price.product.and_then(|p| match p {
            StripeProductRef::Expanded(product) => Some(Product {
                id: product.id,
                name: product.name,
                description: product.description,
            }),
            StripeProductRef::Id(_) => None,
        });

        Price {
            id: price.id,
            nickname: price.nickname,
            unit_amount: price.unit_amount,
            currency: price.currency,
            active: price.active,
            recurring: price.recurring.map(|r| PriceRecurring {
                interval: r.interval,
                interval_count: r.interval_count,
            }),
            product,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Checkout Sessions
// ════════════════════════════════════════════════════════════════════════════════

/// Stripe checkout session (creation response).
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCheckoutSession {
    pub id: String,

    /// Hosted checkout URL. Null once the session is complete or expired.
    #[serde(default)]
    pub url: Option<String>,
}

impl TryFrom<StripeCheckoutSession> for CheckoutSession {
    type Error = PaymentError;

    fn try_from(session: StripeCheckoutSession) -> Result<Self, Self::Error> {
        let url = session.url.ok_or_else(|| {
            PaymentError::new(
                PaymentErrorCode::ProviderError,
                format!("Checkout session {} has no URL", session.id),
            )
        })?;
        Ok(CheckoutSession {
            id: session.id,
            url,
        })
    }
}

/// Line item of a checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeLineItem {
    #[serde(default)]
    pub price: Option<StripePriceRef>,

    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Price on a line item: expanded object or bare ID.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StripePriceRef {
    Object { id: String },
    Id(String),
}

impl From<StripeLineItem> for SessionLineItem {
    fn from(item: StripeLineItem) -> Self {
        SessionLineItem {
            price_id: item.price.map(|p| match p {
                StripePriceRef::Object { id } | StripePriceRef::Id(id) => id,
            }),
            quantity: item.quantity,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════════

/// Stripe error envelope: `{"error": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorBody {
    pub error: StripeErrorDetail,
}

/// Stripe error detail.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorDetail {
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,

    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub param: Option<String>,
}
