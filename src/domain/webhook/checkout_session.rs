//! Checkout session payload carried by `checkout.session.completed`.
//!
//! Only the fields fulfillment reads are modelled. Every field is optional:
//! Stripe omits or nulls them depending on how the session was created.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Custom field key the storefront uses to collect the license email.
pub const EMAIL_FIELD_KEY: &str = "email";

/// A completed checkout session as delivered in a webhook.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CheckoutSessionObject {
    /// Session identifier (cs_xxx).
    #[serde(default)]
    pub id: Option<String>,

    /// Email Stripe recorded on the session.
    #[serde(default)]
    pub customer_email: Option<String>,

    /// Customer details collected during checkout.
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,

    /// Custom form fields attached to the session.
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,

    /// Metadata set when the session was created.
    #[serde(default)]
    pub metadata: HashMap<String, String>,

    /// Line items, when Stripe expanded them into the payload.
    #[serde(default)]
    pub line_items: Option<LineItems>,

    /// Pre-2020 sessions list purchased prices here.
    #[serde(default)]
    pub display_items: Vec<LineItem>,
}

/// Customer details block.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub email: Option<String>,
}

/// A custom checkout field.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomField {
    pub key: String,
    #[serde(default)]
    pub text: Option<CustomFieldText>,
}

/// Value of a text custom field.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomFieldText {
    #[serde(default)]
    pub value: Option<String>,
}

/// Line items arrive either as a Stripe list object or a bare array.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum LineItems {
    List { data: Vec<LineItem> },
    Items(Vec<LineItem>),
}

impl LineItems {
    fn first(&self) -> Option<&LineItem> {
        match self {
            LineItems::List { data } => data.first(),
            LineItems::Items(items) => items.first(),
        }
    }
}

/// A purchased item.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LineItem {
    #[serde(default)]
    pub price: Option<PriceRef>,
}

/// Reference to a price, expanded or not.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PriceRef {
    Id(String),
    Object { id: String },
}

impl PriceRef {
    pub fn id(&self) -> &str {
        match self {
            PriceRef::Id(id) | PriceRef::Object { id } => id,
        }
    }
}

impl CheckoutSessionObject {
    /// Resolves the purchaser email.
    ///
    /// Order: the `email` custom field, then `customer_email`, then
    /// `customer_details.email`. Blank values are skipped.
    pub fn purchaser_email(&self) -> Option<&str> {
        let from_custom_field = self
            .custom_fields
            .iter()
            .find(|f| f.key == EMAIL_FIELD_KEY)
            .and_then(|f| f.text.as_ref())
            .and_then(|t| t.value.as_deref());

        [
            from_custom_field,
            self.customer_email.as_deref(),
            self.customer_details.as_ref().and_then(|d| d.email.as_deref()),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|email| !email.is_empty())
    }

    /// Resolves the purchased price from the payload alone.
    ///
    /// Order: first line item, `metadata.price`, first display item.
    /// `None` means the caller has to ask Stripe for the line items.
    pub fn price_id(&self) -> Option<&str> {
        let from_line_items = self
            .line_items
            .as_ref()
            .and_then(LineItems::first)
            .and_then(|item| item.price.as_ref())
            .map(PriceRef::id);

        [
            from_line_items,
            self.metadata.get("price").map(String::as_str),
            self.display_items
                .first()
                .and_then(|item| item.price.as_ref())
                .map(PriceRef::id),
        ]
        .into_iter()
        .flatten()
        .find(|id| !id.is_empty())
    }
}
