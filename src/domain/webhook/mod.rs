//! Webhook domain module.
//!
//! Everything needed to trust and interpret a Stripe webhook delivery
//! before any fulfillment runs.
//!
//! # Module Structure
//!
//! - `webhook_verifier` - Stripe-Signature parsing and HMAC verification
//! - `stripe_event` - Event envelope and known event types
//! - `checkout_session` - Purchaser and price extraction from a checkout session
//! - `webhook_errors` - Error taxonomy with HTTP status and retry semantics

mod checkout_session;
mod stripe_event;
mod webhook_errors;
mod webhook_verifier;

pub use checkout_session::{
    CheckoutSessionObject, CustomField, CustomFieldText, CustomerDetails, LineItem, LineItems,
    PriceRef, EMAIL_FIELD_KEY,
};
pub use stripe_event::{StripeEvent, StripeEventData, StripeEventType};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{
    SignatureHeader, StripeWebhookVerifier, DEFAULT_TOLERANCE_SECS, MAX_CLOCK_SKEW_SECS,
};

#[cfg(test)]
pub(crate) use stripe_event::test_event;
