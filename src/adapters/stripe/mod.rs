//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe integration:
//! - Catalog listing and price lookup
//! - Checkout sessions
//! - Line items of completed sessions
//!
//! Webhook signature verification lives in `crate::domain::webhook` since it
//! needs no network access.
//!
//! # Configuration
//!
//! - `AR_BILLING__PAYMENT__STRIPE_API_KEY`: Stripe secret API key
//! - `AR_BILLING__PAYMENT__TIMEOUT_SECS` / `MAX_RETRIES`: outbound call bounds

mod api_types;
mod mock_payment_provider;
mod stripe_adapter;

pub use mock_payment_provider::{MethodCall, MockPaymentProvider};
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
