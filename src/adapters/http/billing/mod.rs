//! HTTP adapter for billing endpoints.
//!
//! Exposes the storefront and Stripe webhook over REST:
//! - `GET /prices` - List the active catalog
//! - `POST /create-checkout-session` - Start a hosted checkout
//! - `POST /webhook` - Handle Stripe webhooks

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{BillingApiError, BillingAppState, STRIPE_SIGNATURE_HEADER};
pub use routes::billing_router;
