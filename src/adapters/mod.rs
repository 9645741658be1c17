//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum routes for the storefront and Stripe webhooks
//! - `licensing` - License ledgers (JSON file, in-memory) and the fulfillment sink
//! - `stripe` - Stripe REST client and a mock provider for tests

pub mod http;
pub mod licensing;
pub mod stripe;

pub use licensing::{FileLicenseLedger, InMemoryLicenseLedger, LedgerFulfillmentSink};
pub use stripe::{MockPaymentProvider, StripeConfig, StripePaymentAdapter};
