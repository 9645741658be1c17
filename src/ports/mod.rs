//! Ports (interfaces) for external dependencies.
//!
//! Ports define the contracts the application depends on. Adapters in
//! `crate::adapters` implement them.
//!
//! # Ports
//!
//! - `PaymentProvider` - Stripe catalog, checkout and line item lookups
//! - `LicenseLedger` - Durable license store with atomic insert-if-absent
//! - `FulfillmentSink` - Turns a verified purchase into an issued license

mod fulfillment_sink;
mod license_ledger;
mod payment_provider;

pub use fulfillment_sink::{Fulfillment, FulfillmentError, FulfillmentRequest, FulfillmentSink};
pub use license_ledger::{InsertOutcome, LedgerError, LicenseLedger};
pub use payment_provider::{
    CheckoutMode, CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentErrorCode,
    PaymentProvider, Price, PriceRecurring, Product, SessionLineItem,
};
