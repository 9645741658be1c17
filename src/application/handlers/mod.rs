//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod catalog;
pub mod checkout;
pub mod webhook;

pub use catalog::{ListPricesHandler, ListPricesQuery};
pub use checkout::{CheckoutError, CreateCheckoutCommand, CreateCheckoutHandler};
pub use webhook::{
    FulfillPurchaseHandler, FulfillPurchaseResult, HandleWebhookCommand, HandleWebhookHandler,
    HandleWebhookResult,
};
