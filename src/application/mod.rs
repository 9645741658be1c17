//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (checkout, webhook) are kept apart from the catalog query.

pub mod handlers;

pub use handlers::{
    // Catalog
    ListPricesHandler, ListPricesQuery,
    // Checkout
    CheckoutError, CreateCheckoutCommand, CreateCheckoutHandler,
    // Webhook
    FulfillPurchaseHandler, FulfillPurchaseResult, HandleWebhookCommand, HandleWebhookHandler,
    HandleWebhookResult,
};
