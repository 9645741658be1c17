//! Webhook handlers.
//!
//! ## Commands
//! - Verifying and dispatching a Stripe delivery
//! - Fulfilling a completed checkout exactly once per event

mod fulfill_purchase;
mod handle_webhook;

pub use fulfill_purchase::{FulfillPurchaseHandler, FulfillPurchaseResult};
pub use handle_webhook::{HandleWebhookCommand, HandleWebhookHandler, HandleWebhookResult};
