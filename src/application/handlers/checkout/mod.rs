//! Checkout handlers.
//!
//! ## Commands
//! - Starting a hosted checkout for a price

mod create_checkout;

pub use create_checkout::{CheckoutError, CreateCheckoutCommand, CreateCheckoutHandler};
