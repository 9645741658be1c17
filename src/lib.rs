//! AR Billing - payment backend for AR licenses
//!
//! Lists the Stripe catalog, starts hosted checkouts, and turns verified
//! `checkout.session.completed` webhooks into license keys, issuing at most
//! one key per Stripe event.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
