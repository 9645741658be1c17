//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `licensing` - License tiers, keys and issued records
//! - `webhook` - Stripe webhook verification, events and checkout sessions

pub mod licensing;
pub mod webhook;
