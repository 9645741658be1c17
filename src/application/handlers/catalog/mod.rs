//! Catalog handlers.
//!
//! ## Queries
//! - Listing the prices offered in the storefront

mod list_prices;

pub use list_prices::{ListPricesHandler, ListPricesQuery};
