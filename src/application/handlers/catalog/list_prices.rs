//! ListPricesHandler - Query handler for the storefront catalog.

use std::sync::Arc;

use crate::ports::{PaymentError, PaymentProvider, Price};

/// Query for the price catalog.
#[derive(Debug, Clone, Default)]
pub struct ListPricesQuery {
    /// Include prices Stripe reports as inactive.
    pub include_inactive: bool,
}

/// Handler for listing prices.
pub struct ListPricesHandler {
    payment_provider: Arc<dyn PaymentProvider>,
}

impl ListPricesHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>) -> Self {
        Self { payment_provider }
    }

    pub async fn handle(&self, query: ListPricesQuery) -> Result<Vec<Price>, PaymentError> {
        let prices = self.payment_provider.list_prices().await?;

        Ok(prices
            .into_iter()
            .filter(|p| query.include_inactive || p.active)
            .collect())
    }
}
