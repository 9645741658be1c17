//! Mock payment provider for testing.
//!
//! Provides a configurable mock implementation of `PaymentProvider` for unit
//! and integration tests. Supports:
//! - Pre-configured prices and session line items
//! - Error injection
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentErrorCode, PaymentProvider, Price,
    SessionLineItem,
};

/// Mock payment provider for testing.
///
/// Clones share state, so a test can keep one handle for assertions and
/// give another to the code under test.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
/// mock.add_price(price);
/// mock.set_method_error("list_prices", PaymentError::network("down"));
///
/// let handler = ListPricesHandler::new(Arc::new(mock.clone()));
/// assert!(mock.was_called("list_prices"));
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentProvider {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// Catalog in insertion order.
    prices: Vec<Price>,

    /// Line items by checkout session ID.
    line_items: HashMap<String, Vec<SessionLineItem>>,

    /// Next checkout session to return.
    next_checkout: Option<CheckoutSession>,

    /// Checkout requests received.
    checkout_requests: Vec<CreateCheckoutRequest>,

    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentProvider {
    /// Create a new mock provider with an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A test that panicked mid-call poisons the lock; keep serving.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Add a price to the catalog.
    pub fn add_price(&self, price: Price) {
        self.state().prices.push(price);
    }

    /// Set the line items Stripe reports for a session.
    pub fn set_line_items(&self, session_id: &str, items: Vec<SessionLineItem>) {
        self.state()
            .line_items
            .insert(session_id.to_string(), items);
    }

    /// Set the checkout session to return.
    pub fn set_checkout_session(&self, session: CheckoutSession) {
        self.state().next_checkout = Some(session);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.state()
            .method_errors
            .insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// Get all recorded method calls.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    /// Check if a method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_log.iter().any(|c| c.method == method)
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Most recent checkout request.
    pub fn last_checkout_request(&self) -> Option<CreateCheckoutRequest> {
        self.state().checkout_requests.last().cloned()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.state().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.state();

        // Check method-specific error first
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        // Check global error (consumes it)
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn list_prices(&self) -> Result<Vec<Price>, PaymentError> {
        self.record_call("list_prices", vec![]);
        self.check_error("list_prices")?;

        Ok(self.state().prices.clone())
    }

    async fn retrieve_price(&self, price_id: &str) -> Result<Price, PaymentError> {
        self.record_call("retrieve_price", vec![price_id.to_string()]);
        self.check_error("retrieve_price")?;

        self.state()
            .prices
            .iter()
            .find(|p| p.id == price_id)
            .cloned()
            .ok_or_else(|| {
                PaymentError::new(
                    PaymentErrorCode::NotFound,
                    format!("No such price: '{}'", price_id),
                )
                .with_provider_code("resource_missing")
            })
    }

    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        self.record_call(
            "create_checkout_session",
            vec![
                request.price_id.clone(),
                request.quantity.to_string(),
                request.mode.as_str().to_string(),
            ],
        );
        self.check_error("create_checkout_session")?;

        let mut state = self.state();
        state.checkout_requests.push(request);

        let session = state.next_checkout.take().unwrap_or_else(|| {
            let id = format!("cs_mock_{}", &uuid::Uuid::new_v4().simple().to_string()[..8]);
            CheckoutSession {
                url: format!("https://checkout.stripe.com/c/pay/{}", id),
                id,
            }
        });

        Ok(session)
    }

    async fn list_session_line_items(
        &self,
        session_id: &str,
    ) -> Result<Vec<SessionLineItem>, PaymentError> {
        self.record_call("list_session_line_items", vec![session_id.to_string()]);
        self.check_error("list_session_line_items")?;

        Ok(self
            .state()
            .line_items
            .get(session_id)
            .cloned()
            .unwrap_or_default())
    }
}
