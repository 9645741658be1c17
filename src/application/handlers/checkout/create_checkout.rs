//! CreateCheckoutHandler - Command handler for starting a hosted checkout.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::webhook::EMAIL_FIELD_KEY;
use crate::ports::{CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentProvider};

/// Command to start a checkout.
#[derive(Debug, Clone)]
pub struct CreateCheckoutCommand {
    pub price_id: String,
    pub quantity: u32,
}

/// Errors from checkout creation.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("price_id is required")]
    InvalidPriceId,

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("{}", .0.message)]
    Provider(#[from] PaymentError),
}

/// Handler for checkout creation.
///
/// The session mode follows the price: recurring prices start a
/// subscription, everything else a one-time payment.
pub struct CreateCheckoutHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    public_domain: String,
}

impl CreateCheckoutHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>, public_domain: impl Into<String>) -> Self {
        let public_domain: String = public_domain.into();
        Self {
            payment_provider,
            public_domain: public_domain.trim_end_matches('/').to_string(),
        }
    }

    pub async fn handle(&self, cmd: CreateCheckoutCommand) -> Result<CheckoutSession, CheckoutError> {
        let price_id = cmd.price_id.trim();
        if price_id.is_empty() {
            return Err(CheckoutError::InvalidPriceId);
        }
        if cmd.quantity == 0 {
            return Err(CheckoutError::InvalidQuantity);
        }

        let price = self.payment_provider.retrieve_price(price_id).await?;
        let mode = price.checkout_mode();

        let session = self
            .payment_provider
            .create_checkout_session(CreateCheckoutRequest {
                price_id: price.id,
                quantity: cmd.quantity,
                mode,
                success_url: format!(
                    "{}/success.html?session_id={{CHECKOUT_SESSION_ID}}",
                    self.public_domain
                ),
                cancel_url: format!("{}/cancel.html", self.public_domain),
                email_field_key: EMAIL_FIELD_KEY.to_string(),
                email_field_label: "Email for license delivery".to_string(),
            })
            .await?;

        tracing::info!(
            session_id = %session.id,
            price_id,
            mode = mode.as_str(),
            "Checkout session created"
        );

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::ports::{CheckoutMode, PaymentErrorCode, Price, PriceRecurring};

    fn price(id: &str, recurring: bool) -> Price {
        Price {
            id: id.to_string(),
            nickname: None,
            unit_amount: Some(1900),
            currency: "usd".to_string(),
            active: true,
            recurring: recurring.then(|| PriceRecurring {
                interval: "month".to_string(),
                interval_count: 1,
            }),
            product: None,
        }
    }

    fn handler(provider: &MockPaymentProvider) -> CreateCheckoutHandler {
        CreateCheckoutHandler::new(Arc::new(provider.clone()), "https://shop.example.com/")
    }

    fn cmd(price_id: &str, quantity: u32) -> CreateCheckoutCommand {
        CreateCheckoutCommand {
            price_id: price_id.to_string(),
            quantity,
        }
    }

    #[tokio::test]
    async fn one_time_price_creates_payment_session() {
        let provider = MockPaymentProvider::new();
        provider.add_price(price("price_once", false));

        let session = handler(&provider).handle(cmd("price_once", 1)).await.unwrap();

        assert!(session.url.starts_with("https://"));
        let request = provider.last_checkout_request().unwrap();
        assert_eq!(request.mode, CheckoutMode::Payment);
        assert_eq!(
            request.success_url,
            "https://shop.example.com/success.html?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(request.cancel_url, "https://shop.example.com/cancel.html");
        assert_eq!(request.email_field_key, "email");
    }

    #[tokio::test]
    async fn recurring_price_creates_subscription_session() {
        let provider = MockPaymentProvider::new();
        provider.add_price(price("price_monthly", true));

        handler(&provider).handle(cmd("price_monthly", 2)).await.unwrap();

        let request = provider.last_checkout_request().unwrap();
        assert_eq!(request.mode, CheckoutMode::Subscription);
        assert_eq!(request.quantity, 2);
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected_before_provider_call() {
        let provider = MockPaymentProvider::new();

        let result = handler(&provider).handle(cmd("price_once", 0)).await;

        assert!(matches!(result, Err(CheckoutError::InvalidQuantity)));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn blank_price_is_rejected() {
        let provider = MockPaymentProvider::new();

        let result = handler(&provider).handle(cmd("  ", 1)).await;

        assert!(matches!(result, Err(CheckoutError::InvalidPriceId)));
    }

    #[tokio::test]
    async fn unknown_price_surfaces_provider_message() {
        let provider = MockPaymentProvider::new();

        let err = handler(&provider).handle(cmd("price_missing", 1)).await.unwrap_err();

        match err {
            CheckoutError::Provider(e) => {
                assert_eq!(e.code, PaymentErrorCode::NotFound);
                assert!(e.message.contains("price_missing"));
            }
            other => panic!("expected provider error, got {:?}", other),
        }
        assert!(!provider.was_called("create_checkout_session"));
    }
}
