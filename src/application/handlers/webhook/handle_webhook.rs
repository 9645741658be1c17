//! HandleWebhookHandler - Command handler for Stripe webhook deliveries.

use std::sync::Arc;

use crate::domain::licensing::LicenseRecord;
use crate::domain::webhook::{StripeEventType, StripeWebhookVerifier, WebhookError};

use super::fulfill_purchase::FulfillPurchaseHandler;

/// Command to handle a webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// Stripe-Signature header, if the request carried one.
    pub signature: Option<String>,
}

/// Result of webhook processing.
#[derive(Debug, Clone)]
pub enum HandleWebhookResult {
    /// Checkout completed, license on file.
    Fulfilled {
        event_id: String,
        license: LicenseRecord,
        duplicate: bool,
    },
    /// Known event, logged only.
    Acknowledged { event_id: String, event_type: String },
    /// Event type the service does not handle.
    Ignored { event_id: String, event_type: String },
}

/// Handler for Stripe webhooks.
///
/// Verification runs before anything reads the payload. Without a signing
/// secret every delivery is refused.
pub struct HandleWebhookHandler {
    verifier: Option<Arc<StripeWebhookVerifier>>,
    fulfill_purchase: FulfillPurchaseHandler,
}

impl HandleWebhookHandler {
    pub fn new(
        verifier: Option<Arc<StripeWebhookVerifier>>,
        fulfill_purchase: FulfillPurchaseHandler,
    ) -> Self {
        Self {
            verifier,
            fulfill_purchase,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandleWebhookCommand,
    ) -> Result<HandleWebhookResult, WebhookError> {
        // 1. Verify signature and parse event
        let verifier = self.verifier.as_ref().ok_or_else(|| {
            tracing::error!("Webhook received but no signing secret is configured");
            WebhookError::NotConfigured
        })?;
        let signature = cmd.signature.as_deref().ok_or(WebhookError::MissingSignature)?;
        let event = verifier.verify_and_parse(&cmd.payload, signature)?;

        tracing::info!(
            event_id = %event.id,
            event_type = %event.event_type,
            livemode = event.livemode,
            "Webhook verified"
        );

        // 2. Dispatch on type
        match event.parsed_type() {
            StripeEventType::CheckoutSessionCompleted => {
                let result = self.fulfill_purchase.handle(&event).await?;
                tracing::info!(
                    event_id = %event.id,
                    tier = %result.license.tier,
                    duplicate = result.duplicate,
                    "License fulfilled"
                );
                Ok(HandleWebhookResult::Fulfilled {
                    event_id: event.id,
                    license: result.license,
                    duplicate: result.duplicate,
                })
            }
            StripeEventType::InvoicePaymentSucceeded | StripeEventType::PaymentIntentSucceeded => {
                Ok(HandleWebhookResult::Acknowledged {
                    event_id: event.id,
                    event_type: event.event_type,
                })
            }
            StripeEventType::Unknown => {
                tracing::debug!(event_type = %event.event_type, "Ignoring webhook event");
                Ok(HandleWebhookResult::Ignored {
                    event_id: event.id,
                    event_type: event.event_type,
                })
            }
        }
    }
}
