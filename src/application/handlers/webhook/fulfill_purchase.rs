//! FulfillPurchaseHandler - issues the license for a completed checkout.

use std::sync::Arc;

use crate::domain::licensing::{LicenseRecord, LicenseTier, TierMap};
use crate::domain::webhook::{CheckoutSessionObject, StripeEvent, WebhookError};
use crate::ports::{FulfillmentError, FulfillmentRequest, FulfillmentSink, PaymentProvider};

/// Outcome of fulfilling one `checkout.session.completed` event.
#[derive(Debug, Clone)]
pub struct FulfillPurchaseResult {
    /// License on file for the event.
    pub license: LicenseRecord,
    /// True when the event had already been fulfilled.
    pub duplicate: bool,
    /// Price the tier was resolved from, if any was found.
    pub price_id: Option<String>,
}

/// Handler for completed checkouts.
///
/// Resolves the purchaser and tier from the session, then hands off to the
/// fulfillment sink, which owns idempotency per event ID.
pub struct FulfillPurchaseHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    fulfillment_sink: Arc<dyn FulfillmentSink>,
    tier_map: Arc<TierMap>,
}

impl FulfillPurchaseHandler {
    pub fn new(
        payment_provider: Arc<dyn PaymentProvider>,
        fulfillment_sink: Arc<dyn FulfillmentSink>,
        tier_map: Arc<TierMap>,
    ) -> Self {
        Self {
            payment_provider,
            fulfillment_sink,
            tier_map,
        }
    }

    pub async fn handle(&self, event: &StripeEvent) -> Result<FulfillPurchaseResult, WebhookError> {
        // 0. Already fulfilled: answer from the ledger, touch nothing else
        if let Some(license) = self
            .fulfillment_sink
            .find(&event.id)
            .await
            .map_err(sink_error)?
        {
            tracing::info!(event_id = %event.id, "Event already fulfilled, returning existing license");
            return Ok(FulfillPurchaseResult {
                license,
                duplicate: true,
                price_id: None,
            });
        }

        // 1. Decode the session
        let session: CheckoutSessionObject = event
            .deserialize_object()
            .map_err(|e| WebhookError::MalformedPayload(e.to_string()))?;

        // 2. Purchaser identity; nothing is issued without one
        let email = session
            .purchaser_email()
            .ok_or(WebhookError::MissingIdentity)?
            .to_string();

        // 3. Tier
        let price_id = self.resolve_price_id(&session).await?;
        let tier = self.tier_map.resolve(price_id.as_deref());
        if tier == LicenseTier::Unknown {
            tracing::warn!(
                event_id = %event.id,
                price_id = price_id.as_deref().unwrap_or("<none>"),
                "Price not mapped to a tier, issuing Unknown license for reconciliation"
            );
        }

        // 4. Issue (idempotent per event)
        let fulfillment = self
            .fulfillment_sink
            .fulfill(FulfillmentRequest {
                event_id: event.id.clone(),
                email,
                tier,
            })
            .await
            .map_err(sink_error)?;

        Ok(FulfillPurchaseResult {
            license: fulfillment.license,
            duplicate: fulfillment.duplicate,
            price_id,
        })
    }

    /// Price from the payload, else from Stripe's record of the session.
    async fn resolve_price_id(
        &self,
        session: &CheckoutSessionObject,
    ) -> Result<Option<String>, WebhookError> {
        if let Some(price_id) = session.price_id() {
            return Ok(Some(price_id.to_string()));
        }

        let Some(session_id) = session.id.as_deref() else {
            return Ok(None);
        };

        tracing::debug!(session_id, "Price missing from payload, fetching line items");
        let items = self
            .payment_provider
            .list_session_line_items(session_id)
            .await?;

        Ok(items.into_iter().find_map(|item| item.price_id))
    }
}

fn sink_error(err: FulfillmentError) -> WebhookError {
    match err {
        FulfillmentError::Transient(msg) => WebhookError::Storage(msg),
        FulfillmentError::Permanent(msg) => WebhookError::FulfillmentRejected(msg),
    }
}
