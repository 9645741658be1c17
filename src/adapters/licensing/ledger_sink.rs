//! Ledger-backed fulfillment: a license is a new ledger record.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::licensing::LicenseRecord;
use crate::ports::{Fulfillment, FulfillmentError, FulfillmentRequest, FulfillmentSink, LicenseLedger};

/// Issues license keys into a [`LicenseLedger`].
///
/// A fresh key is generated for every call and discarded when the ledger
/// reports the event as already fulfilled.
pub struct LedgerFulfillmentSink {
    ledger: Arc<dyn LicenseLedger>,
}

impl LedgerFulfillmentSink {
    pub fn new(ledger: Arc<dyn LicenseLedger>) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl FulfillmentSink for LedgerFulfillmentSink {
    async fn find(&self, event_id: &str) -> Result<Option<LicenseRecord>, FulfillmentError> {
        Ok(self.ledger.find_by_event(event_id).await?)
    }

    async fn fulfill(&self, request: FulfillmentRequest) -> Result<Fulfillment, FulfillmentError> {
        if request.event_id.is_empty() {
            return Err(FulfillmentError::Permanent("event ID is empty".to_string()));
        }
        if request.email.trim().is_empty() {
            return Err(FulfillmentError::Permanent("email is empty".to_string()));
        }

        let record = LicenseRecord::issue(
            &request.event_id,
            request.email.trim(),
            request.tier,
            Utc::now(),
        );
        let outcome = self.ledger.insert_if_absent(record).await?;
        let duplicate = outcome.is_duplicate();

        if duplicate {
            tracing::info!(event_id = %request.event_id, "Event already fulfilled, returning existing license");
        }

        Ok(Fulfillment {
            license: outcome.into_record(),
            duplicate,
        })
    }
}
