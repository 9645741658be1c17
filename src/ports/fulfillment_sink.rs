//! FulfillmentSink port - turns a verified purchase into a license.

use async_trait::async_trait;
use thiserror::Error;

use super::license_ledger::LedgerError;
use crate::domain::licensing::{LicenseRecord, LicenseTier};

/// Port for purchase fulfillment.
///
/// Implementations must be idempotent per `event_id`: repeated calls for
/// one event return the license issued by the first call.
#[async_trait]
pub trait FulfillmentSink: Send + Sync {
    /// License already issued for an event, if any. Never issues.
    async fn find(&self, event_id: &str) -> Result<Option<LicenseRecord>, FulfillmentError>;

    async fn fulfill(&self, request: FulfillmentRequest) -> Result<Fulfillment, FulfillmentError>;
}

/// A verified purchase awaiting fulfillment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FulfillmentRequest {
    /// Stripe event that reported the purchase.
    pub event_id: String,
    /// Purchaser email.
    pub email: String,
    /// Purchased tier.
    pub tier: LicenseTier,
}

/// Result of a fulfillment call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fulfillment {
    /// License on file for the event.
    pub license: LicenseRecord,
    /// True when the event had already been fulfilled.
    pub duplicate: bool,
}

/// Fulfillment failures.
#[derive(Debug, Error)]
pub enum FulfillmentError {
    /// May succeed if the delivery is retried.
    #[error("Transient fulfillment failure: {0}")]
    Transient(String),

    /// Will never succeed for this request.
    #[error("Permanent fulfillment failure: {0}")]
    Permanent(String),
}

impl From<LedgerError> for FulfillmentError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Io(_) | LedgerError::Serialization(_) => {
                FulfillmentError::Transient(err.to_string())
            }
            LedgerError::MissingEventId => FulfillmentError::Permanent(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fulfillment_sink_is_object_safe() {
        fn _accepts_dyn(_sink: &dyn FulfillmentSink) {}
    }

    #[test]
    fn io_failures_are_transient() {
        let err = LedgerError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert!(matches!(
            FulfillmentError::from(err),
            FulfillmentError::Transient(_)
        ));
    }

    #[test]
    fn missing_event_id_is_permanent() {
        assert!(matches!(
            FulfillmentError::from(LedgerError::MissingEventId),
            FulfillmentError::Permanent(_)
        ));
    }
}
