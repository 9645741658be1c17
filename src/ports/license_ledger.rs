//! LicenseLedger port - durable store of issued licenses.
//!
//! The ledger is also the record of which Stripe events have been
//! fulfilled. Its one write operation is an atomic insert-if-absent keyed
//! by event ID, so concurrent redeliveries of one event can never both
//! issue a license.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::licensing::LicenseRecord;

/// Port for the license ledger.
#[async_trait]
pub trait LicenseLedger: Send + Sync {
    /// Insert `record` unless a record for the same event already exists.
    ///
    /// Check and insert happen as one atomic step. When the event was
    /// already fulfilled the stored record is returned and `record` is
    /// discarded.
    ///
    /// # Errors
    ///
    /// - `MissingEventId` if `record` has no event ID
    /// - `Io` / `Serialization` if the insert could not be made durable;
    ///   the ledger is left as it was before the call
    async fn insert_if_absent(&self, record: LicenseRecord) -> Result<InsertOutcome, LedgerError>;

    /// Find the license issued for an event.
    async fn find_by_event(&self, event_id: &str) -> Result<Option<LicenseRecord>, LedgerError>;

    /// All records in insertion order.
    async fn list(&self) -> Result<Vec<LicenseRecord>, LedgerError>;
}

/// Result of [`LicenseLedger::insert_if_absent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record was stored.
    Inserted(LicenseRecord),
    /// The event was already fulfilled; holds the original record.
    AlreadyProcessed(LicenseRecord),
}

impl InsertOutcome {
    /// The record now on file for the event.
    pub fn record(&self) -> &LicenseRecord {
        match self {
            InsertOutcome::Inserted(r) | InsertOutcome::AlreadyProcessed(r) => r,
        }
    }

    pub fn into_record(self) -> LicenseRecord {
        match self {
            InsertOutcome::Inserted(r) | InsertOutcome::AlreadyProcessed(r) => r,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, InsertOutcome::AlreadyProcessed(_))
    }
}

/// Ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Ledger I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ledger encoding failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("License record has no event ID")]
    MissingEventId,
}
