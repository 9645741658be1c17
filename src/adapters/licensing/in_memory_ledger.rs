//! In-memory License Ledger for tests and local runs.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::licensing::LicenseRecord;
use crate::ports::{InsertOutcome, LedgerError, LicenseLedger};

/// Ledger held in process memory. Lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryLicenseLedger {
    records: Mutex<Vec<LicenseRecord>>,
}

impl InMemoryLicenseLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LicenseLedger for InMemoryLicenseLedger {
    async fn insert_if_absent(&self, record: LicenseRecord) -> Result<InsertOutcome, LedgerError> {
        let event_id = record.event_id.clone().ok_or(LedgerError::MissingEventId)?;
        let mut records = self.records.lock().await;

        if let Some(existing) = records.iter().find(|r| r.is_for_event(&event_id)) {
            return Ok(InsertOutcome::AlreadyProcessed(existing.clone()));
        }

        records.push(record.clone());
        Ok(InsertOutcome::Inserted(record))
    }

    async fn find_by_event(&self, event_id: &str) -> Result<Option<LicenseRecord>, LedgerError> {
        let records = self.records.lock().await;
        Ok(records.iter().find(|r| r.is_for_event(event_id)).cloned())
    }

    async fn list(&self) -> Result<Vec<LicenseRecord>, LedgerError> {
        Ok(self.records.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::licensing::LicenseTier;
    use chrono::Utc;

    #[tokio::test]
    async fn insert_then_duplicate() {
        let ledger = InMemoryLicenseLedger::new();
        let record = LicenseRecord::issue("evt_1", "a@example.com", LicenseTier::Lite, Utc::now());
        let other = LicenseRecord::issue("evt_1", "a@example.com", LicenseTier::Lite, Utc::now());

        let first = ledger.insert_if_absent(record.clone()).await.unwrap();
        let second = ledger.insert_if_absent(other).await.unwrap();

        assert_eq!(first, InsertOutcome::Inserted(record.clone()));
        assert_eq!(second, InsertOutcome::AlreadyProcessed(record));
        assert_eq!(ledger.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn distinct_events_are_both_stored() {
        let ledger = InMemoryLicenseLedger::new();

        for id in ["evt_1", "evt_2"] {
            ledger
                .insert_if_absent(LicenseRecord::issue(id, "a@example.com", LicenseTier::Pro, Utc::now()))
                .await
                .unwrap();
        }

        assert_eq!(ledger.list().await.unwrap().len(), 2);
        assert!(ledger.find_by_event("evt_2").await.unwrap().is_some());
    }
}
