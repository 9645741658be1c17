//! File-based License Ledger
//!
//! Keeps every issued license in one JSON document:
//!
//! ```json
//! {
//!   "licenses": [
//!     {"email": "...", "tier": "Pro", "key": "ARPRO-...", "timestamp": "...", "event_id": "evt_..."}
//!   ]
//! }
//! ```
//!
//! The document is loaded once at startup and rewritten in full on every
//! insert, through a temp file and rename so a crash never leaves a torn
//! file behind.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::domain::licensing::LicenseRecord;
use crate::ports::{InsertOutcome, LedgerError, LicenseLedger};

#[derive(Debug, Default, Deserialize)]
struct LedgerDocument {
    #[serde(default)]
    licenses: Vec<LicenseRecord>,
}

#[derive(Serialize)]
struct LedgerDocumentRef<'a> {
    licenses: &'a [LicenseRecord],
}

/// File-backed license ledger.
///
/// All access goes through one async mutex, which makes
/// `insert_if_absent` atomic for this process.
#[derive(Debug)]
pub struct FileLicenseLedger {
    path: PathBuf,
    records: Mutex<Vec<LicenseRecord>>,
}

impl FileLicenseLedger {
    /// Open the ledger at `path`, loading existing records.
    ///
    /// A missing or empty file is an empty ledger; the file is created on
    /// first insert.
    ///
    /// # Example
    /// ```ignore
    /// let ledger = FileLicenseLedger::open("./data/licenses.json").await?;
    /// ```
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();

        let records = match fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice::<LedgerDocument>(&bytes)?.licenses,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), records = records.len(), "License ledger opened");

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    /// Location of the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    /// Replace the file contents with `records`.
    async fn persist(&self, records: &[LicenseRecord]) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(&LedgerDocumentRef { licenses: records })?;
        let tmp = self.temp_path();

        let mut file = fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl LicenseLedger for FileLicenseLedger {
    async fn insert_if_absent(&self, record: LicenseRecord) -> Result<InsertOutcome, LedgerError> {
        let event_id = record.event_id.clone().ok_or(LedgerError::MissingEventId)?;

        let mut records = self.records.lock().await;

        if let Some(existing) = records.iter().find(|r| r.is_for_event(&event_id)) {
            return Ok(InsertOutcome::AlreadyProcessed(existing.clone()));
        }

        records.push(record.clone());
        if let Err(e) = self.persist(&records).await {
            records.pop();
            tracing::error!(path = %self.path.display(), error = %e, "Failed to persist license ledger");
            return Err(e);
        }

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
