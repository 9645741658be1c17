//! Licensing Adapters
//!
//! Implementations of the `LicenseLedger` and `FulfillmentSink` ports.
//!
//! ## Available Adapters
//!
//! - **FileLicenseLedger** - JSON document on disk (`licenses.json`)
//! - **InMemoryLicenseLedger** - In-process ledger (testing/development)
//! - **LedgerFulfillmentSink** - Issues keys into any ledger
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::licensing::{FileLicenseLedger, LedgerFulfillmentSink};
//!
//! let ledger = Arc::new(FileLicenseLedger::open("licenses.json").await?);
//! let sink = LedgerFulfillmentSink::new(ledger);
//! ```

mod file_ledger;
mod in_memory_ledger;
mod ledger_sink;

pub use file_ledger::FileLicenseLedger;
pub use in_memory_ledger::InMemoryLicenseLedger;
pub use ledger_sink::LedgerFulfillmentSink;
