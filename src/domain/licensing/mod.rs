//! Licensing domain module.
//!
//! Turns a completed purchase into a license: which tier was bought, the
//! key handed to the customer, and the record kept for support.
//!
//! # Module Structure
//!
//! - `tier` - LicenseTier levels and their key prefixes
//! - `license_key` - Support-friendly license key format
//! - `tier_map` - Stripe price ID to tier lookup
//! - `license` - LicenseRecord kept in the ledger

mod license;
mod license_key;
mod tier;
mod tier_map;

pub use license::LicenseRecord;
pub use license_key::LicenseKey;
pub use tier::LicenseTier;
pub use tier_map::TierMap;
