//! Licensing configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use crate::domain::licensing::{LicenseTier, TierMap};

/// License ledger location and the Stripe prices that map to each tier
#[derive(Debug, Clone, Deserialize)]
pub struct LicensingConfig {
    /// JSON file holding issued licenses
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,

    /// Stripe price ID sold as the Pro tier
    #[serde(default = "default_pro_price_id")]
    pub pro_price_id: String,

    /// Stripe price ID sold as the Standard tier
    #[serde(default = "default_standard_price_id")]
    pub standard_price_id: String,

    /// Stripe price ID sold as the Lite tier
    #[serde(default = "default_lite_price_id")]
    pub lite_price_id: String,
}

impl LicensingConfig {
    /// Build the price lookup table used during fulfillment.
    pub fn tier_map(&self) -> TierMap {
        TierMap::new()
            .with_price(&self.pro_price_id, LicenseTier::Pro)
            .with_price(&self.standard_price_id, LicenseTier::Standard)
            .with_price(&self.lite_price_id, LicenseTier::Lite)
    }

    /// Validate licensing configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ledger_path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("LICENSING__LEDGER_PATH"));
        }

        let prices = [
            &self.pro_price_id,
            &self.standard_price_id,
            &self.lite_price_id,
        ];
        for (i, price) in prices.iter().enumerate() {
            if price.is_empty() {
                return Err(ValidationError::MissingRequired("LICENSING price ID"));
            }
            if prices[..i].contains(price) {
                return Err(ValidationError::DuplicatePriceId(price.to_string()));
            }
        }
        Ok(())
    }
}

impl Default for LicensingConfig {
    fn default() -> Self {
        Self {
            ledger_path: default_ledger_path(),
            pro_price_id: default_pro_price_id(),
            standard_price_id: default_standard_price_id(),
            lite_price_id: default_lite_price_id(),
        }
    }
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("licenses.json")
}

fn default_pro_price_id() -> String {
    "price_1RnPZcR8YgSn3RHKALzxFU7vC".to_string()
}

fn default_standard_price_id() -> String {
    "price_1RnPZcR8YgSn3RHKALzxFU7vD".to_string()
}

fn default_lite_price_id() -> String {
    "price_1RnPZcR8YgSn3RHKALzxFU7vE".to_string()
}
