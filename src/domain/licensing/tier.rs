//! License tier definitions.

use serde::{Deserialize, Serialize};

/// Product tier a license was issued for.
///
/// `Unknown` is recorded when a purchase used a price that is not in the
/// lookup table, so the sale can be reconciled by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LicenseTier {
    Pro,
    Standard,
    Lite,
    Unknown,
}

impl LicenseTier {
    /// Prefix placed at the start of every key for this tier.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            LicenseTier::Pro => "ARPRO",
            LicenseTier::Standard => "ARSTD",
            LicenseTier::Lite => "ARLITE",
            LicenseTier::Unknown => "ARUNK",
        }
    }

    /// Returns the display name for this tier.
    pub fn display_name(&self) -> &'static str {
        match self {
            LicenseTier::Pro => "Pro",
            LicenseTier::Standard => "Standard",
            LicenseTier::Lite => "Lite",
            LicenseTier::Unknown => "Unknown",
        }
    }

    /// Returns true if the tier came from the price lookup table.
    pub fn is_known(&self) -> bool {
        !matches!(self, LicenseTier::Unknown)
    }
}

impl std::fmt::Display for LicenseTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
