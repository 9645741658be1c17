//! Stripe price to license tier lookup.

use std::collections::HashMap;

use super::LicenseTier;

/// Static lookup from Stripe price ID to the tier it sells.
///
/// Prices missing from the table resolve to [`LicenseTier::Unknown`] instead
/// of failing, so the purchase is still recorded for manual reconciliation.
#[derive(Debug, Clone, Default)]
pub struct TierMap {
    prices: HashMap<String, LicenseTier>,
}

impl TierMap {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a price to the table.
    pub fn with_price(mut self, price_id: impl Into<String>, tier: LicenseTier) -> Self {
        self.prices.insert(price_id.into(), tier);
        self
    }

    /// Resolve the tier for a purchased price.
    pub fn resolve(&self, price_id: Option<&str>) -> LicenseTier {
        price_id
            .and_then(|id| self.prices.get(id))
            .copied()
            .unwrap_or(LicenseTier::Unknown)
    }

    /// Number of mapped prices.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Returns true if no prices are mapped.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> TierMap {
        TierMap::new()
            .with_price("price_pro", LicenseTier::Pro)
            .with_price("price_lite", LicenseTier::Lite)
    }

    #[test]
    fn mapped_price_resolves_to_tier() {
        assert_eq!(map().resolve(Some("price_pro")), LicenseTier::Pro);
        assert_eq!(map().resolve(Some("price_lite")), LicenseTier::Lite);
    }

    #[test]
    fn unmapped_price_resolves_to_unknown() {
        assert_eq!(map().resolve(Some("price_nope")), LicenseTier::Unknown);
    }

    #[test]
    fn missing_price_resolves_to_unknown() {
        assert_eq!(map().resolve(None), LicenseTier::Unknown);
    }

    #[test]
    fn later_entry_replaces_earlier() {
        let map = TierMap::new()
            .with_price("price_x", LicenseTier::Lite)
            .with_price("price_x", LicenseTier::Pro);
        assert_eq!(map.len(), 1);
        assert_eq!(map.resolve(Some("price_x")), LicenseTier::Pro);
    }
}
