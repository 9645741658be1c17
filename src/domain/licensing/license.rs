//! License records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LicenseKey, LicenseTier};

/// A license issued for a completed purchase.
///
/// The `event_id` is the Stripe event that caused the issuance. A record
/// carrying an event ID doubles as the marker that the event has been
/// fulfilled: the ledger never holds two records for one event.
///
/// Records written before event tracking existed have no `event_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// Purchaser email the key was sent to.
    pub email: String,

    /// Tier that was purchased.
    pub tier: LicenseTier,

    /// The issued key.
    pub key: LicenseKey,

    /// When the license was issued.
    #[serde(rename = "timestamp")]
    pub issued_at: DateTime<Utc>,

    /// Stripe event that triggered issuance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

impl LicenseRecord {
    /// Issue a new license with a freshly generated key.
    pub fn issue(
        event_id: impl Into<String>,
        email: impl Into<String>,
        tier: LicenseTier,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            email: email.into(),
            tier,
            key: LicenseKey::generate(tier),
            issued_at,
            event_id: Some(event_id.into()),
        }
    }

    /// Returns true if this record was issued for the given event.
    pub fn is_for_event(&self, event_id: &str) -> bool {
        self.event_id.as_deref() == Some(event_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_generates_key_for_tier() {
        let record = LicenseRecord::issue("evt_1", "a@example.com", LicenseTier::Pro, Utc::now());

        assert_eq!(record.email, "a@example.com");
        assert_eq!(record.tier, LicenseTier::Pro);
        assert!(record.key.matches_tier(LicenseTier::Pro));
        assert!(record.is_for_event("evt_1"));
        assert!(!record.is_for_event("evt_2"));
    }

    #[test]
    fn serializes_issue_time_as_timestamp() {
        let record = LicenseRecord::issue("evt_1", "a@example.com", LicenseTier::Lite, Utc::now());
        let json = serde_json::to_value(&record).unwrap();

        assert!(json.get("timestamp").is_some());
        assert!(json.get("issued_at").is_none());
        assert_eq!(json["event_id"], "evt_1");
        assert_eq!(json["tier"], "Lite");
    }

    #[test]
    fn reads_legacy_record_without_event_id() {
        let json = r#"{
            "email": "old@example.com",
            "tier": "Standard",
            "key": "ARSTD-ab12-cd34-ef56",
            "timestamp": "2025-07-20T10:15:30.123456Z"
        }"#;

        let record: LicenseRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.tier, LicenseTier::Standard);
        assert!(record.event_id.is_none());
        assert!(!record.is_for_event("evt_1"));
    }
}
