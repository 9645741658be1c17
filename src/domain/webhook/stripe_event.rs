//! Stripe webhook event types.
//!
//! Defines the structures for parsing Stripe webhook payloads.
//! Only fields relevant to our processing are captured.

use serde::{Deserialize, Serialize};

/// Stripe webhook event (simplified).
///
/// Additional fields from Stripe's full event schema are ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    #[serde(default)]
    pub created: i64,

    /// Object containing event-specific data.
    pub data: StripeEventData,

    /// Whether this is a live mode event (vs test mode).
    #[serde(default)]
    pub livemode: bool,

    /// API version used to render this event.
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: serde_json::Value,
}

impl StripeEvent {
    /// Returns true if this is a live mode event.
    pub fn is_live(&self) -> bool {
        self.livemode
    }

    /// Parse the event type into a known enum variant.
    pub fn parsed_type(&self) -> StripeEventType {
        StripeEventType::parse(&self.event_type)
    }

    /// Attempts to deserialize the data object as the specified type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data.object)
    }
}

/// Stripe event types the service reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripeEventType {
    /// Checkout session completed; triggers license fulfillment.
    CheckoutSessionCompleted,
    /// Invoice payment succeeded; logged only.
    InvoicePaymentSucceeded,
    /// Payment intent succeeded; logged only.
    PaymentIntentSucceeded,
    /// Anything else; acknowledged and ignored.
    Unknown,
}

impl StripeEventType {
    /// Parse event type from string.
    pub fn parse(s: &str) -> Self {
        match s {
            "checkout.session.completed" => Self::CheckoutSessionCompleted,
            "invoice.payment_succeeded" => Self::InvoicePaymentSucceeded,
            "payment_intent.succeeded" => Self::PaymentIntentSucceeded,
            _ => Self::Unknown,
        }
    }

    /// Convert to the Stripe event type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckoutSessionCompleted => "checkout.session.completed",
            Self::InvoicePaymentSucceeded => "invoice.payment_succeeded",
            Self::PaymentIntentSucceeded => "payment_intent.succeeded",
            Self::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
pub(crate) fn test_event(id: &str, event_type: &str, object: serde_json::Value) -> StripeEvent {
    StripeEvent {
        id: id.to_string(),
        event_type: event_type.to_string(),
        created: chrono::Utc::now().timestamp(),
        data: StripeEventData { object },
        livemode: false,
        api_version: Some("2024-06-20".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_full_event() {
        let json = r#"{
            "id": "evt_1234567890",
            "object": "event",
            "type": "checkout.session.completed",
            "created": 1704067200,
            "data": {
                "object": {"id": "cs_test_1"},
                "previous_attributes": null
            },
            "livemode": true,
            "api_version": "2024-06-20",
            "pending_webhooks": 1
        }"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.id, "evt_1234567890");
        assert_eq!(event.event_type, "checkout.session.completed");
        assert_eq!(event.created, 1704067200);
        assert!(event.is_live());
        assert_eq!(event.api_version.as_deref(), Some("2024-06-20"));
    }

    #[test]
    fn deserialize_minimal_event_uses_defaults() {
        let json = r#"{"id":"evt_1","type":"payment_intent.succeeded","data":{"object":{}}}"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.created, 0);
        assert!(!event.is_live());
        assert!(event.api_version.is_none());
        assert_eq!(event.parsed_type(), StripeEventType::PaymentIntentSucceeded);
    }

    #[test]
    fn missing_data_fails() {
        let json = r#"{"id":"evt_1","type":"checkout.session.completed"}"#;
        assert!(serde_json::from_str::<StripeEvent>(json).is_err());
    }

    #[test]
    fn deserialize_object_to_custom_type() {
        #[derive(Debug, Deserialize)]
        struct Session {
            id: String,
        }

        let event = test_event("evt_1", "checkout.session.completed", json!({"id": "cs_1"}));

        let session: Session = event.deserialize_object().unwrap();
        assert_eq!(session.id, "cs_1");
    }

    #[test]
    fn event_type_parse_known_types() {
        assert_eq!(
            StripeEventType::parse("checkout.session.completed"),
            StripeEventType::CheckoutSessionCompleted
        );
        assert_eq!(
            StripeEventType::parse("invoice.payment_succeeded"),
            StripeEventType::InvoicePaymentSucceeded
        );
        assert_eq!(
            StripeEventType::parse("payment_intent.succeeded"),
            StripeEventType::PaymentIntentSucceeded
        );
    }

    #[test]
    fn event_type_parse_unknown() {
        assert_eq!(
            StripeEventType::parse("customer.created"),
            StripeEventType::Unknown
        );
    }

    #[test]
    fn event_type_as_str_roundtrip() {
        for event_type in [
            StripeEventType::CheckoutSessionCompleted,
            StripeEventType::InvoicePaymentSucceeded,
            StripeEventType::PaymentIntentSucceeded,
        ] {
            assert_eq!(StripeEventType::parse(event_type.as_str()), event_type);
        }
    }
}
