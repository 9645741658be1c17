//! Webhook error types for Stripe webhook handling.
//!
//! Defines all error conditions that can occur during webhook processing,
//! with HTTP status code mapping and retryability semantics.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Request carried no Stripe-Signature header.
    #[error("Missing Stripe-Signature header")]
    MissingSignature,

    /// Stripe-Signature header could not be parsed.
    #[error("Malformed signature header: {0}")]
    MalformedSignature(String),

    /// Verified body is not a valid event payload.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// No v1 signature matched the expected HMAC.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signature timestamp is older than the tolerance window.
    #[error("Timestamp outside tolerance window")]
    ExpiredTimestamp,

    /// Signature timestamp is in the future beyond clock skew tolerance.
    #[error("Timestamp is in the future")]
    FutureTimestamp,

    /// No webhook signing secret is configured; deliveries are refused.
    #[error("Webhook signing secret not configured")]
    NotConfigured,

    /// Neither custom fields nor customer records carry an email.
    #[error("Email not found")]
    MissingIdentity,

    /// Payment provider refused a lookup that will not succeed on retry.
    #[error("Provider rejected request: {0}")]
    ProviderRejected(String),

    /// Fulfillment sink refused the purchase permanently.
    #[error("Fulfillment rejected: {0}")]
    FulfillmentRejected(String),

    /// Payment provider could not be reached or failed transiently.
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// License storage failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl WebhookError {
    /// Returns true if Stripe should retry delivering this webhook.
    ///
    /// Retryable errors indicate temporary failures that may succeed
    /// on subsequent attempts.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebhookError::NotConfigured
                | WebhookError::ProviderUnavailable(_)
                | WebhookError::Storage(_)
        )
    }

    /// Maps the error to an appropriate HTTP status code.
    ///
    /// Status codes determine Stripe's retry behavior:
    /// - 2xx: Event acknowledged, no retry
    /// - 4xx: Client error, no retry
    /// - 5xx: Server error, will retry
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature
            | WebhookError::MalformedSignature(_)
            | WebhookError::MalformedPayload(_)
            | WebhookError::InvalidSignature
            | WebhookError::ExpiredTimestamp
            | WebhookError::FutureTimestamp => StatusCode::BAD_REQUEST,

            WebhookError::MissingIdentity
            | WebhookError::ProviderRejected(_)
            | WebhookError::FulfillmentRejected(_) => StatusCode::BAD_REQUEST,

            WebhookError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            WebhookError::ProviderUnavailable(_) => StatusCode::BAD_GATEWAY,
            WebhookError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for error responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            WebhookError::MissingSignature => "MISSING_SIGNATURE",
            WebhookError::MalformedSignature(_) => "MALFORMED_SIGNATURE",
            WebhookError::MalformedPayload(_) => "MALFORMED_PAYLOAD",
            WebhookError::InvalidSignature => "INVALID_SIGNATURE",
            WebhookError::ExpiredTimestamp => "EXPIRED_TIMESTAMP",
            WebhookError::FutureTimestamp => "FUTURE_TIMESTAMP",
            WebhookError::NotConfigured => "WEBHOOK_NOT_CONFIGURED",
            WebhookError::MissingIdentity => "EMAIL_NOT_FOUND",
            WebhookError::ProviderRejected(_) => "PROVIDER_REJECTED",
            WebhookError::FulfillmentRejected(_) => "FULFILLMENT_REJECTED",
            WebhookError::ProviderUnavailable(_) => "PROVIDER_UNAVAILABLE",
            WebhookError::Storage(_) => "STORAGE_ERROR",
        }
    }
}
