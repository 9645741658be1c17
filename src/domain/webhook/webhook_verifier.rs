//! Stripe webhook signature verification.
//!
//! Implements secure verification of Stripe webhook signatures using HMAC-SHA256.
//! Includes timestamp validation to prevent replay attacks.
//!
//! The MAC is computed over the raw request bytes. The body is never decoded
//! or re-serialized before verification.

use chrono::Utc;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::stripe_event::StripeEvent;
use super::webhook_errors::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Default maximum age for webhook signatures (5 minutes).
pub const DEFAULT_TOLERANCE_SECS: u64 = 300;

/// Maximum allowed clock skew for future timestamps (1 minute).
pub const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed components from the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when the signature was generated.
    pub timestamp: i64,
    /// v1 signatures (HMAC-SHA256). Stripe sends several during secret rotation.
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    /// Parses a Stripe-Signature header string.
    ///
    /// Format: `t=<timestamp>,v1=<signature>[,v1=<signature>...][,v0=<legacy>]`
    ///
    /// Legacy `v0` entries and unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::MalformedSignature` if the header format is invalid.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();

        for part in header.split(',') {
            let (key, value) = part
                .trim()
                .split_once('=')
                .ok_or_else(|| malformed("invalid header format"))?;

            match key {
                "t" => {
                    timestamp = Some(value.parse().map_err(|_| malformed("invalid timestamp"))?);
                }
                "v1" => {
                    v1_signatures
                        .push(hex::decode(value).map_err(|_| malformed("invalid v1 signature hex"))?);
                }
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or_else(|| malformed("missing timestamp"))?;
        if v1_signatures.is_empty() {
            return Err(malformed("missing v1 signature"));
        }

        Ok(SignatureHeader {
            timestamp,
            v1_signatures,
        })
    }
}

fn malformed(reason: &str) -> WebhookError {
    WebhookError::MalformedSignature(reason.to_string())
}

/// Verifier for Stripe webhook signatures.
pub struct StripeWebhookVerifier {
    /// The webhook signing secret from Stripe dashboard.
    secret: SecretString,
    /// Maximum signature age in seconds.
    tolerance_secs: i64,
}

impl StripeWebhookVerifier {
    /// Creates a new verifier with the given webhook secret and the
    /// default five minute tolerance.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
            tolerance_secs: DEFAULT_TOLERANCE_SECS as i64,
        }
    }

    /// Overrides the replay tolerance window.
    pub fn with_tolerance(mut self, tolerance_secs: u64) -> Self {
        self.tolerance_secs = i64::try_from(tolerance_secs).unwrap_or(i64::MAX);
        self
    }

    /// Verifies the webhook signature and parses the event.
    ///
    /// # Errors
    ///
    /// - `MalformedSignature` - Header could not be parsed
    /// - `ExpiredTimestamp` - Signature is older than the tolerance window
    /// - `FutureTimestamp` - Signature timestamp is beyond clock skew
    /// - `InvalidSignature` - No v1 signature matched
    /// - `MalformedPayload` - Verified body is not an event
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<StripeEvent, WebhookError> {
        self.verify_at(payload, signature_header, Utc::now().timestamp())
    }

    /// Same as [`verify_and_parse`](Self::verify_and_parse) with an explicit clock.
    pub fn verify_at(
        &self,
        payload: &[u8],
        signature_header: &str,
        now: i64,
    ) -> Result<StripeEvent, WebhookError> {
        // 1. Parse signature header
        let header = SignatureHeader::parse(signature_header)?;

        // 2. Validate timestamp
        self.validate_timestamp(header.timestamp, now)?;

        // 3. Compute expected signature
        let expected = self.compute_signature(header.timestamp, payload)?;

        // 4. Compare signatures (constant-time)
        let matched = header
            .v1_signatures
            .iter()
            .fold(false, |acc, sig| acc | constant_time_compare(&expected, sig));
        if !matched {
            return Err(WebhookError::InvalidSignature);
        }

        // 5. Parse event
        serde_json::from_slice(payload).map_err(|e| WebhookError::MalformedPayload(e.to_string()))
    }

    /// Builds a `Stripe-Signature` header value for `payload`, signed the
    /// way Stripe signs deliveries.
    ///
    /// Used to replay captured events against the service.
    pub fn signature_header(&self, timestamp: i64, payload: &[u8]) -> Result<String, WebhookError> {
        let signature = self.compute_signature(timestamp, payload)?;
        Ok(format!("t={},v1={}", timestamp, hex::encode(signature)))
    }

    fn validate_timestamp(&self, timestamp: i64, now: i64) -> Result<(), WebhookError> {
        let age = now.saturating_sub(timestamp);

        if age > self.tolerance_secs {
            return Err(WebhookError::ExpiredTimestamp);
        }
        if age < -MAX_CLOCK_SKEW_SECS {
            return Err(WebhookError::FutureTimestamp);
        }

        Ok(())
    }

    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Result<Vec<u8>, WebhookError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| WebhookError::NotConfigured)?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

impl std::fmt::Debug for StripeWebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeWebhookVerifier")
            .field("secret", &"[REDACTED]")
            .field("tolerance_secs", &self.tolerance_secs)
            .finish()
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
