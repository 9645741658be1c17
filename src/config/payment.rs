//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key
    pub stripe_api_key: SecretString,

    /// Stripe webhook signing secret. Webhooks are refused when absent.
    #[serde(default)]
    pub stripe_webhook_secret: Option<SecretString>,

    /// Publishable key handed to the storefront alongside the catalog
    #[serde(default)]
    pub stripe_publishable_key: Option<String>,

    /// Base URL for the Stripe API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Timeout for a single outbound Stripe request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries on transient Stripe failures (network, 429, 5xx)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Maximum age of a webhook signature timestamp
    #[serde(default = "default_webhook_tolerance_secs")]
    pub webhook_tolerance_secs: u64,
}

impl PaymentConfig {
    /// Create a configuration with defaults for everything but the API key.
    pub fn new(stripe_api_key: impl Into<String>) -> Self {
        Self {
            stripe_api_key: SecretString::new(stripe_api_key.into()),
            stripe_webhook_secret: None,
            stripe_publishable_key: None,
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            webhook_tolerance_secs: default_webhook_tolerance_secs(),
        }
    }

    /// Set the webhook signing secret.
    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.stripe_webhook_secret = Some(SecretString::new(secret.into()));
        self
    }

    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_live_")
    }

    /// Whether a non-empty webhook secret is configured
    pub fn has_webhook_secret(&self) -> bool {
        self.stripe_webhook_secret
            .as_ref()
            .is_some_and(|s| !s.expose_secret().is_empty())
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let api_key = self.stripe_api_key.expose_secret();
        if api_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }

        // Verify key prefixes for safety
        if !api_key.starts_with("sk_") && !api_key.starts_with("rk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if let Some(secret) = &self.stripe_webhook_secret {
            if !secret.expose_secret().starts_with("whsec_") {
                return Err(ValidationError::InvalidStripeWebhookSecret);
            }
        }
        if let Some(publishable) = &self.stripe_publishable_key {
            if !publishable.starts_with("pk_") {
                return Err(ValidationError::InvalidPublishableKey);
            }
        }

        if self.webhook_tolerance_secs == 0 || self.webhook_tolerance_secs > 3600 {
            return Err(ValidationError::InvalidWebhookTolerance);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidProviderTimeout);
        }
        if self.max_retries > 5 {
            return Err(ValidationError::TooManyRetries);
        }

        Ok(())
    }
}

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}

fn default_webhook_tolerance_secs() -> u64 {
    300
}
