//! AR Billing server.
//!
//! Main entry point. Loads configuration, wires the Stripe adapter and the
//! license ledger into the HTTP router, and serves until shutdown.

use std::sync::Arc;

use anyhow::{Context, Result};
use secrecy::ExposeSecret;
use tracing::{info, warn};

use ar_billing::adapters::http::{app_router, BillingAppState};
use ar_billing::adapters::licensing::{FileLicenseLedger, LedgerFulfillmentSink};
use ar_billing::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use ar_billing::config::AppConfig;
use ar_billing::domain::webhook::StripeWebhookVerifier;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing with structured logging
    init_tracing(&config);

    config.validate().context("Invalid configuration")?;
    info!(
        environment = ?config.server.environment,
        test_mode = config.payment.is_test_mode(),
        webhook_secret = config.payment.has_webhook_secret(),
        ledger_path = %config.licensing.ledger_path.display(),
        public_domain = %config.server.public_base_url(),
        "Configuration loaded"
    );

    // License ledger
    let ledger = FileLicenseLedger::open(&config.licensing.ledger_path)
        .await
        .with_context(|| {
            format!(
                "Failed to open license ledger at {}",
                config.licensing.ledger_path.display()
            )
        })?;
    let ledger = Arc::new(ledger);

    // Stripe
    let payment_provider = StripePaymentAdapter::new(StripeConfig::from_payment_config(
        &config.payment,
    ))
    .context("Failed to build Stripe client")?;

    let webhook_verifier = match &config.payment.stripe_webhook_secret {
        Some(secret) if config.payment.has_webhook_secret() => Some(Arc::new(
            StripeWebhookVerifier::new(secret.expose_secret().as_str())
                .with_tolerance(config.payment.webhook_tolerance_secs),
        )),
        _ => {
            warn!("No webhook signing secret configured; webhook deliveries will be refused");
            None
        }
    };

    let state = BillingAppState {
        payment_provider: Arc::new(payment_provider),
        fulfillment_sink: Arc::new(LedgerFulfillmentSink::new(ledger)),
        webhook_verifier,
        tier_map: Arc::new(config.licensing.tier_map()),
        public_domain: config.server.public_base_url().to_string(),
        publishable_key: config.payment.stripe_publishable_key.clone(),
    };
    let app = app_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(addr = %listener.local_addr()?, "AR Billing is ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

    info!("AR Billing shutdown complete");
    Ok(())
}

/// Initializes tracing. `RUST_LOG` wins over the configured filter.
fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

/// Waits for shutdown signal (CTRL+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received CTRL+C, starting graceful shutdown");
        },
        () = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
