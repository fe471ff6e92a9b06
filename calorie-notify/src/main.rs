//! Calorie Notify Web Server.
//!
//! Serves the calculator's submission endpoint:
//! - Verifies the form's authenticity token
//! - Forwards the submission to the operator's webhook without waiting on it
//! - Emails the user their result and the operator a new-lead notice
//! - Returns a per-channel JSON report

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use calorie_notify::{
    router, AppState, Catalog, Config, Dispatcher, JsonFileSettings, RequestGuard, SmtpMailer,
    WebhookForwarder,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        nonce_secret_configured = config.nonce_secret.is_some(),
        nonce_lifetime_secs = config.nonce_lifetime_secs,
        smtp_host = %config.smtp_host,
        smtp_port = config.smtp_port,
        smtp_tls = ?config.smtp_tls,
        smtp_auth_configured = config.smtp_username.is_some(),
        settings_path = %config.settings_path.display(),
        catalog_path = ?config.catalog_path,
        "config_loaded"
    );

    let guard = match &config.nonce_secret {
        Some(secret) => RequestGuard::new(secret.clone(), config.nonce_lifetime_secs),
        None => {
            warn!("nonce_secret_not_configured_using_random");
            RequestGuard::with_random_secret(config.nonce_lifetime_secs)
        }
    };

    let catalog = Catalog::load_or_identity(config.catalog_path.as_deref());

    let mailer = SmtpMailer::new(
        &config.smtp_host,
        config.smtp_port,
        config.smtp_tls,
        config.smtp_username.as_deref(),
        config.smtp_password.as_deref(),
    )
    .context("Failed to create SMTP transport")?;

    let client = Client::builder()
        .build()
        .context("Failed to create HTTP client")?;
    let forwarder =
        WebhookForwarder::new(client, Duration::from_millis(config.webhook_timeout_ms));

    let dispatcher = Dispatcher::new(
        Arc::new(JsonFileSettings::new(config.settings_path.clone())),
        Arc::new(mailer),
        forwarder,
        Arc::new(catalog),
    );

    // Create application state
    let state = AppState::new(dispatcher, guard);

    let app = router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
