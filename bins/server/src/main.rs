//! Ledgerlock API Server
//!
//! Main entry point for the period closing service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledgerlock_api::{AppState, create_router};
use ledgerlock_gateway::{
    PeriodClosingService, RemoteLedgerGateway, notify::EmailNotifier,
};
use ledgerlock_shared::{AppConfig, EmailService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledgerlock=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().map_err(|e| anyhow::anyhow!("configuration error: {e}"))?;

    // Connect to the ledger gateway
    let gateway = RemoteLedgerGateway::new(&config.gateway)
        .map_err(|e| anyhow::anyhow!("gateway client error: {e}"))?;
    info!(base_url = %config.gateway.base_url, "Ledger gateway client configured");

    // Reopen notifications go out by email
    let email_service = EmailService::new(config.email.clone());
    info!(
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        "Email service configured"
    );

    let service = PeriodClosingService::new(Arc::new(gateway))
        .with_notifier(Arc::new(EmailNotifier::new(email_service)));

    // Create application state
    let state = AppState { service };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr, "Ledgerlock server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
