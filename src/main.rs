//! OTP Gateway - email one-time-password service
//!
//! Serves the OTP issuance/verification endpoints and the product catalog
//! stub over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use otp_gateway::api::{create_router, AppState};
use otp_gateway::cache::CacheStore;
use otp_gateway::otp::{
    MemoryOtpStore, OtpService, OtpStore, RemoteOtpStore, SmtpNotifier, SystemClock,
};
use otp_gateway::{spawn_cleanup_task, Config};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Load `.env` if present, initialize tracing
/// 2. Load configuration from environment variables
/// 3. Build the verification store (remote, or embedded cache plus sweeper)
/// 4. Build the SMTP notifier
/// 5. Serve until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "otp_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting OTP Gateway");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, otp_length={}, otp_ttl={}s, store={}",
        config.server_port,
        config.otp_length,
        config.otp_ttl,
        config.store_url.as_deref().unwrap_or("embedded")
    );

    let (store, sweeper): (Arc<dyn OtpStore>, Option<JoinHandle<()>>) = match &config.store_url {
        Some(url) => {
            let store = RemoteOtpStore::new(url).context("configuring remote store")?;
            info!(url = %url, "Using remote verification store");
            let store: Arc<dyn OtpStore> = Arc::new(store);
            (store, None)
        }
        None => {
            let store = MemoryOtpStore::new(CacheStore::new(config.store_max_entries));
            let handle = spawn_cleanup_task(store.cache(), config.cleanup_interval);
            info!(
                max_entries = config.store_max_entries,
                "Using embedded verification store"
            );
            let store: Arc<dyn OtpStore> = Arc::new(store);
            (store, Some(handle))
        }
    };

    let mail = config
        .mail
        .as_ref()
        .ok_or_else(|| anyhow!("SMTP_HOST, SMTP_USERNAME and SMTP_PASSWORD must be set"))?;
    let settings = config.otp_settings();
    let notifier =
        SmtpNotifier::new(mail, settings.validity).context("configuring SMTP notifier")?;

    let service = OtpService::new(store, Arc::new(notifier), Arc::new(SystemClock), settings);
    let app = create_router(AppState::new(service));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweeper))
        .await
        .context("serving HTTP")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the sweeper.
async fn shutdown_signal(sweeper: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = sweeper {
        handle.abort();
        warn!("Store sweeper aborted");
    }
}
