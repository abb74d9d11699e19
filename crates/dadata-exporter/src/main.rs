//! Dadata exporter
//!
//! - Config: optional YAML file named by `DADATA_EXPORTER_CONFIG`
//! - Secrets: `DADATA_TOKEN`, `DADATA_X_SECRET`
//! - Refuses to start unless the credentials are accepted upstream

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use dadata_core::error::{DadataError, Result};
use dadata_exporter::{app_state, config, router, Credentials, Exporter, UpstreamClient};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        tracing::error!(kind = e.kind().as_str(), error = %e, "can't start dadata-exporter");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cfg_path = std::env::var(config::CONFIG_ENV).ok();
    let cfg = config::load(cfg_path.as_deref())?;
    let listen = cfg.exporter.listen_addr()?;

    let token = std::env::var(config::TOKEN_ENV).unwrap_or_default();
    let secret = std::env::var(config::SECRET_ENV).unwrap_or_default();
    let creds = Credentials::new(&cfg.upstream.base_url, &token, &secret).map_err(|e| {
        if let DadataError::MissingField { field } = &e {
            tracing::error!(
                field,
                "set {} and {} in the environment",
                config::TOKEN_ENV,
                config::SECRET_ENV
            );
        }
        e
    })?;
    let client = UpstreamClient::new(creds, cfg.upstream.timeout());

    let exporter = tokio::task::spawn_blocking(move || Exporter::with_client(client))
        .await
        .map_err(|e| DadataError::Config(format!("credentials check aborted: {e}")))??;

    let state = app_state::AppState::new(cfg, Arc::new(exporter));
    let app = router::build_router(state);

    tracing::info!(%listen, "starting dadata-exporter");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| DadataError::Config(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| DadataError::Config(format!("server failed: {e}")))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
