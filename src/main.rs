use std::{env, future::IntoFuture, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use artemis_gateway::{
    config::{load_config, GatewayConfig},
    http_server::{create_router, parse_bind_address},
    jolokia::SessionCache,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// REST gateway for Artemis broker management
#[derive(Parser, Debug)]
#[command(name = "artemis-gateway", version)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long, env = "ARTEMIS_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override httpServer.host
    #[arg(long)]
    host: Option<String>,

    /// Override httpServer.port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; the filter defaults to info when RUST_LOG is unset.
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    // Use JSON format in production, human-readable format in development
    if env::var("RUST_LOG_FORMAT").unwrap_or_default() == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let cli = Cli::parse();
    tracing::info!("Starting Artemis gateway");

    let mut config = match &cli.config {
        Some(path) => {
            let path = path.to_string_lossy();
            load_config(&path).map_err(|e| {
                tracing::error!(path = %path, error = %e, "Failed to load configuration");
                e
            })?
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            GatewayConfig::default()
        }
    };
    if let Some(host) = cli.host {
        config.http_server.host = host;
    }
    if let Some(port) = cli.port {
        config.http_server.port = port;
    }

    let sessions = Arc::new(SessionCache::new(&config.jolokia)?);
    tracing::info!(
        endpoints = config.jolokia.endpoints.len(),
        path_prefix = %config.jolokia.path_prefix,
        "Session cache ready"
    );

    let bind_address = parse_bind_address(&config.http_server).map_err(anyhow::Error::msg)?;
    let app = create_router(sessions, &config.http_server);

    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("Listening on http://{}", bind_address);

    let shutdown_timeout = Duration::from_secs(config.http_server.shutdown_timeout);
    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    // Once a signal arrives, in-flight requests get shutdown_timeout to finish.
    tokio::select! {
        result = server.into_future() => result.context("HTTP server failed")?,
        _ = async {
            shutdown_signal().await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            tracing::warn!("Graceful shutdown timed out after {:?}", shutdown_timeout);
        }
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl-C received, shutting down gracefully."),
        _ = terminate => tracing::info!("SIGTERM received, shutting down gracefully."),
    }
}
