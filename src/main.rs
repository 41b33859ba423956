use std::sync::Arc;

use npi_registry_mcp::{
    build_app,
    config::{Config, UpstreamMode},
    forwarding_client::ForwardingDirectory,
    logging,
    npi_client::HttpRegistryClient,
    registry::{NormalizeOptions, ProviderDirectory, RegistryDirectory},
    AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    let directory: Arc<dyn ProviderDirectory> = match &config.upstream {
        UpstreamMode::Registry { base_url } => {
            info!(registry_url = %base_url, "using npi registry upstream");
            let client = HttpRegistryClient::new(base_url.as_str(), config.request_timeout)?;
            Arc::new(RegistryDirectory::new(
                client,
                NormalizeOptions {
                    postal_code: config.postal_code_format,
                },
            ))
        }
        UpstreamMode::Forwarding { base_url } => {
            info!(api_base_url = %base_url, "forwarding to npi api service");
            Arc::new(ForwardingDirectory::new(base_url, config.request_timeout)?)
        }
    };

    let bind_socket = config.bind_socket()?;
    let app = build_app(AppState::new(directory));
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        "server starting"
    );

    // The router owns the only handle to the upstream client; it is dropped when serve returns.
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for sigterm");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received");
}
