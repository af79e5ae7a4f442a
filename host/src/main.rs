//! portlink-host エントリーポイント

use clap::Parser;
use portlink_client::ClientOptions;
use portlink_common::logging;
use portlink_host::cli::{api_key, Cli, Commands};
use portlink_host::config::HostConfig;
use portlink_host::credentials::{ApiKeys, CredentialStore};
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init("portlink_host=info,portlink_client=info,tower_http=info")?;

    let cli = Cli::parse();
    let store = cli.credential_store.open();

    match cli.command {
        Some(Commands::ApiKey(args)) => {
            let api_keys = ApiKeys::new(store, cli.keychain_prefix);
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            api_key::execute(
                &api_keys,
                &args.command,
                &mut stdin.lock(),
                &mut stdout.lock(),
            )
        }
        Some(Commands::Serve(args)) => serve(args.into_config(cli.keychain_prefix), store).await,
        None => serve(cli.serve.into_config(cli.keychain_prefix), store).await,
    }
}

async fn serve(config: HostConfig, store: Arc<dyn CredentialStore>) -> anyhow::Result<()> {
    info!(
        sidecar = %config.sidecar_program.display(),
        "Starting portlink host"
    );

    let host = portlink_host::start_infrastructure(&config, store).await?;

    // Check the sidecar through the same discovery path a frontend uses
    let client = host.client(ClientOptions {
        discovery_timeout: Some(config.startup_timeout),
        ..ClientOptions::default()
    });
    client.initialize();

    match client.health().await {
        Ok(health) => {
            info!(status = %health.status, endpoint = ?client.endpoint(), "Sidecar is healthy");
            match client.ai_status().await {
                Ok(ai) => info!(available = ai.available, message = %ai.message, "AI status"),
                Err(e) => warn!(error = %e, "AI status request failed"),
            }
        }
        Err(e) => error!(error = %e, "Sidecar health check failed"),
    }

    shutdown_signal().await;
    host.shutdown().await;
    Ok(())
}

/// シャットダウンシグナルを待機
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
