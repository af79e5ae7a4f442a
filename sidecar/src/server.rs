//! axumサーバー起動・シャットダウンハンドリング
//!
//! The sidecar binds loopback only and reports its port on stdout so the
//! launching host can discover it.

use crate::error::SidecarError;
use crate::shutdown::ShutdownController;
use crate::AppState;
use portlink_common::protocol::format_port_announcement;
use std::io::Write;
use tokio::net::TcpListener;
use tracing::info;

/// Bind the configured address, announce the port on stdout and serve until shutdown
pub async fn run(state: AppState) -> Result<(), SidecarError> {
    let listener = TcpListener::bind(state.config.bind_addr())
        .await
        .map_err(SidecarError::Bind)?;
    let port = listener.local_addr().map_err(SidecarError::Bind)?.port();

    info!("Sidecar listening on http://127.0.0.1:{}", port);

    // The host launcher parses this line; logs go to stderr
    announce_port(&mut std::io::stdout().lock(), port).map_err(SidecarError::Announce)?;

    serve(listener, state).await
}

/// Write the port announcement line and flush it
pub fn announce_port<W: Write>(out: &mut W, port: u16) -> std::io::Result<()> {
    writeln!(out, "{}", format_port_announcement(port))?;
    out.flush()
}

/// Serve the sidecar API on an already bound listener
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), SidecarError> {
    let shutdown = state.shutdown.clone();
    let app = crate::api::create_app(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .map_err(SidecarError::Serve)?;

    info!("Sidecar shutdown complete");
    Ok(())
}

/// シャットダウンシグナルを待機
async fn shutdown_signal(shutdown: ShutdownController) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
        _ = shutdown.wait() => {
            info!("Shutdown requested, shutting down...");
        }
    }
}
