//! Portlink sidecar entry point
//!
//! Reads its configuration from the environment prepared by the host,
//! binds an ephemeral loopback port and prints `SIDECAR_PORT:<port>`.

use portlink_common::{config::SidecarConfig, logging};
use portlink_sidecar::{server, AppState};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init("portlink_sidecar=info,tower_http=info")?;

    let config = SidecarConfig::from_env();
    config.validate()?;
    info!(
        bridge_url = %config.bridge_url,
        port = config.port,
        "Portlink sidecar v{} starting",
        env!("CARGO_PKG_VERSION")
    );
    if config.bridge_token.is_empty() {
        warn!("Bridge token is empty; API key lookups will be rejected by the bridge");
    }

    server::run(AppState::new(config)).await?;
    Ok(())
}
