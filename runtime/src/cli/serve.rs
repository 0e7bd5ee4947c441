//! `slant serve` — run the HTTP API.

use crate::analyze::Analyzer;
use crate::cli::build_renderer;
use crate::config::{Config, TOKEN_ENV};
use crate::rest::{self, AppState};
use anyhow::Result;
use tracing::{info, warn};

/// Start the REST API. `port` overrides the configured port.
pub async fn run(port: Option<u16>) -> Result<()> {
    let mut config = Config::from_env();
    if let Some(port) = port {
        config.port = port;
    }

    info!("starting Slant v{}", env!("CARGO_PKG_VERSION"));
    if !config.has_token() {
        warn!("{TOKEN_ENV} is not set; inference requests will be unauthenticated");
    }

    let analyzer = Analyzer::new(&config, build_renderer());
    rest::start(config.port, AppState::new(analyzer)).await?;

    info!("Slant stopped");
    Ok(())
}
