//! CLI subcommand implementations for the Slant binary.

pub mod analyze_cmd;
pub mod doctor;
pub mod serve;

use crate::renderer::chromium::ChromiumRenderer;
use crate::renderer::{NoopRenderer, Renderer};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Initialize tracing. `RUST_LOG` overrides the default level.
pub fn init_tracing(verbose: bool) {
    let default = if verbose {
        "slant_runtime=debug,tower_http=debug"
    } else {
        "slant_runtime=info,tower_http=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Chromium if it can be found, otherwise a renderer that refuses to scrape.
pub fn build_renderer() -> Arc<dyn Renderer> {
    match ChromiumRenderer::new() {
        Ok(renderer) => {
            info!("Chromium renderer using {}", renderer.executable().display());
            Arc::new(renderer)
        }
        Err(e) => {
            warn!("Failed to initialize Chromium: {e}");
            warn!("Running in text-only mode (URL requests will fail)");
            Arc::new(NoopRenderer)
        }
    }
}
