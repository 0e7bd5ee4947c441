//! `slant analyze` — classify one text or page and print the result.

use crate::analyze::Analyzer;
use crate::cli::build_renderer;
use crate::config::Config;
use crate::renderer::{NoopRenderer, Renderer};
use crate::types::AnalyzeRequest;
use anyhow::Result;
use std::sync::Arc;

/// Run the pipeline once, printing the classification as JSON.
pub async fn run(text: Option<String>, url: Option<String>) -> Result<()> {
    let config = Config::from_env();
    let req = AnalyzeRequest { url, text };

    // Only look for Chromium when something will be scraped.
    let renderer: Arc<dyn Renderer> = if req.needs_scrape() {
        build_renderer()
    } else {
        Arc::new(NoopRenderer)
    };

    let analyzer = Analyzer::new(&config, renderer);
    let result = analyzer.analyze(&req).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
