//! The request pipeline: decode, resolve content, truncate, classify.

use crate::classifier::ClassifierClient;
use crate::config::{Config, MAX_TEXT_BYTES};
use crate::errors::AnalyzeError;
use crate::renderer::Renderer;
use crate::scrape::Scraper;
use crate::truncate::truncate_bytes;
use crate::types::{AnalyzeRequest, ClassificationResult};
use std::sync::Arc;
use tracing::info;

/// Decode a raw request body.
pub fn decode_request(body: &[u8]) -> Result<AnalyzeRequest, AnalyzeError> {
    serde_json::from_slice(body).map_err(|e| AnalyzeError::InvalidInput(e.to_string()))
}

/// Runs one request through scrape and classification.
#[derive(Clone)]
pub struct Analyzer {
    scraper: Scraper,
    classifier: ClassifierClient,
}

impl Analyzer {
    /// Wire an analyzer from configuration and a browser backend.
    pub fn new(config: &Config, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            scraper: Scraper::new(renderer, config),
            classifier: ClassifierClient::new(config),
        }
    }

    /// Whether URL requests can be served.
    pub fn can_scrape(&self) -> bool {
        self.scraper.is_available()
    }

    /// Text to classify: `text` verbatim, else the scraped page.
    pub async fn resolve_content(&self, req: &AnalyzeRequest) -> Result<String, AnalyzeError> {
        if let Some(text) = req.text() {
            info!("received direct text input ({} bytes), skipping scrape", text.len());
            return Ok(text.to_string());
        }
        if let Some(url) = req.url() {
            info!("received URL, starting scrape: {url}");
            return self.scraper.scrape(url).await;
        }
        Err(AnalyzeError::MissingInput)
    }

    /// Full pipeline for an already-decoded request.
    pub async fn analyze(&self, req: &AnalyzeRequest) -> Result<ClassificationResult, AnalyzeError> {
        let content = self.resolve_content(req).await?;
        let text = truncate_bytes(&content, MAX_TEXT_BYTES);
        if text.len() < content.len() {
            info!("truncated input from {} to {} bytes", content.len(), text.len());
        }

        let result = self.classifier.classify(text).await?;
        info!("analysis complete: {} labels", result.labels.len());
        Ok(result)
    }

    /// Full pipeline for a raw JSON body.
    pub async fn analyze_body(&self, body: &[u8]) -> Result<ClassificationResult, AnalyzeError> {
        let req = decode_request(body)?;
        self.analyze(&req).await
    }
}
