//! Article text extraction from a live page.

use crate::config::{Config, CONTENT_SELECTOR};
use crate::errors::AnalyzeError;
use crate::renderer::{RenderContext, Renderer};
use anyhow::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Drives one browser session per call: navigate, wait, extract, close.
#[derive(Clone)]
pub struct Scraper {
    renderer: Arc<dyn Renderer>,
    selector: String,
    navigation_timeout: Duration,
    visible_timeout: Duration,
}

impl Scraper {
    /// Scraper reading [`CONTENT_SELECTOR`] with the configured timeouts.
    pub fn new(renderer: Arc<dyn Renderer>, config: &Config) -> Self {
        Self {
            renderer,
            selector: CONTENT_SELECTOR.to_string(),
            navigation_timeout: config.navigation_timeout,
            visible_timeout: config.visible_timeout,
        }
    }

    /// Whether the underlying renderer can actually scrape.
    pub fn is_available(&self) -> bool {
        self.renderer.is_available()
    }

    /// Rendered text of the content element at `url`.
    ///
    /// The browser context is closed whether or not extraction succeeds,
    /// and also when the returned future is dropped before completing.
    pub async fn scrape(&self, url: &str) -> Result<String, AnalyzeError> {
        let failure = |e: anyhow::Error| AnalyzeError::ScrapeFailure {
            url: url.to_string(),
            reason: format!("{e:#}"),
        };

        let start = Instant::now();
        let ctx = self.renderer.new_context().await.map_err(failure)?;
        let mut guard = ContextGuard::new(ctx, url);

        let result = match guard.context() {
            Some(ctx) => self.extract(ctx, url).await,
            None => Err(anyhow::anyhow!("browser context already closed")),
        };
        guard.close().await;

        let text = result.map_err(failure)?;
        info!(
            "scraped {} bytes from {url} in {}ms",
            text.len(),
            start.elapsed().as_millis()
        );
        Ok(text)
    }

    async fn extract(&self, ctx: &mut dyn RenderContext, url: &str) -> Result<String> {
        ctx.navigate(url, self.navigation_timeout).await?;
        debug!("navigated to {url}, waiting for {}", self.selector);
        ctx.wait_visible(&self.selector, self.visible_timeout).await?;
        ctx.inner_text(&self.selector).await
    }
}

/// Owns an open context and closes it on every exit path.
///
/// Dropping the guard with the context still open (the request future was
/// cancelled) hands the close to a background task.
struct ContextGuard {
    ctx: Option<Box<dyn RenderContext>>,
    url: String,
}

impl ContextGuard {
    fn new(ctx: Box<dyn RenderContext>, url: &str) -> Self {
        Self {
            ctx: Some(ctx),
            url: url.to_string(),
        }
    }

    fn context(&mut self) -> Option<&mut (dyn RenderContext + 'static)> {
        self.ctx.as_deref_mut()
    }

    async fn close(&mut self) {
        if let Some(ctx) = self.ctx.take() {
            close_context(ctx, &self.url).await;
        }
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let Some(ctx) = self.ctx.take() else {
            return;
        };
        let url = std::mem::take(&mut self.url);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!("scrape of {url} cancelled, closing context in background");
                handle.spawn(async move { close_context(ctx, &url).await });
            }
            Err(_) => warn!("scrape of {url} dropped outside a runtime, context not closed"),
        }
    }
}

async fn close_context(ctx: Box<dyn RenderContext>, url: &str) {
    if let Err(e) = ctx.close().await {
        warn!("failed to close browser context for {url}: {e:#}");
    }
}
