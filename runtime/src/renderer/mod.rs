//! Renderer abstraction for browser-based page rendering.
//!
//! Defines the `Renderer` and `RenderContext` traits that abstract over
//! the browser engine (currently Chromium via chromiumoxide). Tests swap
//! in stubs so no browser is launched.

pub mod chromium;

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// A browser engine that can open rendering contexts.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Open a new, isolated browser context.
    async fn new_context(&self) -> Result<Box<dyn RenderContext>>;
    /// Whether a real browser backs this renderer.
    fn is_available(&self) -> bool {
        true
    }
}

/// A single browser context (one page) for rendering.
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Navigate to a URL, failing after `timeout`.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()>;
    /// Block until an element matching `selector` is visible.
    async fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<()>;
    /// Rendered text of the first element matching `selector`.
    async fn inner_text(&self, selector: &str) -> Result<String>;
    /// Release the context and anything it owns.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// A no-op renderer used when Chromium is unavailable.
///
/// Every scrape fails; direct text input still works.
pub struct NoopRenderer;

#[async_trait]
impl Renderer for NoopRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        Err(anyhow::anyhow!("browser not available, text-only mode"))
    }

    fn is_available(&self) -> bool {
        false
    }
}
