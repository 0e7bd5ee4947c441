//! Chromium-based renderer using chromiumoxide.
//!
//! Each context owns its own headless Chromium process with a throwaway
//! profile directory. Nothing is pooled between requests.

use super::{RenderContext, Renderer};
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Delay between visibility checks.
const VISIBLE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Grace period for a browser to exit before it is killed.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    for name in [
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
    ] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    if cfg!(target_os = "macos") {
        for candidate in [
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ] {
            let path = PathBuf::from(candidate);
            if path.exists() {
                return Some(path);
            }
        }
    }

    None
}

/// JavaScript that reports whether the first match of `selector` is visible.
fn visibility_script(selector: &str) -> Result<String> {
    let quoted = serde_json::to_string(selector).context("failed to quote selector")?;
    Ok(format!(
        r#"(() => {{
            const el = document.querySelector({quoted});
            if (!el) return false;
            const style = window.getComputedStyle(el);
            if (style.visibility === 'hidden' || style.display === 'none') return false;
            const rect = el.getBoundingClientRect();
            return rect.width > 0 || rect.height > 0;
        }})()"#
    ))
}

/// Chromium-based renderer.
pub struct ChromiumRenderer {
    chrome_path: PathBuf,
}

impl ChromiumRenderer {
    /// Create a renderer backed by the first Chromium binary found.
    pub fn new() -> Result<Self> {
        let chrome_path = find_chromium().context("Chromium not found on PATH")?;
        Ok(Self::with_executable(chrome_path))
    }

    /// Create a renderer backed by a specific Chromium binary.
    pub fn with_executable(chrome_path: impl Into<PathBuf>) -> Self {
        Self {
            chrome_path: chrome_path.into(),
        }
    }

    /// Path of the Chromium binary this renderer launches.
    pub fn executable(&self) -> &Path {
        &self.chrome_path
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        let profile = ProfileDir::fresh();

        let config = BrowserConfig::builder()
            .chrome_executable(&self.chrome_path)
            .user_data_dir(profile.path())
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .build()
            .map_err(|e| anyhow!("failed to build browser config: {e}"))?;

        let (mut browser, mut handler) = match Browser::launch(config).await {
            Ok(launched) => launched,
            Err(e) => return Err(anyhow!(e).context("failed to launch Chromium")),
        };

        // Spawn the handler task
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                shutdown_browser(&mut browser, handler_task, profile).await;
                return Err(anyhow!(e).context("failed to create new page"));
            }
        };

        debug!("launched Chromium with profile {}", profile.path().display());

        Ok(Box::new(ChromiumContext {
            browser,
            page,
            handler_task,
            profile,
        }))
    }
}

/// Throwaway Chromium user-data directory, deleted on drop.
///
/// Dropping covers cancelled launches and contexts that are never closed;
/// the browser itself is killed on drop by chromiumoxide.
struct ProfileDir(PathBuf);

impl ProfileDir {
    fn fresh() -> Self {
        Self(std::env::temp_dir().join(format!("slant-chromium-{}", uuid::Uuid::new_v4())))
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for ProfileDir {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.0) {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!("failed to remove {}: {e}", self.0.display());
            }
        }
    }
}

/// A Chromium process and its single page.
///
/// Field order matters: the browser is dropped before its profile.
pub struct ChromiumContext {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    profile: ProfileDir,
}

#[async_trait]
impl RenderContext for ChromiumContext {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()> {
        let nav = async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        };

        match tokio::time::timeout(timeout, nav).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => bail!("navigation failed: {e}"),
            Err(_) => bail!("navigation timed out after {}ms", timeout.as_millis()),
        }
    }

    async fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<()> {
        let script = visibility_script(selector)?;

        let poll = async {
            loop {
                match self.page.evaluate(script.as_str()).await {
                    Ok(result) => {
                        if result.into_value::<bool>().unwrap_or(false) {
                            return;
                        }
                    }
                    Err(e) => debug!("visibility check for {selector} failed: {e}"),
                }
                tokio::time::sleep(VISIBLE_POLL_INTERVAL).await;
            }
        };

        tokio::time::timeout(timeout, poll).await.map_err(|_| {
            anyhow!(
                "{selector} not visible after {}ms",
                timeout.as_millis()
            )
        })
    }

    async fn inner_text(&self, selector: &str) -> Result<String> {
        let element = self
            .page
            .find_element(selector)
            .await
            .with_context(|| format!("no element matches {selector}"))?;

        let text = element
            .inner_text()
            .await
            .with_context(|| format!("failed to read text of {selector}"))?;

        Ok(text.unwrap_or_default())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let ChromiumContext {
            mut browser,
            page,
            handler_task,
            profile,
        } = *self;

        if let Err(e) = page.close().await {
            debug!("page close failed: {e}");
        }
        shutdown_browser(&mut browser, handler_task, profile).await;
        Ok(())
    }
}

/// Stop the browser process, its CDP handler, and delete its profile.
async fn shutdown_browser(browser: &mut Browser, handler_task: JoinHandle<()>, profile: ProfileDir) {
    let graceful = async {
        browser.close().await?;
        browser.wait().await?;
        Ok::<_, anyhow::Error>(())
    };

    let outcome = tokio::time::timeout(CLOSE_TIMEOUT, graceful).await;
    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            warn!("browser close failed, killing: {e}");
            let _ = browser.kill().await;
        }
        Err(_) => {
            warn!("browser did not exit in {}s, killing", CLOSE_TIMEOUT.as_secs());
            let _ = browser.kill().await;
        }
    }

    handler_task.abort();
    drop(profile);
}
