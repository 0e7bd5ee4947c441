//! Process configuration, read once at startup.
//!
//! Only the inference token and the listen port come from the environment.
//! Everything else is a compile-time default carried on [`Config`] so tests
//! can point the service at a mock endpoint without touching process state.

use std::time::Duration;

/// Hosted zero-shot classification model.
pub const DEFAULT_INFERENCE_URL: &str =
    "https://router.huggingface.co/hf-inference/models/facebook/bart-large-mnli";

/// Labels the classifier scores every input against, in request order.
pub const CANDIDATE_LABELS: [&str; 2] = ["Factual and Objective", "Opinion and Bias"];

/// Element whose rendered text is treated as the article body.
pub const CONTENT_SELECTOR: &str = "#content";

/// Maximum forwarded text length, in bytes.
pub const MAX_TEXT_BYTES: usize = 2000;

/// Listen port when `PORT` is unset or unparsable.
pub const DEFAULT_PORT: u16 = 8080;

/// Environment variable holding the inference bearer token.
pub const TOKEN_ENV: &str = "HF_API_TOKEN";

/// Environment variable holding the listen port.
pub const PORT_ENV: &str = "PORT";

const DEFAULT_INFERENCE_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_VISIBLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable service configuration shared by every request.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token forwarded to the inference API.
    pub api_token: String,
    /// TCP port the HTTP listener binds.
    pub port: u16,
    /// Inference endpoint URL.
    pub inference_url: String,
    /// Whole-request timeout for the inference call.
    pub inference_timeout: Duration,
    /// Upper bound on page navigation.
    pub navigation_timeout: Duration,
    /// Upper bound on waiting for the content element to become visible.
    pub visible_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            port: DEFAULT_PORT,
            inference_url: DEFAULT_INFERENCE_URL.to_string(),
            inference_timeout: DEFAULT_INFERENCE_TIMEOUT,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            visible_timeout: DEFAULT_VISIBLE_TIMEOUT,
        }
    }
}

impl Config {
    /// Build the configuration from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first when present;
    /// variables already set in the environment win.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenv::dotenv() {
            tracing::debug!("loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = lookup(TOKEN_ENV)
            .map(|t| t.trim().to_string())
            .unwrap_or_default();

        let port = match lookup(PORT_ENV) {
            Some(raw) if !raw.trim().is_empty() => match raw.trim().parse::<u16>() {
                Ok(p) => p,
                Err(_) => {
                    tracing::warn!("ignoring invalid {PORT_ENV}={raw:?}, using {DEFAULT_PORT}");
                    DEFAULT_PORT
                }
            },
            _ => DEFAULT_PORT,
        };

        Self {
            api_token,
            port,
            ..Self::default()
        }
    }

    /// Whether an inference token was configured.
    pub fn has_token(&self) -> bool {
        !self.api_token.is_empty()
    }
}
