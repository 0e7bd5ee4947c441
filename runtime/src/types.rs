//! Request, payload, and result types exchanged over HTTP.

use serde::{Deserialize, Serialize};

/// Inbound body of `POST /analyze`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Page to scrape when no text is given.
    #[serde(default)]
    pub url: Option<String>,
    /// Text to classify directly.
    #[serde(default)]
    pub text: Option<String>,
}

impl AnalyzeRequest {
    /// Direct-text request.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            url: None,
            text: Some(text.into()),
        }
    }

    /// Scrape request.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            text: None,
        }
    }

    /// `text`, if present and non-empty.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    /// `url`, if present and non-empty.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }

    /// Whether resolving this request will drive the browser.
    pub fn needs_scrape(&self) -> bool {
        self.text().is_none() && self.url().is_some()
    }
}

/// Outbound body sent to the inference API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationPayload {
    pub inputs: String,
    pub parameters: ClassificationParameters,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationParameters {
    pub candidate_labels: Vec<String>,
}

/// Normalised classifier output. `labels[i]` is scored by `scores[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub sequence: String,
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

/// One element of the flat `[{label, score}]` response shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}
