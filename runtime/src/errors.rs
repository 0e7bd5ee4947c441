//! Failure taxonomy for one analyze request.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

/// Everything that can stop a request from producing a classification.
#[derive(thiserror::Error, Debug)]
pub enum AnalyzeError {
    /// The body was not JSON of the expected shape.
    #[error("invalid request body: {0}")]
    InvalidInput(String),

    /// Neither `url` nor `text` was supplied.
    #[error("request has neither url nor text")]
    MissingInput,

    /// Navigation, the visibility wait, or text extraction failed.
    #[error("scrape of {url} failed: {reason}")]
    ScrapeFailure { url: String, reason: String },

    /// The inference API could not be reached.
    #[error("inference request failed: {0}")]
    NetworkFailure(String),

    /// The inference API answered with an error.
    #[error("inference API error: {0}")]
    UpstreamApiError(String),

    /// The inference API answered with a body in no recognised shape.
    #[error("unrecognised inference response: {0}")]
    ParseFailure(String),
}

impl AnalyzeError {
    /// HTTP status reported to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            AnalyzeError::InvalidInput(_) | AnalyzeError::MissingInput => StatusCode::BAD_REQUEST,
            AnalyzeError::ScrapeFailure { .. }
            | AnalyzeError::NetworkFailure(_)
            | AnalyzeError::UpstreamApiError(_)
            | AnalyzeError::ParseFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Single-line message returned to the caller. Causes stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            AnalyzeError::InvalidInput(_) => "Invalid request body",
            AnalyzeError::MissingInput => "Please provide either a URL or Text",
            AnalyzeError::ScrapeFailure { .. } => "Failed to scrape the page",
            AnalyzeError::NetworkFailure(_)
            | AnalyzeError::UpstreamApiError(_)
            | AnalyzeError::ParseFailure(_) => "Failed to analyze the text",
        }
    }
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{self}");
        } else {
            warn!("rejected request: {self}");
        }
        (status, self.public_message()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_400() {
        assert_eq!(
            AnalyzeError::InvalidInput("eof".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AnalyzeError::MissingInput.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_errors_are_500() {
        let errs = [
            AnalyzeError::ScrapeFailure {
                url: "http://example.com".into(),
                reason: "timeout".into(),
            },
            AnalyzeError::NetworkFailure("dns".into()),
            AnalyzeError::UpstreamApiError("rate limited".into()),
            AnalyzeError::ParseFailure("eof".into()),
        ];
        for e in errs {
            assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR, "{e}");
        }
    }

    #[test]
    fn test_public_message_hides_cause() {
        let e = AnalyzeError::UpstreamApiError("token hf_secret rejected".into());
        assert_eq!(e.public_message(), "Failed to analyze the text");
        assert!(e.to_string().contains("hf_secret"));
    }
}
