//! Client for the hosted zero-shot classification API.
//!
//! One POST per call, no retries. The response body is sniffed against the
//! shapes the API is known to return, in a fixed order: error envelope,
//! flat `[{label, score}]` list, then a direct `{sequence, labels, scores}`
//! object.

use crate::config::{Config, CANDIDATE_LABELS};
use crate::errors::AnalyzeError;
use crate::types::{
    ClassificationParameters, ClassificationPayload, ClassificationResult, LabelScore,
};
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info};

/// Every body shape the inference API may answer with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Error { error: String },
    Flat(Vec<LabelScore>),
    Direct(ClassificationResult),
}

/// Decode a raw inference body into a normalised result.
///
/// `input` becomes the `sequence` of flat-list responses. `status` only
/// matters when the body matches no known shape.
pub fn decode_response(
    body: &[u8],
    input: &str,
    status: u16,
) -> Result<ClassificationResult, AnalyzeError> {
    let parsed = match serde_json::from_slice::<InferenceResponse>(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            if !(200..300).contains(&status) {
                return Err(AnalyzeError::UpstreamApiError(format!("HTTP {status}")));
            }
            return Err(AnalyzeError::ParseFailure(e.to_string()));
        }
    };

    match parsed {
        InferenceResponse::Error { error } => {
            let message = if error.trim().is_empty() {
                "unknown error".to_string()
            } else {
                error
            };
            Err(AnalyzeError::UpstreamApiError(message))
        }
        InferenceResponse::Flat(items) => {
            let (labels, scores) = items.into_iter().map(|i| (i.label, i.score)).unzip();
            Ok(ClassificationResult {
                sequence: input.to_string(),
                labels,
                scores,
            })
        }
        InferenceResponse::Direct(result) => {
            if result.labels.len() != result.scores.len() {
                return Err(AnalyzeError::ParseFailure(format!(
                    "{} labels but {} scores",
                    result.labels.len(),
                    result.scores.len()
                )));
            }
            Ok(result)
        }
    }
}

/// HTTP client for the inference endpoint.
#[derive(Clone)]
pub struct ClassifierClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    labels: Vec<String>,
}

impl ClassifierClient {
    /// Client for the configured endpoint, token, and timeout.
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.inference_timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint: config.inference_url.clone(),
            token: config.api_token.clone(),
            labels: CANDIDATE_LABELS.iter().map(|l| l.to_string()).collect(),
        }
    }

    /// Candidate labels sent with every request.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Score `text` against the candidate labels.
    pub async fn classify(&self, text: &str) -> Result<ClassificationResult, AnalyzeError> {
        let payload = ClassificationPayload {
            inputs: text.to_string(),
            parameters: ClassificationParameters {
                candidate_labels: self.labels.clone(),
            },
        };

        let start = Instant::now();
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AnalyzeError::NetworkFailure(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|e| AnalyzeError::NetworkFailure(format!("reading body: {e}")))?;

        info!(
            "inference answered HTTP {status} in {}ms",
            start.elapsed().as_millis()
        );
        debug!("raw inference response: {}", String::from_utf8_lossy(&body));

        decode_response(&body, text, status)
    }
}
