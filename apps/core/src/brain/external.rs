//! Remote pretrained sentiment model, called as a black box.
//!
//! Talks to a Hugging Face style inference endpoint: `POST {"inputs": text}`
//! answered by `[{label, score}]` or `[[{label, score}, ...]]`. Every failure
//! is reported as `ClassifierUnavailable`; the analyzer decides what to do
//! with it.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use url::Url;

use crate::error::AppError;
use crate::models::{Classification, Label};

/// Longest slice of an error body kept in the error message.
const MAX_ERROR_BODY_BYTES: usize = 512;

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    label: String,
    score: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<Candidate>>),
    Flat(Vec<Candidate>),
}

impl InferenceResponse {
    fn best(self) -> Option<Candidate> {
        let candidates = match self {
            InferenceResponse::Nested(batches) => batches.into_iter().next()?,
            InferenceResponse::Flat(candidates) => candidates,
        };
        candidates
            .into_iter()
            .filter(|c| c.score.is_finite())
            .max_by(|a, b| {
                a.score
                    .partial_cmp(&b.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

/// Maps a model label to ours. Handles both named labels and the
/// `LABEL_n` ids of three-class sentiment models (0 neg, 1 neutral, 2 pos).
pub fn map_label(raw: &str) -> Option<Label> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "positive" | "pos" | "label_2" => Some(Label::Positive),
        "negative" | "neg" | "label_0" => Some(Label::Negative),
        "neutral" | "neu" | "label_1" => Some(Label::Neutral),
        _ => None,
    }
}

/// Cuts `body` to at most `max` bytes on a char boundary.
fn truncate_body(body: &str, max: usize) -> &str {
    if body.len() <= max {
        return body;
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

/// HTTP client for the remote sentiment model.
#[derive(Debug, Clone)]
pub struct ExternalClassifier {
    client: Client,
    endpoint: Url,
}

impl ExternalClassifier {
    pub fn new(endpoint: Url, token: Option<&str>, timeout: Duration) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| AppError::Config(format!("Invalid external classifier token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn classify(&self, text: &str) -> Result<Classification, AppError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({ "inputs": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ClassifierUnavailable(format!(
                "Inference request failed with status {}: {}",
                status,
                truncate_body(&body, MAX_ERROR_BODY_BYTES)
            )));
        }

        let parsed: InferenceResponse = response.json().await?;
        let best = parsed.best().ok_or_else(|| {
            AppError::ClassifierUnavailable("Inference response had no candidates".to_string())
        })?;

        let label = map_label(&best.label).ok_or_else(|| {
            AppError::ClassifierUnavailable(format!("Unknown model label: {}", best.label))
        })?;

        Ok(Classification {
            label,
            score: best.score.clamp(0.0, 1.0),
        })
    }
}
