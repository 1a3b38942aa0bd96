use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use validator::Validate;

/// Coarse sentiment label attached to every analyzed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Label {
    Positive,
    Negative,
    Neutral,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Positive => "POSITIVE",
            Label::Negative => "NEGATIVE",
            Label::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label and confidence produced together by one classification call.
/// The score is a placeholder confidence, not a probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: Label,
    pub score: f64,
}

impl Classification {
    /// Result used whenever the active classifier cannot answer.
    pub const NEUTRAL_FALLBACK: Classification = Classification {
        label: Label::Neutral,
        score: 0.5,
    };
}

/// A persisted, classified text.
#[derive(Debug, FromRow)]
pub struct TextSample {
    /// Auto-assigned, strictly increasing identifier.
    pub id: i64,
    /// The text as submitted.
    pub text: String,
    pub label: Label,
    pub score: f64,
    /// Unix timestamp (milliseconds) assigned at insert time.
    pub created_at: i64,
}

// --- HTTP payloads ---

#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[validate(required)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub label: Label,
    pub score: f64,
}

impl From<Classification> for AnalyzeResponse {
    fn from(c: Classification) -> Self {
        Self {
            label: c.label,
            score: c.score,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(required)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
