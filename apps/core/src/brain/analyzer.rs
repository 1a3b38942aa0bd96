//! Sentiment Analyzer - picks the active classification strategy and applies
//! the degrade-to-neutral contract.
//!
//! Whatever classifier is active, a failure to classify never fails the
//! request: the analyzer answers `(NEUTRAL, 0.5)` instead.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::external::ExternalClassifier;
use super::lexicon::LexiconClassifier;
use crate::error::AppError;
use crate::models::Classification;

/// Public interface of a sentiment classification strategy.
#[async_trait]
pub trait SentimentClassifier: Send + Sync + 'static {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn classify(&self, text: &str) -> Result<Classification, AppError>;
}

#[async_trait]
impl SentimentClassifier for LexiconClassifier {
    fn name(&self) -> &'static str {
        "lexicon"
    }

    async fn classify(&self, text: &str) -> Result<Classification, AppError> {
        Ok(LexiconClassifier::classify(self, text))
    }
}

#[async_trait]
impl SentimentClassifier for ExternalClassifier {
    fn name(&self) -> &'static str {
        "external"
    }

    async fn classify(&self, text: &str) -> Result<Classification, AppError> {
        ExternalClassifier::classify(self, text).await
    }
}

/// Stand-in for an external model that could not be set up at startup.
pub struct UnavailableClassifier {
    reason: String,
}

impl UnavailableClassifier {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl SentimentClassifier for UnavailableClassifier {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    async fn classify(&self, _text: &str) -> Result<Classification, AppError> {
        Err(AppError::ClassifierUnavailable(self.reason.clone()))
    }
}

/// Entry point used by the HTTP layer.
pub struct SentimentAnalyzer {
    classifier: Box<dyn SentimentClassifier>,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new(LexiconClassifier::default())
    }
}

impl SentimentAnalyzer {
    pub fn new<C: SentimentClassifier>(classifier: C) -> Self {
        Self {
            classifier: Box::new(classifier),
        }
    }

    pub fn strategy(&self) -> &'static str {
        self.classifier.name()
    }

    /// Classifies `text`. Never fails.
    pub async fn analyze(&self, text: &str) -> Classification {
        match self.classifier.classify(text).await {
            Ok(result) => {
                debug!(
                    strategy = self.classifier.name(),
                    label = %result.label,
                    score = result.score,
                    "Text classified"
                );
                result
            }
            Err(e) => {
                warn!(
                    strategy = self.classifier.name(),
                    error = %e,
                    "Classifier failed, falling back to neutral"
                );
                Classification::NEUTRAL_FALLBACK
            }
        }
    }
}
