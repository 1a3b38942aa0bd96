//! Lexicon and trigger table bundle, built-in or loaded from a JSON file.
//!
//! File shape (every field optional, missing ones fall back to the built-ins):
//!
//! ```json
//! {
//!   "positive_words": ["хорошо"],
//!   "negative_words": ["плохо"],
//!   "triggers": [{ "trigger": "грустно", "reply": "..." }],
//!   "default_reply": "..."
//! }
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use super::dispatcher::{Trigger, TriggerTable, DEFAULT_REPLY, DEFAULT_TRIGGERS};
use super::lexicon::{Lexicon, NEGATIVE_WORDS, POSITIVE_WORDS};
use crate::error::AppError;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct BrainFile {
    positive_words: Option<Vec<String>>,
    negative_words: Option<Vec<String>>,
    triggers: Option<Vec<Trigger>>,
    default_reply: Option<String>,
}

/// Immutable word lists and replies loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct BrainPack {
    pub lexicon: Lexicon,
    pub triggers: TriggerTable,
}

impl BrainPack {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        info!("Loading lexicon and triggers from {}", path.display());
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let file: BrainFile = serde_json::from_str(raw)
            .map_err(|e| AppError::Config(format!("Invalid brain file: {}", e)))?;

        let positive = file
            .positive_words
            .unwrap_or_else(|| POSITIVE_WORDS.iter().map(|w| w.to_string()).collect());
        let negative = file
            .negative_words
            .unwrap_or_else(|| NEGATIVE_WORDS.iter().map(|w| w.to_string()).collect());
        let lexicon = Lexicon::new(positive, negative)?;

        let triggers = file.triggers.unwrap_or_else(|| {
            DEFAULT_TRIGGERS
                .iter()
                .map(|(t, r)| Trigger {
                    trigger: t.to_string(),
                    reply: r.to_string(),
                })
                .collect()
        });
        let default_reply = file
            .default_reply
            .unwrap_or_else(|| DEFAULT_REPLY.to_string());

        Ok(Self {
            lexicon,
            triggers: TriggerTable::new(triggers, default_reply),
        })
    }
}
