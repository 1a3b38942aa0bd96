//! Scripted reply selection.
//!
//! Scans an ordered trigger table and returns the reply bound to the first
//! trigger phrase found in the message. Definition order is the only
//! tie-breaker when several triggers match.

use serde::Deserialize;

/// Built-in trigger table, in match order.
pub const DEFAULT_TRIGGERS: &[(&str, &str)] = &[
    (
        "грустно",
        "Раньше ты говорил: «Даже в темноте я находил свет».",
    ),
    (
        "устал",
        "Ты уже прошёл 70% пути. Остановись, но не сдавайся.",
    ),
    (
        "не знаю",
        "Давай вспомним, что ты чувствовал в моменты решений?",
    ),
    (
        "скучаю",
        "Ты оставил много тёплых слов самому себе. Хочешь их услышать?",
    ),
];

/// Reply used when no trigger matches ("I hear you, tell me a bit more.").
pub const DEFAULT_REPLY: &str = "Я слышу тебя. Расскажи чуть больше.";

/// One trigger phrase and the reply it selects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Trigger {
    pub trigger: String,
    pub reply: String,
}

/// Ordered trigger table plus the fallback reply.
#[derive(Debug, Clone)]
pub struct TriggerTable {
    entries: Vec<Trigger>,
    default_reply: String,
}

impl Default for TriggerTable {
    fn default() -> Self {
        Self::new(
            DEFAULT_TRIGGERS.iter().map(|(t, r)| Trigger {
                trigger: t.to_string(),
                reply: r.to_string(),
            }),
            DEFAULT_REPLY,
        )
    }
}

impl TriggerTable {
    /// Builds a table keeping the given order. Trigger phrases are lowercased;
    /// blank phrases are dropped since they would match everything.
    pub fn new<I>(entries: I, default_reply: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = Trigger>,
    {
        let entries = entries
            .into_iter()
            .filter_map(|t| {
                let trigger = t.trigger.trim().to_lowercase();
                (!trigger.is_empty()).then_some(Trigger {
                    trigger,
                    reply: t.reply,
                })
            })
            .collect();

        Self {
            entries,
            default_reply: default_reply.into(),
        }
    }

    pub fn entries(&self) -> &[Trigger] {
        &self.entries
    }

    pub fn default_reply(&self) -> &str {
        &self.default_reply
    }
}

/// First-match dispatcher over a [`TriggerTable`].
#[derive(Debug, Clone, Default)]
pub struct ResponseDispatcher {
    table: TriggerTable,
}

impl ResponseDispatcher {
    pub fn new(table: TriggerTable) -> Self {
        Self { table }
    }

    /// Returns the trigger that selects the reply, if any.
    pub fn matching_trigger(&self, message: &str) -> Option<&Trigger> {
        let message = message.to_lowercase();
        self.table
            .entries
            .iter()
            .find(|t| message.contains(t.trigger.as_str()))
    }

    pub fn dispatch(&self, message: &str) -> &str {
        self.matching_trigger(message)
            .map(|t| t.reply.as_str())
            .unwrap_or(self.table.default_reply.as_str())
    }
}
