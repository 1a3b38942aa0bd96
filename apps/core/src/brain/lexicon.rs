//! Lexicon-based sentiment classification.
//!
//! Counts how many distinct positive and negative lexicon entries occur in the
//! text as substrings and picks the majority polarity. Matching is substring
//! containment, so an entry can fire inside a longer, unrelated word.

use rand::Rng;
use std::collections::BTreeSet;

use crate::error::AppError;
use crate::models::{Classification, Label};

/// Built-in positive lexicon (lowercase stems)
pub const POSITIVE_WORDS: &[&str] = &[
    "хорошо",
    "отлично",
    "прекрасно",
    "замечательно",
    "радост",
    "счастлив",
    "люблю",
    "спокойно",
    "весело",
    "вдохнов",
    "надежд",
    "спасибо",
    "good",
    "great",
    "happy",
    "love",
];

/// Built-in negative lexicon (lowercase stems)
pub const NEGATIVE_WORDS: &[&str] = &[
    "плохо",
    "грустно",
    "тяжело",
    "устал",
    "одиноко",
    "страшно",
    "тревож",
    "боюсь",
    "злюсь",
    "больно",
    "скучаю",
    "обидно",
    "sad",
    "bad",
    "tired",
    "lonely",
];

/// Score range for a polar (positive or negative) verdict.
const POLAR_SCORE_MIN: f64 = 0.5;
const POLAR_SCORE_MAX: f64 = 1.0;

/// Score range used by [`NeutralScore::Range`].
const NEUTRAL_RANGE_MIN: f64 = 0.3;
const NEUTRAL_RANGE_MAX: f64 = 0.7;

/// Score assigned to a NEUTRAL verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeutralScore {
    /// Always 0.5.
    Fixed,
    /// Uniform in [0.3, 0.7).
    #[default]
    Range,
}

impl NeutralScore {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixed" => Some(NeutralScore::Fixed),
            "range" | "random" => Some(NeutralScore::Range),
            _ => None,
        }
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            NeutralScore::Fixed => 0.5,
            NeutralScore::Range => rng.gen_range(NEUTRAL_RANGE_MIN..NEUTRAL_RANGE_MAX),
        }
    }
}

/// Two disjoint word sets, immutable once built.
#[derive(Debug, Clone)]
pub struct Lexicon {
    positive: BTreeSet<String>,
    negative: BTreeSet<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        // Built-in lists are disjoint.
        Self {
            positive: normalize(POSITIVE_WORDS.iter().copied()),
            negative: normalize(NEGATIVE_WORDS.iter().copied()),
        }
    }
}

impl Lexicon {
    /// Builds a lexicon from arbitrary word lists. Entries are lowercased and
    /// deduplicated; blank entries are dropped. Fails if the sets overlap.
    pub fn new<P, N, S>(positive: P, negative: N) -> Result<Self, AppError>
    where
        P: IntoIterator<Item = S>,
        N: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let positive = normalize(positive);
        let negative = normalize(negative);

        let overlap: Vec<&str> = positive.intersection(&negative).map(String::as_str).collect();
        if !overlap.is_empty() {
            return Err(AppError::Config(format!(
                "Lexicon word(s) listed as both positive and negative: {}",
                overlap.join(", ")
            )));
        }

        Ok(Self { positive, negative })
    }

    pub fn positive_words(&self) -> impl Iterator<Item = &str> {
        self.positive.iter().map(String::as_str)
    }

    pub fn negative_words(&self) -> impl Iterator<Item = &str> {
        self.negative.iter().map(String::as_str)
    }

    /// Number of distinct positive and negative entries found in `text`.
    /// `text` must already be lowercase.
    fn counts(&self, text: &str) -> (usize, usize) {
        let pos = self.positive.iter().filter(|w| text.contains(w.as_str())).count();
        let neg = self.negative.iter().filter(|w| text.contains(w.as_str())).count();
        (pos, neg)
    }
}

fn normalize<I, S>(words: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| w.as_ref().trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Majority-vote classifier over a [`Lexicon`].
#[derive(Debug, Clone)]
pub struct LexiconClassifier {
    lexicon: Lexicon,
    neutral_score: NeutralScore,
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new(Lexicon::default(), NeutralScore::default())
    }
}

impl LexiconClassifier {
    pub fn new(lexicon: Lexicon, neutral_score: NeutralScore) -> Self {
        Self {
            lexicon,
            neutral_score,
        }
    }

    /// Label only, without the random score draw.
    pub fn label(&self, text: &str) -> Label {
        let (pos, neg) = self.lexicon.counts(&text.to_lowercase());
        if pos > neg {
            Label::Positive
        } else if neg > pos {
            Label::Negative
        } else {
            Label::Neutral
        }
    }

    pub fn classify(&self, text: &str) -> Classification {
        self.classify_with_rng(text, &mut rand::thread_rng())
    }

    pub fn classify_with_rng<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Classification {
        let label = self.label(text);
        let score = match label {
            Label::Positive | Label::Negative => rng.gen_range(POLAR_SCORE_MIN..POLAR_SCORE_MAX),
            Label::Neutral => self.neutral_score.draw(rng),
        };
        Classification { label, score }
    }
}
