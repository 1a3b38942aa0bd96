//! # Brain Module
//!
//! Sentiment classification and scripted replies for EmoTwin.
//!
//! ## Components
//! - `lexicon`: word-list majority vote (default strategy)
//! - `external`: remote pretrained sentiment model (optional strategy)
//! - `analyzer`: strategy selection and neutral fallback
//! - `dispatcher`: first-match trigger phrase replies
//! - `pack`: built-in or file-loaded word lists and trigger table

pub mod analyzer;
pub mod dispatcher;
pub mod external;
pub mod lexicon;
pub mod pack;

pub use analyzer::{SentimentAnalyzer, UnavailableClassifier};
pub use dispatcher::ResponseDispatcher;
pub use external::ExternalClassifier;
pub use lexicon::{LexiconClassifier, NeutralScore};
pub use pack::BrainPack;
