//! Runtime configuration, read once from the environment at startup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::brain::NeutralScore;
use crate::error::AppError;
use crate::fs_manager::DataPaths;

pub const DEFAULT_PORT: u16 = 10000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_EXTERNAL_TIMEOUT_MS: u64 = 10_000;

/// Which classifier answers `/analyze`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierKind {
    #[default]
    Lexicon,
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// Read separately from [`AppConfig`] so logging is up before config errors are reported.
    pub fn from_env() -> Self {
        match env::var("EMOTWIN_LOG_FORMAT") {
            Ok(v) if matches!(v.trim().to_ascii_lowercase().as_str(), "json" | "bunyan") => {
                LogFormat::Json
            }
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExternalConfig {
    pub url: Option<Url>,
    pub token: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub classifier: ClassifierKind,
    pub neutral_score: NeutralScore,
    pub db_path: PathBuf,
    pub db_max_connections: u32,
    pub external: ExternalConfig,
    pub brain_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            classifier: ClassifierKind::default(),
            neutral_score: NeutralScore::default(),
            db_path: DataPaths::default_db_path(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            external: ExternalConfig {
                url: None,
                token: None,
                timeout: Duration::from_millis(DEFAULT_EXTERNAL_TIMEOUT_MS),
            },
            brain_path: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let port = match var("PORT") {
            Some(v) => v
                .parse::<u16>()
                .map_err(|_| AppError::Config(format!("PORT must be a port number, got '{}'", v)))?,
            None => defaults.port,
        };

        let classifier = match var("EMOTWIN_CLASSIFIER") {
            Some(v) => match v.to_ascii_lowercase().as_str() {
                "lexicon" => ClassifierKind::Lexicon,
                "external" | "model" => ClassifierKind::External,
                _ => {
                    return Err(AppError::Config(format!(
                        "EMOTWIN_CLASSIFIER must be 'lexicon' or 'external', got '{}'",
                        v
                    )))
                }
            },
            None => defaults.classifier,
        };

        let neutral_score = match var("EMOTWIN_NEUTRAL_SCORE") {
            Some(v) => NeutralScore::parse(&v).ok_or_else(|| {
                AppError::Config(format!(
                    "EMOTWIN_NEUTRAL_SCORE must be 'fixed' or 'range', got '{}'",
                    v
                ))
            })?,
            None => defaults.neutral_score,
        };

        let db_path = var("EMOTWIN_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let db_max_connections = bounded("EMOTWIN_DB_MAX_CONNECTIONS", 1..=64)?
            .map(|v| v as u32)
            .unwrap_or(defaults.db_max_connections);

        let url = var("EMOTWIN_EXTERNAL_URL")
            .map(|v| Url::parse(&v))
            .transpose()?;
        let timeout = bounded("EMOTWIN_EXTERNAL_TIMEOUT_MS", 100..=60_000)?
            .map(Duration::from_millis)
            .unwrap_or(defaults.external.timeout);

        Ok(Self {
            port,
            classifier,
            neutral_score,
            db_path,
            db_max_connections,
            external: ExternalConfig {
                url,
                token: var("EMOTWIN_EXTERNAL_TOKEN"),
                timeout,
            },
            brain_path: var("EMOTWIN_BRAIN_PATH").map(PathBuf::from),
        })
    }
}

/// Non-blank, trimmed environment variable.
fn var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn bounded(key: &str, range: std::ops::RangeInclusive<u64>) -> Result<Option<u64>, AppError> {
    let Some(raw) = var(key) else {
        return Ok(None);
    };
    match raw.parse::<u64>() {
        Ok(v) if range.contains(&v) => Ok(Some(v)),
        _ => Err(AppError::Config(format!(
            "{} must be an integer in {}..={}, got '{}'",
            key,
            range.start(),
            range.end(),
            raw
        ))),
    }
}
