//! HTTP facade: `/analyze`, `/chat` and `/health`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::brain::{
    BrainPack, ExternalClassifier, LexiconClassifier, ResponseDispatcher, SentimentAnalyzer,
    UnavailableClassifier,
};
use crate::config::{AppConfig, ClassifierKind};
use crate::database::{RecordStore, SqliteRecordStore};
use crate::error::{panic_response, AppError};
use crate::models::{
    AnalyzeRequest, AnalyzeResponse, ChatRequest, ChatResponse, HealthResponse,
};

/// Everything a request handler needs. Built once at startup; the brain data
/// is immutable and the store handles its own concurrency.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<SentimentAnalyzer>,
    pub dispatcher: Arc<ResponseDispatcher>,
    pub store: Arc<dyn RecordStore>,
}

impl AppState {
    pub fn new(
        analyzer: SentimentAnalyzer,
        dispatcher: ResponseDispatcher,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            dispatcher: Arc::new(dispatcher),
            store,
        }
    }

    /// Loads the brain data, selects the classifier and opens the record store.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let pack = match &config.brain_path {
            Some(path) => BrainPack::load(path)?,
            None => BrainPack::default(),
        };

        info!(
            positive_words = pack.lexicon.positive_words().count(),
            negative_words = pack.lexicon.negative_words().count(),
            triggers = pack.triggers.entries().len(),
            "Brain data loaded"
        );

        let analyzer = build_analyzer(config, &pack)?;
        info!("Sentiment strategy: {}", analyzer.strategy());

        let store = SqliteRecordStore::open(&config.db_path, config.db_max_connections).await?;
        info!("Record store holds {} samples", store.count().await?);

        Ok(Self::new(
            analyzer,
            ResponseDispatcher::new(pack.triggers),
            Arc::new(store),
        ))
    }
}

pub fn build_analyzer(config: &AppConfig, pack: &BrainPack) -> Result<SentimentAnalyzer, AppError> {
    let analyzer = match config.classifier {
        ClassifierKind::Lexicon => SentimentAnalyzer::new(LexiconClassifier::new(
            pack.lexicon.clone(),
            config.neutral_score,
        )),
        ClassifierKind::External => match &config.external.url {
            Some(url) => {
                let classifier = ExternalClassifier::new(
                    url.clone(),
                    config.external.token.as_deref(),
                    config.external.timeout,
                )?;
                info!("External classifier endpoint: {}", classifier.endpoint());
                SentimentAnalyzer::new(classifier)
            }
            None => {
                warn!("External classifier selected but EMOTWIN_EXTERNAL_URL is not set; every text will be scored NEUTRAL");
                SentimentAnalyzer::new(UnavailableClassifier::new("no external endpoint configured"))
            }
        },
    };
    Ok(analyzer)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/chat", post(chat))
        .route("/health", get(health))
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(request) = payload?;
    request.validate()?;
    let text = request
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Missing or empty field: text".to_string()))?;

    let result = state.analyzer.analyze(&text).await;
    let sample = state.store.append(&text, result.label, result.score).await?;

    info!(
        id = sample.id,
        label = %sample.label,
        score = sample.score,
        created_at = sample.created_at,
        "Text analyzed"
    );
    Ok(Json(result.into()))
}

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload?;
    request.validate()?;
    let message = request.message.unwrap_or_default();

    let response = state.dispatcher.dispatch(&message).to_string();
    debug!(reply = %response, "Chat reply selected");

    Ok(Json(ChatResponse { response }))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
