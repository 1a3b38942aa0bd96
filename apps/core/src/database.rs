use crate::error::AppError;
use crate::fs_manager::DataPaths;
use crate::models::{Label, TextSample};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// How long a writer waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Append-only persistence of classified texts.
///
/// Every append is durable before it returns. There is no update or delete.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Persists one sample and returns it with its assigned id and timestamp.
    async fn append(&self, text: &str, label: Label, score: f64) -> Result<TextSample, AppError>;

    /// Number of stored samples. Inspection only; not exposed over HTTP.
    async fn count(&self) -> Result<i64, AppError>;

    /// Releases the underlying storage. Appends after this fail.
    async fn close(&self) {}
}

pub async fn init_db(db_path: &Path, max_connections: u32) -> Result<SqlitePool, AppError> {
    DataPaths::ensure_parent(db_path)?;

    info!("Initializing database at: {}", db_path.display());

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("Database initialized and migrations applied.");

    Ok(pool)
}

/// SQLite-backed record store sharing one connection pool across requests.
#[derive(Clone)]
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn open(db_path: &Path, max_connections: u32) -> Result<Self, AppError> {
        Ok(Self::new(init_db(db_path, max_connections).await?))
    }

    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn append(&self, text: &str, label: Label, score: f64) -> Result<TextSample, AppError> {
        let created_at = Utc::now().timestamp_millis();

        let sample = sqlx::query_as::<_, TextSample>(
            r#"
            INSERT INTO text_samples (text, label, score, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, text, label, score, created_at
            "#,
        )
        .bind(text)
        .bind(label)
        .bind(score)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(sample)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM text_samples")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Database connections closed.");
    }
}
