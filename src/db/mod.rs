#[cfg(test)]
pub mod memory;
pub mod models;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use std::{fmt, str::FromStr, sync::Arc};
use uuid::Uuid;

use crate::config::{env_non_empty, AppConfig};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document store not available")]
    Unavailable,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("malformed document: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("{0}")]
    Backend(String),
}

/// Operations the handlers need from a document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Names of collections holding at least one document, at most `limit`.
    async fn list_collection_names(&self, limit: usize) -> Result<Vec<String>, StoreError>;

    /// Up to `limit` documents of `collection`, in insertion order.
    async fn get_documents(
        &self,
        collection: &str,
        limit: usize,
    ) -> Result<Vec<Value>, StoreError>;

    /// Persist one JSON object and return its generated id.
    async fn insert_document(
        &self,
        collection: &str,
        document: Value,
    ) -> Result<String, StoreError>;
}

/// The storage collaborator as seen by request handlers.
#[derive(Clone, Default)]
pub enum StoreHandle {
    /// No database configured for this process.
    #[default]
    Missing,
    /// Configured, but the connection could not be established at startup.
    Uninitialized,
    Ready(Arc<dyn DocumentStore>),
}

impl fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreHandle::Missing => write!(f, "StoreHandle::Missing"),
            StoreHandle::Uninitialized => write!(f, "StoreHandle::Uninitialized"),
            StoreHandle::Ready(_) => write!(f, "StoreHandle::Ready"),
        }
    }
}

impl StoreHandle {
    pub fn ready(store: impl DocumentStore + 'static) -> Self {
        StoreHandle::Ready(Arc::new(store))
    }

    pub fn get(&self) -> Result<&Arc<dyn DocumentStore>, StoreError> {
        match self {
            StoreHandle::Ready(store) => Ok(store),
            StoreHandle::Missing | StoreHandle::Uninitialized => Err(StoreError::Unavailable),
        }
    }

    pub async fn get_documents(
        &self,
        collection: &str,
        limit: usize,
    ) -> Result<Vec<Value>, StoreError> {
        self.get()?.get_documents(collection, limit).await
    }

    pub async fn insert_document(
        &self,
        collection: &str,
        document: Value,
    ) -> Result<String, StoreError> {
        self.get()?.insert_document(collection, document).await
    }
}

/// Add `created_at` / `updated_at` to a document about to be inserted.
pub(crate) fn stamp_document(document: Value, now: DateTime<Utc>) -> Result<Value, StoreError> {
    let Value::Object(mut fields) = document else {
        return Err(StoreError::InvalidDocument("document must be a JSON object".to_string()));
    };
    let ts = Value::String(now.to_rfc3339());
    fields.insert("created_at".to_string(), ts.clone());
    fields.insert("updated_at".to_string(), ts);
    Ok(Value::Object(fields))
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub database_name: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
}

impl DbConfig {
    /// Pool settings for `url`, tuned through `DB_POOL_MAX`, `DB_POOL_MIN`
    /// and `DB_CONNECT_TIMEOUT`.
    pub fn new(url: impl Into<String>, database_name: Option<String>) -> Self {
        Self {
            url: url.into(),
            database_name,
            max_connections: env_non_empty("DB_POOL_MAX")
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            min_connections: env_non_empty("DB_POOL_MIN")
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
            connect_timeout_secs: env_non_empty("DB_CONNECT_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        }
    }
}

pub async fn init_pool(config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    tracing::info!("Initializing database connection pool...");

    let mut options = PgConnectOptions::from_str(&config.url)?;
    if let Some(name) = &config.database_name {
        options = options.database(name);
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
        .max_lifetime(std::time::Duration::from_secs(1800))
        .test_before_acquire(true)
        .connect_with(options)
        .await?;

    sqlx::query("SELECT 1").fetch_one(&pool).await?;

    tracing::info!("Database connection pool initialized successfully");

    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            seq BIGSERIAL,
            id UUID PRIMARY KEY,
            collection TEXT NOT NULL,
            body JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_documents_collection_seq
        ON documents(collection, seq)
    "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed successfully");

    Ok(())
}

/// Resolve the storage collaborator for this process. Never fails: a missing
/// `DATABASE_URL` yields `Missing`, a failed connection yields `Uninitialized`.
pub async fn connect(config: &AppConfig) -> StoreHandle {
    let Some(url) = &config.database_url else {
        tracing::info!("DATABASE_URL not set. Running without database connection.");
        return StoreHandle::Missing;
    };

    let db_config = DbConfig::new(url.clone(), config.database_name.clone());
    match init_pool(&db_config).await {
        Ok(pool) => {
            if let Err(e) = run_migrations(&pool).await {
                tracing::error!("Failed to run database migrations: {}", e);
            }
            StoreHandle::ready(PgDocumentStore::new(pool))
        }
        Err(e) => {
            tracing::warn!(
                "Failed to initialize database pool: {}. Continuing without database.",
                e
            );
            StoreHandle::Uninitialized
        }
    }
}

/// Document store over a single Postgres `documents` table.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn list_collection_names(&self, limit: usize) -> Result<Vec<String>, StoreError> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT collection FROM documents ORDER BY collection LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    async fn get_documents(
        &self,
        collection: &str,
        limit: usize,
    ) -> Result<Vec<Value>, StoreError> {
        let rows = sqlx::query_as::<_, (Uuid, Value)>(
            "SELECT id, body FROM documents WHERE collection = $1 ORDER BY seq LIMIT $2",
        )
        .bind(collection)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, mut body)| {
                if let Value::Object(fields) = &mut body {
                    fields.insert("_id".to_string(), Value::String(id.to_string()));
                }
                body
            })
            .collect())
    }

    async fn insert_document(
        &self,
        collection: &str,
        document: Value,
    ) -> Result<String, StoreError> {
        let now = Utc::now();
        let body = stamp_document(document, now)?;
        let id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO documents (id, collection, body, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(collection)
        .bind(&body)
        .bind(now)
        .execute(&self.pool)
        .await?;

        tracing::debug!(collection = %collection, id = %id, "document inserted");

        Ok(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_db_config_defaults() {
        let config = DbConfig::new("postgresql://localhost/portfolio", None);
        assert!(config.max_connections >= 1);
        assert!(config.connect_timeout_secs >= 1);
        assert!(config.database_name.is_none());
    }

    #[test]
    fn test_stamp_document_adds_timestamps() {
        let stamped = stamp_document(json!({ "name": "Al" }), Utc::now()).unwrap();
        assert_eq!(stamped["name"], "Al");
        assert!(stamped["created_at"].is_string());
        assert_eq!(stamped["created_at"], stamped["updated_at"]);
    }

    #[test]
    fn test_stamp_document_rejects_non_objects() {
        let result = stamp_document(json!(["not", "an", "object"]), Utc::now());
        assert!(matches!(result, Err(StoreError::InvalidDocument(_))));
    }

    #[tokio::test]
    async fn test_missing_handle_is_unavailable() {
        let handle = StoreHandle::default();
        let result = handle.get_documents("project", 12).await;
        assert!(matches!(result, Err(StoreError::Unavailable)));
    }

    #[tokio::test]
    async fn test_uninitialized_handle_rejects_inserts() {
        let handle = StoreHandle::Uninitialized;
        let result = handle.insert_document("contact", json!({})).await;
        assert!(matches!(result, Err(StoreError::Unavailable)));
    }

    #[tokio::test]
    async fn test_connect_without_url_is_missing() {
        let config = AppConfig::default();
        assert!(matches!(connect(&config).await, StoreHandle::Missing));
    }
}
