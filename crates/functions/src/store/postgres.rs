//! `PostgreSQL`-backed document store.
//!
//! # Table: `documents`
//!
//! | column        | type          |                                  |
//! |---------------|---------------|----------------------------------|
//! | `path`        | `TEXT`        | primary key, full document path  |
//! | `parent`      | `TEXT`        | collection path, indexed         |
//! | `doc_id`      | `TEXT`        | last path segment                |
//! | `data`        | `JSONB`       | document body                    |
//! | `update_time` | `TIMESTAMPTZ` | commit time of the last write    |
//!
//! Each [`WriteBatch`] runs in one transaction and takes its commit time from
//! the transaction's `now()`, so every server timestamp in a batch is equal.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/functions/migrations/` and run via:
//! ```bash
//! cargo run -p kirana-cli -- migrate
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::instrument;

use super::{
    CollectionPath, DocPath, Document, DocumentSnapshot, DocumentStore, StoreError, WriteBatch,
    WriteMode,
};

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Document store over a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn parse_body(path: &DocPath, raw: &str) -> Result<Document, StoreError> {
    serde_json::from_str(raw).map_err(|e| {
        StoreError::DataCorruption(format!("document {path} is not a JSON object: {e}"))
    })
}

fn snapshot_from_row(path: DocPath, row: &PgRow) -> Result<DocumentSnapshot, StoreError> {
    let raw: String = row.try_get("data")?;
    let update_time: DateTime<Utc> = row.try_get("update_time")?;
    let data = parse_body(&path, &raw)?;
    Ok(DocumentSnapshot {
        path,
        data,
        update_time,
    })
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[instrument(skip(self), fields(path = %path))]
    async fn get(&self, path: &DocPath) -> Result<Option<DocumentSnapshot>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT data::text AS data, update_time
            FROM documents
            WHERE path = $1
            ",
        )
        .bind(path.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| snapshot_from_row(path.clone(), &r)).transpose()
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn list(
        &self,
        collection: &CollectionPath,
    ) -> Result<Vec<DocumentSnapshot>, StoreError> {
        let rows = sqlx::query(
            r"
            SELECT doc_id, data::text AS data, update_time
            FROM documents
            WHERE parent = $1
            ORDER BY doc_id
            ",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let doc_id: String = row.try_get("doc_id")?;
                snapshot_from_row(collection.doc(&doc_id)?, row)
            })
            .collect()
    }

    #[instrument(skip(self, batch), fields(writes = batch.len()))]
    async fn commit(&self, batch: WriteBatch) -> Result<DateTime<Utc>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let commit_time: DateTime<Utc> = sqlx::query_scalar("SELECT now()")
            .fetch_one(&mut *tx)
            .await?;

        for write in batch.into_writes() {
            let (path, data, mode) = write.resolve(commit_time);
            let body = serde_json::to_string(&data)?;
            let path_str = path.to_string();

            let statement = match mode {
                WriteMode::Create => {
                    r"
                    INSERT INTO documents (path, parent, doc_id, data, update_time)
                    VALUES ($1, $2, $3, $4::jsonb, $5)
                    "
                }
                WriteMode::Set => {
                    r"
                    INSERT INTO documents (path, parent, doc_id, data, update_time)
                    VALUES ($1, $2, $3, $4::jsonb, $5)
                    ON CONFLICT (path)
                    DO UPDATE SET data = EXCLUDED.data, update_time = EXCLUDED.update_time
                    "
                }
            };

            sqlx::query(statement)
                .bind(&path_str)
                .bind(path.parent().as_str())
                .bind(path.id())
                .bind(&body)
                .bind(commit_time)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    if let sqlx::Error::Database(ref db_err) = e
                        && db_err.is_unique_violation()
                    {
                        return StoreError::AlreadyExists(path_str.clone());
                    }
                    StoreError::Database(e)
                })?;
        }

        // Dropping `tx` on any early return above rolls the batch back.
        tx.commit().await?;
        Ok(commit_time)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
