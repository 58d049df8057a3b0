//! Document store abstraction backing the callable functions.
//!
//! Documents are JSON objects addressed by slash-separated paths
//! (`stores/{storeId}/orders/{orderId}/items/{itemId}`). The store offers
//! exactly what the order functions need from a hosted document database:
//!
//! - get a document by path
//! - list the documents of one collection
//! - commit a [`WriteBatch`] atomically, filling server-timestamp fields with
//!   a single commit time
//! - generate random document identifiers ([`generate_id`])
//!
//! Implementations:
//! - [`PgDocumentStore`]: `PostgreSQL` `documents` table, one transaction per batch
//! - [`MemoryStore`]: in-process map with fault injection for tests

pub mod batch;
pub mod memory;
pub mod path;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub use batch::{PendingWrite, WriteBatch, WriteMode};
pub use memory::MemoryStore;
pub use path::{CollectionPath, DocPath};
pub use postgres::{PgDocumentStore, create_pool};

/// A document body.
pub type Document = serde_json::Map<String, Value>;

/// Length of generated document identifiers.
pub const GENERATED_ID_LENGTH: usize = 20;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A path segment was empty or contained `/`.
    #[error("invalid document path: {0}")]
    InvalidPath(String),

    /// A create-only write hit an existing document.
    #[error("document already exists: {0}")]
    AlreadyExists(String),

    /// Stored data could not be decoded.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// A document body could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A document read from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub path: DocPath,
    pub data: Document,
    /// Commit time of the write that produced this version.
    pub update_time: DateTime<Utc>,
}

impl DocumentSnapshot {
    /// A string field, or `None` if absent or not a string.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }

    /// Decode the whole document into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DataCorruption`] if the document does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(Value::Object(self.data.clone())).map_err(|e| {
            StoreError::DataCorruption(format!("document {} is malformed: {e}", self.path))
        })
    }
}

/// Interface for document persistence.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document, or `None` if it does not exist.
    async fn get(&self, path: &DocPath) -> Result<Option<DocumentSnapshot>, StoreError>;

    /// All documents directly inside `collection`, ordered by document id.
    async fn list(&self, collection: &CollectionPath)
    -> Result<Vec<DocumentSnapshot>, StoreError>;

    /// Apply every write in `batch` or none of them.
    ///
    /// Returns the commit time used for server-timestamp fields.
    async fn commit(&self, batch: WriteBatch) -> Result<DateTime<Utc>, StoreError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Generate a random 20-character alphanumeric document identifier.
#[must_use]
pub fn generate_id() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(GENERATED_ID_LENGTH)
        .map(char::from)
        .collect()
}

/// Convert a serializable value into a document body.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] if `value` cannot be encoded, or
/// [`StoreError::DataCorruption`] if it encodes to something other than an
/// object.
pub fn to_document<T: serde::Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::DataCorruption(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_generate_id_shape() {
        let id = generate_id();
        assert_eq!(id.len(), GENERATED_ID_LENGTH);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_id_is_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_to_document_rejects_non_objects() {
        assert!(to_document(&serde_json::json!({"a": 1})).is_ok());
        assert!(matches!(
            to_document(&42),
            Err(StoreError::DataCorruption(_))
        ));
    }
}
