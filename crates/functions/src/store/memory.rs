//! In-memory document store.
//!
//! Used by tests and by `FUNCTIONS_STORE=memory` for local development.
//! Faults can be injected to exercise failure paths: failing reads under a
//! path prefix, slowing reads down, or failing a commit at a given write.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use tokio::sync::RwLock;

use super::{
    CollectionPath, DocPath, Document, DocumentSnapshot, DocumentStore, StoreError, WriteBatch,
    WriteMode,
};

#[derive(Debug, Clone)]
struct StoredDocument {
    data: Document,
    update_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
struct Faults {
    fail_reads_under: Option<String>,
    read_delay: Option<Duration>,
    fail_on_write: Option<usize>,
}

/// Document store that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<BTreeMap<DocPath, StoredDocument>>,
    faults: RwLock<Faults>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every read whose path starts with `prefix` (`None` clears it).
    pub async fn set_fail_reads_under(&self, prefix: Option<&str>) {
        self.faults.write().await.fail_reads_under = prefix.map(str::to_owned);
    }

    /// Delay every read by `delay` (`None` clears it).
    pub async fn set_read_delay(&self, delay: Option<Duration>) {
        self.faults.write().await.read_delay = delay;
    }

    /// Fail the next commits when they reach the write at `index`
    /// (`None` clears it). Writes before `index` are staged but never applied.
    pub async fn set_fail_on_write(&self, index: Option<usize>) {
        self.faults.write().await.fail_on_write = index;
    }

    /// Number of documents currently stored.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether the store holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// Paths of every stored document, in path order.
    pub async fn paths(&self) -> Vec<String> {
        self.documents
            .read()
            .await
            .keys()
            .map(ToString::to_string)
            .collect()
    }

    async fn check_read(&self, path: &str) -> Result<(), StoreError> {
        let faults = self.faults.read().await.clone();
        if let Some(delay) = faults.read_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(prefix) = faults.fail_reads_under
            && path.starts_with(&prefix)
        {
            return Err(StoreError::Unavailable(format!("injected read fault at {path}")));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &DocPath) -> Result<Option<DocumentSnapshot>, StoreError> {
        self.check_read(&path.to_string()).await?;

        let documents = self.documents.read().await;
        Ok(documents.get(path).map(|stored| DocumentSnapshot {
            path: path.clone(),
            data: stored.data.clone(),
            update_time: stored.update_time,
        }))
    }

    async fn list(
        &self,
        collection: &CollectionPath,
    ) -> Result<Vec<DocumentSnapshot>, StoreError> {
        self.check_read(collection.as_str()).await?;

        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|(path, _)| path.parent() == collection)
            .map(|(path, stored)| DocumentSnapshot {
                path: path.clone(),
                data: stored.data.clone(),
                update_time: stored.update_time,
            })
            .collect())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<DateTime<Utc>, StoreError> {
        let fail_on_write = self.faults.read().await.fail_on_write;
        // Server timestamps are stored with microsecond precision.
        let commit_time = Utc::now().trunc_subsecs(6);

        // Readers stay blocked until the batch is fully staged and applied.
        let mut documents = self.documents.write().await;
        let mut staged: Vec<(DocPath, StoredDocument)> = Vec::with_capacity(batch.len());

        for (index, write) in batch.into_writes().into_iter().enumerate() {
            if fail_on_write == Some(index) {
                return Err(StoreError::Unavailable(format!(
                    "injected commit fault at write {index}"
                )));
            }

            let (path, data, mode) = write.resolve(commit_time);
            let exists = documents.contains_key(&path) || staged.iter().any(|(p, _)| p == &path);
            if mode == WriteMode::Create && exists {
                return Err(StoreError::AlreadyExists(path.to_string()));
            }

            staged.push((
                path,
                StoredDocument {
                    data,
                    update_time: commit_time,
                },
            ));
        }

        documents.extend(staged);
        Ok(commit_time)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
