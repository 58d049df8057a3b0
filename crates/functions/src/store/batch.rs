//! Atomic multi-document write batches.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use super::{DocPath, Document};

/// How a write treats an existing document at the same path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Fail the whole batch if the document already exists.
    Create,
    /// Replace the document if it exists.
    Set,
}

/// A single document write waiting in a [`WriteBatch`].
#[derive(Debug, Clone)]
pub struct PendingWrite {
    path: DocPath,
    data: Document,
    mode: WriteMode,
    server_timestamps: Vec<String>,
}

impl PendingWrite {
    /// A create-only write.
    #[must_use]
    pub const fn create(path: DocPath, data: Document) -> Self {
        Self {
            path,
            data,
            mode: WriteMode::Create,
            server_timestamps: Vec::new(),
        }
    }

    /// An upsert.
    #[must_use]
    pub const fn set(path: DocPath, data: Document) -> Self {
        Self {
            path,
            data,
            mode: WriteMode::Set,
            server_timestamps: Vec::new(),
        }
    }

    /// Fill each named field with the commit time when the batch commits.
    #[must_use]
    pub fn with_server_timestamps(mut self, fields: &[&str]) -> Self {
        self.server_timestamps
            .extend(fields.iter().map(|f| (*f).to_owned()));
        self
    }

    #[must_use]
    pub const fn path(&self) -> &DocPath {
        &self.path
    }

    #[must_use]
    pub const fn data(&self) -> &Document {
        &self.data
    }

    #[must_use]
    pub const fn mode(&self) -> WriteMode {
        self.mode
    }

    /// Stamp server-timestamp fields with `commit_time` and split the write
    /// into its parts.
    ///
    /// Every write in one batch is resolved with the same `commit_time`.
    #[must_use]
    pub fn resolve(self, commit_time: DateTime<Utc>) -> (DocPath, Document, WriteMode) {
        let Self {
            path,
            mut data,
            mode,
            server_timestamps,
        } = self;

        let stamp = commit_time.to_rfc3339_opts(SecondsFormat::Micros, true);
        for field in server_timestamps {
            data.insert(field, Value::String(stamp.clone()));
        }

        (path, data, mode)
    }
}

/// An ordered set of writes committed all-or-nothing.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    writes: Vec<PendingWrite>,
}

impl WriteBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a write.
    pub fn push(&mut self, write: PendingWrite) -> &mut Self {
        self.writes.push(write);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Iterate over the queued writes in order.
    pub fn iter(&self) -> impl Iterator<Item = &PendingWrite> {
        self.writes.iter()
    }

    /// Consume the batch, yielding writes in the order they were pushed.
    #[must_use]
    pub fn into_writes(self) -> Vec<PendingWrite> {
        self.writes
    }
}
