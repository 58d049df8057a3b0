//! Seed the document store with stores and buyer profiles.
//!
//! Useful for local development and manual testing of `placeOrder`: an order
//! can only be placed against a store document that names its owner.

use kirana_core::{AccountId, StoreId};
use kirana_functions::orders::paths::{self, OWNER_FIELD};
use kirana_functions::store::{
    Document, DocumentStore, PendingWrite, PgDocumentStore, WriteBatch, create_pool, to_document,
};
use serde_json::json;

use super::{CommandError, database_url};

/// Body of a `stores/{storeId}` document.
fn store_document(name: &str, owner: &AccountId) -> Result<Document, CommandError> {
    Ok(to_document(&json!({
        "name": name,
        OWNER_FIELD: owner,
    }))?)
}

/// Body of a `users/{uid}` document.
fn profile_document(name: &str, phone: &str) -> Result<Document, CommandError> {
    Ok(to_document(&json!({ "name": name, "phone": phone }))?)
}

async fn upsert(write: PendingWrite) -> Result<(), CommandError> {
    let pool = create_pool(&database_url()?).await?;
    let store = PgDocumentStore::new(pool);

    let path = write.path().to_string();
    let mut batch = WriteBatch::new();
    batch.push(write);
    let commit_time = store.commit(batch).await?;

    tracing::info!(%path, %commit_time, "Document written");
    Ok(())
}

/// Create or replace a store owned by `owner`.
///
/// # Errors
///
/// Returns an error if the id is not a valid path segment or the write fails.
pub async fn store(id: &str, name: &str, owner: &str) -> Result<(), CommandError> {
    let path = paths::store_path(&StoreId::new(id))?;
    let data = store_document(name, &AccountId::new(owner))?;
    upsert(PendingWrite::set(path, data)).await
}

/// Create or replace a buyer profile.
///
/// # Errors
///
/// Returns an error if the uid is not a valid path segment or the write fails.
pub async fn profile(uid: &str, name: &str, phone: &str) -> Result<(), CommandError> {
    let path = paths::user_path(&AccountId::new(uid))?;
    let data = profile_document(name, phone)?;
    upsert(PendingWrite::set(path, data)).await
}
