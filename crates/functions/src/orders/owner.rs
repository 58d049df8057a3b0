//! Store ownership resolution.

use std::time::Duration;

use kirana_core::{AccountId, StoreId};
use tracing::instrument;

use super::paths::{self, OWNER_FIELD};
use super::within;
use crate::error::AppError;
use crate::store::{DocumentSnapshot, DocumentStore};

/// Look up the account that owns `store_id`.
///
/// # Errors
///
/// - [`AppError::NotFound`] if the store document does not exist
/// - [`AppError::FailedPrecondition`] if it has no usable `ownerId`
/// - [`AppError::DeadlineExceeded`] if the read times out
/// - [`AppError::Storage`] if the read fails
#[instrument(skip_all, fields(store_id = %store_id))]
pub async fn resolve_owner(
    store: &dyn DocumentStore,
    store_id: &StoreId,
    limit: Duration,
) -> Result<AccountId, AppError> {
    let path = paths::store_path(store_id)?;
    let snapshot = within(limit, "store lookup", store.get(&path)).await?;
    owner_of(store_id, snapshot.as_ref())
}

/// Owner of an already-fetched store document.
///
/// # Errors
///
/// Same categories as [`resolve_owner`], minus the I/O ones.
pub fn owner_of(
    store_id: &StoreId,
    snapshot: Option<&DocumentSnapshot>,
) -> Result<AccountId, AppError> {
    let snapshot =
        snapshot.ok_or_else(|| AppError::NotFound(format!("store {store_id} does not exist")))?;

    snapshot
        .get_str(OWNER_FIELD)
        .filter(|owner| !owner.trim().is_empty())
        .map(AccountId::new)
        .ok_or_else(|| AppError::FailedPrecondition(format!("store {store_id} has no owner")))
}
