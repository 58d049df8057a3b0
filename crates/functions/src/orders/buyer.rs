//! Buyer display details stamped onto each order.
//!
//! The profile lookup is best-effort: a missing profile, a failed read or a
//! timeout only degrades the snapshot to the address fields.

use std::time::Duration;

use kirana_core::{AccountId, Address};
use tracing::instrument;

use super::paths;
use crate::store::{DocumentSnapshot, DocumentStore};

/// Name used when neither the profile nor the address has one.
pub const FALLBACK_BUYER_NAME: &str = "Buyer";

const PROFILE_NAME_FIELD: &str = "name";
const PROFILE_PHONE_FIELD: &str = "phone";

/// Buyer name and phone as recorded on the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyerSnapshot {
    pub name: String,
    pub phone: String,
}

/// Read the buyer's profile document, if it can be read in time.
#[instrument(skip_all, fields(buyer_id = %uid))]
pub async fn load_profile(
    store: &dyn DocumentStore,
    uid: &AccountId,
    limit: Duration,
) -> Option<DocumentSnapshot> {
    let path = match paths::user_path(uid) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(error = %e, "Buyer profile path is invalid");
            return None;
        }
    };

    match tokio::time::timeout(limit, store.get(&path)).await {
        Ok(Ok(profile)) => profile,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Buyer profile lookup failed, using address details");
            None
        }
        Err(_) => {
            tracing::warn!(
                timeout_ms = limit.as_millis(),
                "Buyer profile lookup timed out, using address details"
            );
            None
        }
    }
}

/// Pick the buyer's name and phone: profile first, then address.
#[must_use]
pub fn buyer_snapshot(profile: Option<&DocumentSnapshot>, address: &Address) -> BuyerSnapshot {
    let name = profile_field(profile, PROFILE_NAME_FIELD)
        .or_else(|| non_empty(&address.full_name))
        .unwrap_or(FALLBACK_BUYER_NAME);
    let phone = profile_field(profile, PROFILE_PHONE_FIELD)
        .or_else(|| non_empty(&address.phone))
        .unwrap_or_default();

    BuyerSnapshot {
        name: name.to_owned(),
        phone: phone.to_owned(),
    }
}

fn profile_field<'a>(profile: Option<&'a DocumentSnapshot>, field: &str) -> Option<&'a str> {
    profile.and_then(|p| p.get_str(field)).and_then(non_empty)
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.trim().is_empty()).then_some(value)
}
