//! Order placement and lookup.
//!
//! `placeOrder` runs these steps for every call:
//!
//! 1. [`validate`] the payload (no I/O)
//! 2. resolve the store owner and the buyer profile concurrently
//! 3. price the lines ([`totals`])
//! 4. build the buyer snapshot ([`buyer`])
//! 5. commit the order and its line items as one batch ([`writer`])
//!
//! Any failure before step 5 aborts with nothing written. A failed commit
//! also leaves nothing behind.

pub mod buyer;
pub mod lookup;
pub mod owner;
pub mod paths;
pub mod totals;
pub mod validate;
pub mod writer;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use kirana_core::{AccountId, OrderId};
use serde::Serialize;
use serde_json::Value;
use tracing::{Span, instrument};

use crate::error::AppError;
use crate::store::{DocumentStore, StoreError};

pub use lookup::OrderView;
pub use validate::{OrderLine, PlaceOrderRequest, ValidationError, validate};

/// Result of a successful `placeOrder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub order_id: OrderId,
}

/// Run a backend call with a deadline.
///
/// # Errors
///
/// Returns [`AppError::DeadlineExceeded`] if `call` does not finish within
/// `limit`, or the call's own error converted to an [`AppError`].
pub async fn within<T, F>(limit: Duration, step: &str, call: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(AppError::DeadlineExceeded(format!(
            "{step} did not finish within {}ms",
            limit.as_millis()
        ))),
    }
}

/// Order operations over an injected document store.
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn DocumentStore>,
    timeout: Duration,
}

impl OrderService {
    /// Create a service that bounds every backend call by `timeout`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Place an order for `caller`.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthenticated`] without a caller
    /// - [`AppError::InvalidArgument`] for an invalid payload or a total out
    ///   of range
    /// - [`AppError::NotFound`] / [`AppError::FailedPrecondition`] when the
    ///   store is missing or has no owner
    /// - [`AppError::DeadlineExceeded`] / [`AppError::Storage`] when the
    ///   store lookup or the commit fails
    #[instrument(
        skip_all,
        fields(
            store_id = tracing::field::Empty,
            order_id = tracing::field::Empty,
            item_count = tracing::field::Empty,
        )
    )]
    pub async fn place_order(
        &self,
        caller: Option<&AccountId>,
        data: &Value,
    ) -> Result<PlacedOrder, AppError> {
        let PlaceOrderRequest {
            buyer_id,
            store_id,
            store_name,
            address,
            items,
        } = validate(caller, data)?;

        let span = Span::current();
        span.record("store_id", store_id.as_str());
        span.record("item_count", items.len());

        let store = self.store.as_ref();
        let (owner_id, profile) = tokio::join!(
            owner::resolve_owner(store, &store_id, self.timeout),
            buyer::load_profile(store, &buyer_id, self.timeout),
        );
        let owner_id = owner_id?;

        let priced = totals::price_order(items)?;
        let buyer = buyer::buyer_snapshot(profile.as_ref(), &address);

        let prepared = writer::NewOrder {
            store_id,
            store_name,
            owner_id,
            buyer_id,
            buyer,
            address,
            priced,
        }
        .prepare()?;
        let grand_total = prepared.order.totals.grand_total;

        let order_id = writer::commit_order(store, prepared, self.timeout).await?;
        span.record("order_id", order_id.as_str());

        tracing::info!(%grand_total, "Order placed");
        Ok(PlacedOrder { order_id })
    }

    /// Read an order back for its buyer or the store owner.
    ///
    /// # Errors
    ///
    /// See [`lookup::get_order`].
    pub async fn get_order(
        &self,
        caller: Option<&AccountId>,
        data: &Value,
    ) -> Result<OrderView, AppError> {
        lookup::get_order(self.store.as_ref(), caller, data, self.timeout).await
    }

    /// Check that the backing store is reachable.
    ///
    /// # Errors
    ///
    /// Returns the store's error, or [`AppError::DeadlineExceeded`].
    pub async fn ping(&self) -> Result<(), AppError> {
        within(self.timeout, "store ping", self.store.ping()).await
    }
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
