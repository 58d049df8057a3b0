//! Reading a placed order back.

use std::time::Duration;

use kirana_core::{AccountId, LineItemDocument, OrderDocument, OrderId, StoreId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use super::paths;
use super::within;
use crate::error::AppError;
use crate::store::{DocumentSnapshot, DocumentStore};

/// `getOrder` payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetOrderPayload {
    pub store_id: Option<String>,
    pub order_id: Option<String>,
}

/// An order together with its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderView {
    pub order: OrderDocument,
    pub items: Vec<LineItemDocument>,
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::InvalidArgument(format!("{field} is required")))
}

/// Fetch an order visible to `caller`.
///
/// # Errors
///
/// - [`AppError::Unauthenticated`] without a caller
/// - [`AppError::InvalidArgument`] if `storeId` or `orderId` is missing
/// - [`AppError::NotFound`] if the order does not exist
/// - [`AppError::PermissionDenied`] if the caller is neither the buyer nor
///   the store owner
/// - [`AppError::DeadlineExceeded`] / [`AppError::Storage`] on read failures
#[instrument(skip_all)]
pub async fn get_order(
    store: &dyn DocumentStore,
    caller: Option<&AccountId>,
    data: &Value,
    limit: Duration,
) -> Result<OrderView, AppError> {
    let caller = caller.ok_or_else(|| {
        AppError::Unauthenticated("the function must be called while authenticated".to_string())
    })?;

    let payload = GetOrderPayload::deserialize(data)
        .map_err(|e| AppError::InvalidArgument(format!("malformed request: {e}")))?;
    let store_id = StoreId::new(required(payload.store_id, "storeId")?);
    let order_id = OrderId::new(required(payload.order_id, "orderId")?);

    let path = paths::order_path(&store_id, &order_id)?;
    let snapshot = within(limit, "order lookup", store.get(&path))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {order_id} does not exist")))?;

    let order: OrderDocument = snapshot.decode()?;
    if !order.is_visible_to(caller) {
        return Err(AppError::PermissionDenied(format!(
            "order {order_id} belongs to another account"
        )));
    }

    let items_path = paths::items_collection(&path)?;
    let items = within(limit, "line item lookup", store.list(&items_path))
        .await?
        .iter()
        .map(DocumentSnapshot::decode::<LineItemDocument>)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(OrderView { order, items })
}
