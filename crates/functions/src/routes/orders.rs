//! `placeOrder` and `getOrder` handlers.

use axum::extract::State;
use tracing::instrument;

use super::callable::{CallableData, CallableResult};
use crate::error::Result;
use crate::middleware::Caller;
use crate::orders::{OrderView, PlacedOrder};
use crate::state::AppState;

/// `POST /placeOrder`
#[instrument(skip_all)]
pub async fn place_order(
    State(state): State<AppState>,
    caller: Caller,
    CallableData(data): CallableData,
) -> Result<CallableResult<PlacedOrder>> {
    let placed = state.orders().place_order(caller.account(), &data).await?;
    Ok(CallableResult(placed))
}

/// `POST /getOrder`
#[instrument(skip_all)]
pub async fn get_order(
    State(state): State<AppState>,
    caller: Caller,
    CallableData(data): CallableData,
) -> Result<CallableResult<OrderView>> {
    let view = state.orders().get_order(caller.account(), &data).await?;
    Ok(CallableResult(view))
}
