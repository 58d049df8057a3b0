//! Atomic order write.
//!
//! An order is one order document plus one document per line item under
//! `stores/{storeId}/orders/{orderId}`. All of them go into a single
//! create-only [`WriteBatch`], so a reader sees either the whole order or
//! nothing.

use std::time::Duration;

use kirana_core::{
    AccountId, Address, CREATED_AT_FIELD, LineItemDocument, LineItemId, OrderDocument, OrderId,
    OrderStatus, StoreId, UPDATED_AT_FIELD,
};
use tracing::instrument;

use super::buyer::BuyerSnapshot;
use super::paths;
use super::totals::PricedOrder;
use super::within;
use crate::error::AppError;
use crate::store::{
    DocPath, DocumentStore, PendingWrite, StoreError, WriteBatch, generate_id, to_document,
};

/// Everything needed to write a new order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub store_id: StoreId,
    pub store_name: String,
    pub owner_id: AccountId,
    pub buyer_id: AccountId,
    pub buyer: BuyerSnapshot,
    pub address: Address,
    pub priced: PricedOrder,
}

/// An order with its identifiers allocated, ready to commit.
#[derive(Debug, Clone)]
pub struct PreparedOrder {
    pub path: DocPath,
    pub order: OrderDocument,
    pub items: Vec<LineItemDocument>,
}

impl NewOrder {
    /// Allocate the order id and one id per line item.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] if the store id cannot be used as
    /// a path segment.
    pub fn prepare(self) -> Result<PreparedOrder, StoreError> {
        let order_id = OrderId::new(generate_id());
        let path = paths::order_path(&self.store_id, &order_id)?;

        let items = self
            .priced
            .lines
            .into_iter()
            .map(|priced| LineItemDocument {
                item_id: LineItemId::new(generate_id()),
                product_id: priced.line.product_id,
                name: priced.line.name,
                image_url: priced.line.image_url,
                unit_price: priced.line.unit_price,
                qty: priced.line.qty,
                line_total: priced.line_total,
            })
            .collect();

        let order = OrderDocument {
            order_id,
            store_id: self.store_id,
            store_name: self.store_name,
            owner_id: self.owner_id,
            buyer_id: self.buyer_id,
            buyer_name: self.buyer.name,
            buyer_phone: self.buyer.phone,
            status: OrderStatus::Placed,
            totals: self.priced.totals,
            address: self.address,
            created_at: None,
            updated_at: None,
        };

        Ok(PreparedOrder { path, order, items })
    }
}

impl PreparedOrder {
    /// The batch that writes this order: the order document first, then its
    /// line items in cart order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if a document cannot be encoded.
    pub fn to_batch(&self) -> Result<WriteBatch, StoreError> {
        let items = paths::items_collection(&self.path)?;
        let mut batch = WriteBatch::new();

        batch.push(
            PendingWrite::create(self.path.clone(), to_document(&self.order)?)
                .with_server_timestamps(&[CREATED_AT_FIELD, UPDATED_AT_FIELD]),
        );
        for item in &self.items {
            batch.push(PendingWrite::create(
                items.doc(item.item_id.as_str())?,
                to_document(item)?,
            ));
        }

        Ok(batch)
    }
}

/// Commit `order` as one atomic batch and return its id.
///
/// # Errors
///
/// - [`AppError::DeadlineExceeded`] if the commit does not finish in time
/// - [`AppError::Storage`] if the commit fails; nothing is written
#[instrument(skip_all, fields(order_id = %order.order.order_id, item_count = order.items.len()))]
pub async fn commit_order(
    store: &dyn DocumentStore,
    order: PreparedOrder,
    limit: Duration,
) -> Result<OrderId, AppError> {
    let batch = order.to_batch()?;
    let commit_time = within(limit, "order commit", store.commit(batch)).await?;
    tracing::debug!(%commit_time, "Order batch committed");
    Ok(order.order.order_id)
}
