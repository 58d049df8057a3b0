//! Order and line-item documents as persisted in the document store.
//!
//! Field names are camelCase because mobile clients read these documents
//! directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, Address, LineItemId, Money, OrderId, OrderStatus, ProductId, StoreId};

/// Field names the store fills with the commit time.
pub const CREATED_AT_FIELD: &str = "createdAt";
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Monetary summary of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    /// Sum of all line totals.
    pub items_total: Money,
    /// Shipping fee.
    pub shipping: Money,
    /// `items_total + shipping`.
    pub grand_total: Money,
}

/// An order document at `stores/{storeId}/orders/{orderId}`.
///
/// `created_at` and `updated_at` are `None` while the document is being
/// built; the store assigns both at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDocument {
    pub order_id: OrderId,
    pub store_id: StoreId,
    pub store_name: String,
    pub owner_id: AccountId,
    pub buyer_id: AccountId,
    pub buyer_name: String,
    pub buyer_phone: String,
    pub status: OrderStatus,
    #[serde(flatten)]
    pub totals: OrderTotals,
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl OrderDocument {
    /// Whether `account` may read this order (its buyer or the store owner).
    #[must_use]
    pub fn is_visible_to(&self, account: &AccountId) -> bool {
        &self.buyer_id == account || &self.owner_id == account
    }
}

/// A line-item document at `stores/{storeId}/orders/{orderId}/items/{itemId}`.
///
/// Name, image and price are snapshots taken at checkout, decoupled from the
/// live product document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemDocument {
    pub item_id: LineItemId,
    pub product_id: ProductId,
    pub name: String,
    pub image_url: String,
    pub unit_price: Money,
    pub qty: u32,
    pub line_total: Money,
}
