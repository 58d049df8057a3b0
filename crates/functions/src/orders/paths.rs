//! Where order data lives in the document store.
//!
//! Every helper fails with [`StoreError::InvalidPath`] when an identifier is
//! empty or contains `/`.

#![allow(clippy::missing_errors_doc)]

use kirana_core::{AccountId, OrderId, StoreId};

use crate::store::{CollectionPath, DocPath, StoreError};

pub const STORES: &str = "stores";
pub const ORDERS: &str = "orders";
pub const ITEMS: &str = "items";
pub const USERS: &str = "users";

/// Owner field on a store document.
pub const OWNER_FIELD: &str = "ownerId";

/// `stores/{storeId}`
pub fn store_path(store_id: &StoreId) -> Result<DocPath, StoreError> {
    CollectionPath::root(STORES)?.doc(store_id.as_str())
}

/// `stores/{storeId}/orders`
pub fn orders_collection(store_id: &StoreId) -> Result<CollectionPath, StoreError> {
    store_path(store_id)?.collection(ORDERS)
}

/// `stores/{storeId}/orders/{orderId}`
pub fn order_path(store_id: &StoreId, order_id: &OrderId) -> Result<DocPath, StoreError> {
    orders_collection(store_id)?.doc(order_id.as_str())
}

/// `stores/{storeId}/orders/{orderId}/items`
pub fn items_collection(order: &DocPath) -> Result<CollectionPath, StoreError> {
    order.collection(ITEMS)
}

/// `users/{uid}`
pub fn user_path(uid: &AccountId) -> Result<DocPath, StoreError> {
    CollectionPath::root(USERS)?.doc(uid.as_str())
}
