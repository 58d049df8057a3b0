//! Order request validation.
//!
//! Turns the untyped `data` of a `placeOrder` call into a
//! [`PlaceOrderRequest`] or a [`ValidationError`]. Pure: no I/O, and the same
//! input always yields the same decision.

use kirana_core::{AccountId, Address, AddressError, Money, ProductId, StoreId};
use serde::Deserialize;
use serde_json::{Number, Value};
use thiserror::Error;

/// Reasons a `placeOrder` request is rejected before any read or write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No caller identity.
    #[error("the function must be called while authenticated")]
    Unauthenticated,

    /// The payload is not an object of the expected shape.
    #[error("malformed request: {0}")]
    Malformed(String),

    #[error("storeId is required")]
    MissingStoreId,

    #[error("storeName is required")]
    MissingStoreName,

    #[error("address is required")]
    MissingAddress,

    #[error(transparent)]
    InvalidAddress(#[from] AddressError),

    #[error("items must be a non-empty list")]
    NoItems,

    /// Missing or blank `productId` / `name`.
    #[error("item {index}: productId and name are required")]
    InvalidItem { index: usize },

    #[error("item {index}: unitPrice must be a number greater than zero")]
    InvalidPrice { index: usize },

    #[error("item {index}: qty must be a positive integer")]
    InvalidQuantity { index: usize },
}

/// `placeOrder` payload as sent by the client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderPayload {
    pub store_id: Option<String>,
    pub store_name: Option<String>,
    pub items: Option<Vec<ItemPayload>>,
    pub address: Option<AddressPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub product_id: Option<String>,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub unit_price: Option<Number>,
    pub qty: Option<Number>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
}

/// One validated cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub image_url: String,
    pub unit_price: Money,
    pub qty: u32,
}

/// A fully validated `placeOrder` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOrderRequest {
    pub buyer_id: AccountId,
    pub store_id: StoreId,
    pub store_name: String,
    pub address: Address,
    pub items: Vec<OrderLine>,
}

/// Validate a raw `placeOrder` call.
///
/// Checks run in a fixed order (caller, store id, store name, address,
/// items) and the first failure is returned.
///
/// # Errors
///
/// Returns the [`ValidationError`] describing the first problem found.
pub fn validate(
    caller: Option<&AccountId>,
    data: &Value,
) -> Result<PlaceOrderRequest, ValidationError> {
    let buyer_id = caller.cloned().ok_or(ValidationError::Unauthenticated)?;

    let payload = PlaceOrderPayload::deserialize(data)
        .map_err(|e| ValidationError::Malformed(e.to_string()))?;

    let store_id = non_blank(payload.store_id.as_deref()).ok_or(ValidationError::MissingStoreId)?;
    let store_name =
        non_blank(payload.store_name.as_deref()).ok_or(ValidationError::MissingStoreName)?;
    let address = payload
        .address
        .as_ref()
        .ok_or(ValidationError::MissingAddress)
        .and_then(validate_address)?;

    let raw_items = payload.items.unwrap_or_default();
    if raw_items.is_empty() {
        return Err(ValidationError::NoItems);
    }

    let items = raw_items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_item(index, item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PlaceOrderRequest {
        buyer_id,
        store_id: StoreId::new(store_id),
        store_name,
        address,
        items,
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn validate_address(raw: &AddressPayload) -> Result<Address, ValidationError> {
    Ok(Address::parse(
        raw.full_name.as_deref().unwrap_or_default(),
        raw.phone.as_deref().unwrap_or_default(),
        raw.line1.as_deref().unwrap_or_default(),
        raw.line2.as_deref(),
        raw.city.as_deref().unwrap_or_default(),
        raw.state.as_deref().unwrap_or_default(),
        raw.pincode.as_deref().unwrap_or_default(),
    )?)
}

fn validate_item(index: usize, raw: &ItemPayload) -> Result<OrderLine, ValidationError> {
    let product_id = non_blank(raw.product_id.as_deref());
    let name = non_blank(raw.name.as_deref());
    let (Some(product_id), Some(name)) = (product_id, name) else {
        return Err(ValidationError::InvalidItem { index });
    };

    let unit_price = raw
        .unit_price
        .as_ref()
        .and_then(|n| Money::positive_from_json(n).ok())
        .ok_or(ValidationError::InvalidPrice { index })?;

    let qty = raw
        .qty
        .as_ref()
        .and_then(positive_quantity)
        .ok_or(ValidationError::InvalidQuantity { index })?;

    Ok(OrderLine {
        product_id: ProductId::new(product_id),
        name,
        image_url: raw.image_url.clone().unwrap_or_default(),
        unit_price,
        qty,
    })
}

/// A quantity in `1..=u32::MAX`. Integral floats such as `2.0` are accepted.
#[allow(
    clippy::float_cmp,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn positive_quantity(number: &Number) -> Option<u32> {
    if let Some(qty) = number.as_u64() {
        return u32::try_from(qty).ok().filter(|q| *q > 0);
    }
    if number.is_i64() {
        return None;
    }
    let qty = number.as_f64()?;
    (qty.fract() == 0.0 && qty >= 1.0 && qty <= f64::from(u32::MAX)).then(|| qty as u32)
}
