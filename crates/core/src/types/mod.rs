//! Core types for Kirana.
//!
//! This module provides type-safe wrappers for the order domain.

pub mod address;
pub mod id;
pub mod money;
pub mod order;
pub mod status;

pub use address::{Address, AddressError};
pub use id::*;
pub use money::{Money, MoneyError};
pub use order::{
    CREATED_AT_FIELD, LineItemDocument, OrderDocument, OrderTotals, UPDATED_AT_FIELD,
};
pub use status::OrderStatus;
