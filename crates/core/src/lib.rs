//! Kirana Core - Shared types library.
//!
//! This crate provides the types shared by the Kirana backend components:
//! - `functions` - Callable order functions (`placeOrder`, `getOrder`)
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. Everything here can be unit tested without a
//! runtime.
//!
//! # Modules
//!
//! - [`types`] - Identifiers, money, order status, addresses and the order
//!   documents as they are stored

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
