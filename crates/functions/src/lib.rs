//! Kirana callable functions library.
//!
//! Server-side order functions for the Kirana buyer app, exposed over HTTP
//! with the callable envelope. The binary in `main.rs` wires configuration,
//! logging and the document store around the router built here, so the same
//! router can be driven in-process by tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod orders;
pub mod routes;
pub mod state;
pub mod store;
