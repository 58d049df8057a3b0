//! HTTP middleware for the callable functions.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, one transaction per call)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)

pub mod caller;
pub mod request_id;

pub use caller::Caller;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
