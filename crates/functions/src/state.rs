//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::FunctionsConfig;
use crate::orders::OrderService;
use crate::store::DocumentStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The document store is built
/// once at startup and injected here.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: FunctionsConfig,
    orders: OrderService,
}

impl AppState {
    /// Create a new application state over `store`.
    #[must_use]
    pub fn new(config: FunctionsConfig, store: Arc<dyn DocumentStore>) -> Self {
        let orders = OrderService::new(store, config.backend_timeout);
        Self {
            inner: Arc::new(AppStateInner { config, orders }),
        }
    }

    /// Get a reference to the functions configuration.
    #[must_use]
    pub fn config(&self) -> &FunctionsConfig {
        &self.inner.config
    }

    /// Get a reference to the order service.
    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }
}
