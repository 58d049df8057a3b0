//! End-to-end tests for the Kirana callable functions.
//!
//! The full router is driven in-process with `tower::ServiceExt::oneshot`
//! over a [`MemoryStore`], so no database or running server is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p kirana-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use kirana_core::{AccountId, StoreId};
use kirana_functions::config::{DEFAULT_CALLER_HEADER, FunctionsConfig};
use kirana_functions::orders::paths;
use kirana_functions::routes;
use kirana_functions::state::AppState;
use kirana_functions::store::{
    DocumentStore, MemoryStore, PendingWrite, StoreError, WriteBatch, to_document,
};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Largest response body the harness will read.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// A response from a callable function.
#[derive(Debug)]
pub struct CallResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl CallResponse {
    /// `result` member of a successful call.
    #[must_use]
    pub fn result(&self) -> &Value {
        &self.body["result"]
    }

    /// `error.status` of a failed call, such as `"INVALID_ARGUMENT"`.
    #[must_use]
    pub fn error_status(&self) -> Option<&str> {
        self.body["error"]["status"].as_str()
    }
}

/// The functions router over a fresh in-memory store.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    router: Router,
}

impl TestApp {
    /// App with the default configuration and an empty store.
    ///
    /// # Panics
    ///
    /// Panics if the built-in test configuration is rejected.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(5))
    }

    /// App whose backend calls time out after `timeout`.
    ///
    /// # Panics
    ///
    /// Panics if the built-in test configuration is rejected.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        let timeout_ms = timeout.as_millis().to_string();
        let config = FunctionsConfig::from_lookup(|key| match key {
            "FUNCTIONS_STORE" => Some("memory".to_string()),
            "FUNCTIONS_BACKEND_TIMEOUT_MS" => Some(timeout_ms.clone()),
            _ => None,
        })
        .expect("test configuration is valid");

        let store = Arc::new(MemoryStore::new());
        let router = routes::app(AppState::new(config, store.clone()));
        Self { store, router }
    }

    /// Write a `stores/{id}` document.
    ///
    /// # Errors
    ///
    /// Returns the store error if the write fails.
    pub async fn seed_store(&self, id: &str, data: &Value) -> Result<(), StoreError> {
        let path = paths::store_path(&StoreId::new(id))?;
        self.seed(PendingWrite::set(path, to_document(data)?)).await
    }

    /// Write a `users/{uid}` profile document.
    ///
    /// # Errors
    ///
    /// Returns the store error if the write fails.
    pub async fn seed_profile(&self, uid: &str, data: &Value) -> Result<(), StoreError> {
        let path = paths::user_path(&AccountId::new(uid))?;
        self.seed(PendingWrite::set(path, to_document(data)?)).await
    }

    async fn seed(&self, write: PendingWrite) -> Result<(), StoreError> {
        let mut batch = WriteBatch::new();
        batch.push(write);
        self.store.commit(batch).await.map(|_| ())
    }

    /// Store paths under `stores/{store_id}/orders/`.
    pub async fn order_paths(&self, store_id: &str) -> Vec<String> {
        let prefix = format!("stores/{store_id}/orders/");
        self.store
            .paths()
            .await
            .into_iter()
            .filter(|p| p.starts_with(&prefix))
            .collect()
    }

    /// POST a raw body to a function.
    ///
    /// # Panics
    ///
    /// Panics if the router fails or returns a non-JSON body.
    pub async fn post_raw(&self, function: &str, caller: Option<&str>, body: Body) -> CallResponse {
        let mut request = Request::post(format!("/{function}"))
            .header("content-type", "application/json");
        if let Some(uid) = caller {
            request = request.header(DEFAULT_CALLER_HEADER, uid);
        }
        let request = request.body(body).expect("request is well formed");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), MAX_BODY_BYTES)
            .await
            .expect("body is readable");
        let body = serde_json::from_slice(&bytes).expect("body is JSON");

        CallResponse { status, body }
    }

    /// Call a function with `{"data": data}`.
    ///
    /// # Panics
    ///
    /// Panics if the router fails or returns a non-JSON body.
    pub async fn call(&self, function: &str, caller: Option<&str>, data: Value) -> CallResponse {
        let body = Body::from(json!({ "data": data }).to_string());
        self.post_raw(function, caller, body).await
    }

    /// GET a path and return the status code.
    ///
    /// # Panics
    ///
    /// Panics if the router fails.
    pub async fn get_status(&self, uri: &str) -> StatusCode {
        let request = Request::get(uri)
            .body(Body::empty())
            .expect("request is well formed");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
            .status()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// The "Fresh Mart" cart: Milk 50 × 2 and Bread 40 × 1 for store `S1`.
#[must_use]
pub fn fresh_mart_request() -> Value {
    json!({
        "storeId": "S1",
        "storeName": "Fresh Mart",
        "items": [
            {"productId": "P1", "name": "Milk", "unitPrice": 50, "qty": 2},
            {"productId": "P2", "name": "Bread", "unitPrice": 40, "qty": 1}
        ],
        "address": {
            "fullName": "Asha",
            "phone": "9999999999",
            "line1": "12 MG Road",
            "city": "Kolkata",
            "state": "WB",
            "pincode": "700001"
        }
    })
}
