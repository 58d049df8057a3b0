//! `getOrder` and the health endpoints.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use kirana_integration_tests::{TestApp, fresh_mart_request};
use serde_json::json;

async fn placed_order(app: &TestApp) -> String {
    app.seed_store("S1", &json!({"name": "Fresh Mart", "ownerId": "U_owner"}))
        .await
        .unwrap();
    let response = app
        .call("placeOrder", Some("U_buyer"), fresh_mart_request())
        .await;
    response.result()["orderId"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn test_buyer_and_owner_can_read_order() {
    let app = TestApp::new();
    let order_id = placed_order(&app).await;
    let request = json!({"storeId": "S1", "orderId": order_id});

    for caller in ["U_buyer", "U_owner"] {
        let response = app.call("getOrder", Some(caller), request.clone()).await;
        assert_eq!(response.status, StatusCode::OK, "{caller}");
        assert_eq!(response.result()["order"]["orderId"], order_id);
        assert_eq!(response.result()["items"].as_array().unwrap().len(), 2);
    }
}

#[tokio::test]
async fn test_items_are_ordered_by_id() {
    let app = TestApp::new();
    let order_id = placed_order(&app).await;

    let response = app
        .call(
            "getOrder",
            Some("U_buyer"),
            json!({"storeId": "S1", "orderId": order_id}),
        )
        .await;

    let ids: Vec<&str> = response.result()["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["itemId"].as_str().unwrap())
        .collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
}

#[tokio::test]
async fn test_other_accounts_are_denied() {
    let app = TestApp::new();
    let order_id = placed_order(&app).await;
    let request = json!({"storeId": "S1", "orderId": order_id});

    let stranger = app.call("getOrder", Some("U_other"), request.clone()).await;
    assert_eq!(stranger.status, StatusCode::FORBIDDEN);
    assert_eq!(stranger.error_status(), Some("PERMISSION_DENIED"));

    let anonymous = app.call("getOrder", None, request).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_lookup_errors() {
    let app = TestApp::new();
    placed_order(&app).await;

    let missing = app
        .call(
            "getOrder",
            Some("U_buyer"),
            json!({"storeId": "S1", "orderId": "does-not-exist"}),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let no_order_id = app
        .call("getOrder", Some("U_buyer"), json!({"storeId": "S1"}))
        .await;
    assert_eq!(no_order_id.error_status(), Some("INVALID_ARGUMENT"));

    let bad_path = app
        .call(
            "getOrder",
            Some("U_buyer"),
            json!({"storeId": "S1", "orderId": "a/b"}),
        )
        .await;
    assert_eq!(bad_path.error_status(), Some("INVALID_ARGUMENT"));
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();
    assert_eq!(app.get_status("/health").await, StatusCode::OK);
    assert_eq!(app.get_status("/health/ready").await, StatusCode::OK);
}
