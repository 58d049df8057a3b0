//! `placeOrder` end to end, through the router and an in-memory store.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use axum::body::Body;
use axum::http::StatusCode;
use kirana_integration_tests::{TestApp, fresh_mart_request};
use serde_json::{Value, json};

async fn fresh_mart_app() -> TestApp {
    let app = TestApp::new();
    app.seed_store("S1", &json!({"name": "Fresh Mart", "ownerId": "U_owner"}))
        .await
        .unwrap();
    app
}

fn with(mut request: Value, pointer: &str, value: Value) -> Value {
    *request.pointer_mut(pointer).unwrap() = value;
    request
}

fn without(mut request: Value, field: &str) -> Value {
    request.as_object_mut().unwrap().remove(field);
    request
}

async fn read_order(app: &TestApp, order_id: &str) -> (Value, Vec<Value>) {
    let response = app
        .call(
            "getOrder",
            Some("U_buyer"),
            json!({"storeId": "S1", "orderId": order_id}),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let order = response.result()["order"].clone();
    let items = response.result()["items"].as_array().unwrap().clone();
    (order, items)
}

#[tokio::test]
async fn test_fresh_mart_order() {
    let app = fresh_mart_app().await;

    let response = app
        .call("placeOrder", Some("U_buyer"), fresh_mart_request())
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let order_id = response.result()["orderId"].as_str().unwrap().to_owned();
    assert_eq!(order_id.len(), 20);

    let (order, items) = read_order(&app, &order_id).await;
    assert_eq!(order["orderId"], order_id);
    assert_eq!(order["storeId"], "S1");
    assert_eq!(order["storeName"], "Fresh Mart");
    assert_eq!(order["ownerId"], "U_owner");
    assert_eq!(order["buyerId"], "U_buyer");
    assert_eq!(order["buyerName"], "Asha");
    assert_eq!(order["buyerPhone"], "9999999999");
    assert_eq!(order["status"], "PLACED");
    assert_eq!(order["itemsTotal"], "140");
    assert_eq!(order["shipping"], "0");
    assert_eq!(order["grandTotal"], "140");
    assert_eq!(order["address"]["line1"], "12 MG Road");
    assert_eq!(order["createdAt"], order["updatedAt"]);
    assert!(order["createdAt"].is_string());

    assert_eq!(items.len(), 2);
    let mut line_totals: Vec<&str> = items
        .iter()
        .map(|item| item["lineTotal"].as_str().unwrap())
        .collect();
    line_totals.sort_unstable();
    assert_eq!(line_totals, ["100", "40"]);

    let milk = items.iter().find(|item| item["name"] == "Milk").unwrap();
    assert_eq!(milk["productId"], "P1");
    assert_eq!(milk["unitPrice"], "50");
    assert_eq!(milk["qty"], 2);
    assert_eq!(milk["imageUrl"], "");
}

#[tokio::test]
async fn test_totals_are_exact_for_fractional_prices() {
    let app = fresh_mart_app().await;
    let request = with(
        fresh_mart_request(),
        "/items",
        json!([
            {"productId": "P1", "name": "Tea", "unitPrice": 0.1, "qty": 3},
            {"productId": "P2", "name": "Salt", "unitPrice": 19.99, "qty": 2},
            {"productId": "P3", "name": "Rice", "unitPrice": 72.5, "qty": 1}
        ]),
    );

    let response = app.call("placeOrder", Some("U_buyer"), request).await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let order_id = response.result()["orderId"].as_str().unwrap().to_owned();
    let (order, items) = read_order(&app, &order_id).await;

    // 0.3 + 39.98 + 72.5
    assert_eq!(order["itemsTotal"], "112.78");
    assert_eq!(order["grandTotal"], "112.78");
    assert_eq!(items.len(), 3);
}

#[tokio::test]
async fn test_one_order_document_plus_one_per_item() {
    let app = fresh_mart_app().await;

    let response = app
        .call("placeOrder", Some("U_buyer"), fresh_mart_request())
        .await;
    let order_id = response.result()["orderId"].as_str().unwrap().to_owned();

    let paths = app.order_paths("S1").await;
    assert_eq!(paths.len(), 3);
    assert!(paths.contains(&format!("stores/S1/orders/{order_id}")));
    let item_prefix = format!("stores/S1/orders/{order_id}/items/");
    assert_eq!(paths.iter().filter(|p| p.starts_with(&item_prefix)).count(), 2);
}

#[tokio::test]
async fn test_each_call_creates_a_new_order() {
    let app = fresh_mart_app().await;

    let first = app
        .call("placeOrder", Some("U_buyer"), fresh_mart_request())
        .await;
    let second = app
        .call("placeOrder", Some("U_buyer"), fresh_mart_request())
        .await;

    assert_ne!(first.result()["orderId"], second.result()["orderId"]);
    assert_eq!(app.order_paths("S1").await.len(), 6);
}

#[tokio::test]
async fn test_failed_commit_leaves_nothing_behind() {
    let app = fresh_mart_app().await;
    app.store.set_fail_on_write(Some(2)).await;

    let response = app
        .call("placeOrder", Some("U_buyer"), fresh_mart_request())
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error_status(), Some("INTERNAL"));
    assert_eq!(response.body["error"]["message"], "Internal error");
    assert!(app.order_paths("S1").await.is_empty());
}

#[tokio::test]
async fn test_invalid_requests_write_nothing() {
    let app = fresh_mart_app().await;

    let cases = [
        ("empty storeId", with(fresh_mart_request(), "/storeId", json!("  "))),
        ("empty storeName", with(fresh_mart_request(), "/storeName", json!(""))),
        ("absent address", without(fresh_mart_request(), "address")),
        ("empty items", with(fresh_mart_request(), "/items", json!([]))),
        ("zero price", with(fresh_mart_request(), "/items/0/unitPrice", json!(0))),
        ("negative qty", with(fresh_mart_request(), "/items/0/qty", json!(-1))),
        ("fractional qty", with(fresh_mart_request(), "/items/1/qty", json!(1.5))),
        ("missing pincode", with(fresh_mart_request(), "/address/pincode", json!(""))),
        ("missing name", with(fresh_mart_request(), "/items/1/name", Value::Null)),
        ("items not a list", with(fresh_mart_request(), "/items", json!("milk"))),
        ("price as text", with(fresh_mart_request(), "/items/0/unitPrice", json!("50"))),
    ];

    for (case, request) in cases {
        let response = app.call("placeOrder", Some("U_buyer"), request).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{case}");
        assert_eq!(response.error_status(), Some("INVALID_ARGUMENT"), "{case}");
    }

    assert!(app.order_paths("S1").await.is_empty());
}

#[tokio::test]
async fn test_validation_is_repeatable() {
    let app = fresh_mart_app().await;
    let request = with(fresh_mart_request(), "/items/1/qty", json!(0));

    let first = app.call("placeOrder", Some("U_buyer"), request.clone()).await;
    let second = app.call("placeOrder", Some("U_buyer"), request).await;

    assert_eq!(first.status, second.status);
    assert_eq!(first.body, second.body);
    assert_eq!(
        first.body["error"]["message"],
        "item 1: qty must be a positive integer"
    );
}

#[tokio::test]
async fn test_unauthenticated_caller_is_rejected() {
    let app = fresh_mart_app().await;

    let anonymous = app.call("placeOrder", None, fresh_mart_request()).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.error_status(), Some("UNAUTHENTICATED"));

    let blank = app.call("placeOrder", Some("   "), fresh_mart_request()).await;
    assert_eq!(blank.error_status(), Some("UNAUTHENTICATED"));

    // No caller wins over an invalid payload
    let both = app.call("placeOrder", None, json!({})).await;
    assert_eq!(both.error_status(), Some("UNAUTHENTICATED"));

    assert!(app.order_paths("S1").await.is_empty());
}

#[tokio::test]
async fn test_unknown_store_is_not_found() {
    let app = fresh_mart_app().await;
    let request = with(fresh_mart_request(), "/storeId", json!("S9"));

    let response = app.call("placeOrder", Some("U_buyer"), request).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_status(), Some("NOT_FOUND"));
    assert!(app.order_paths("S9").await.is_empty());
}

#[tokio::test]
async fn test_store_without_owner_is_failed_precondition() {
    let app = TestApp::new();
    app.seed_store("S2", &json!({"name": "Orphan Store", "ownerId": ""}))
        .await
        .unwrap();
    let request = with(fresh_mart_request(), "/storeId", json!("S2"));

    let response = app.call("placeOrder", Some("U_buyer"), request).await;

    assert_eq!(response.status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(response.error_status(), Some("FAILED_PRECONDITION"));
    assert!(app.order_paths("S2").await.is_empty());
}

#[tokio::test]
async fn test_profile_overrides_address_details() {
    let app = fresh_mart_app().await;
    app.seed_profile("U_buyer", &json!({"name": "Asha Roy", "phone": "8888888888"}))
        .await
        .unwrap();

    let response = app
        .call("placeOrder", Some("U_buyer"), fresh_mart_request())
        .await;
    let order_id = response.result()["orderId"].as_str().unwrap().to_owned();
    let (order, _) = read_order(&app, &order_id).await;

    assert_eq!(order["buyerName"], "Asha Roy");
    assert_eq!(order["buyerPhone"], "8888888888");
    // The delivery address is kept as submitted
    assert_eq!(order["address"]["fullName"], "Asha");
}

#[tokio::test]
async fn test_profile_read_failure_does_not_block_order() {
    let app = fresh_mart_app().await;
    app.seed_profile("U_buyer", &json!({"name": "Asha Roy"}))
        .await
        .unwrap();
    app.store.set_fail_reads_under(Some("users/")).await;

    let response = app
        .call("placeOrder", Some("U_buyer"), fresh_mart_request())
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    app.store.set_fail_reads_under(None).await;
    let order_id = response.result()["orderId"].as_str().unwrap().to_owned();
    let (order, _) = read_order(&app, &order_id).await;
    assert_eq!(order["buyerName"], "Asha");
}

#[tokio::test]
async fn test_slow_store_is_deadline_exceeded() {
    let app = TestApp::with_timeout(Duration::from_millis(20));
    app.seed_store("S1", &json!({"ownerId": "U_owner"}))
        .await
        .unwrap();
    app.store
        .set_read_delay(Some(Duration::from_millis(300)))
        .await;

    let response = app
        .call("placeOrder", Some("U_buyer"), fresh_mart_request())
        .await;

    assert_eq!(response.status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(response.error_status(), Some("DEADLINE_EXCEEDED"));
    assert!(app.order_paths("S1").await.is_empty());
}

#[tokio::test]
async fn test_malformed_envelope_is_invalid_argument() {
    let app = fresh_mart_app().await;

    let not_json = app
        .post_raw("placeOrder", Some("U_buyer"), Body::from("milk please"))
        .await;
    assert_eq!(not_json.error_status(), Some("INVALID_ARGUMENT"));

    let no_data = app
        .post_raw(
            "placeOrder",
            Some("U_buyer"),
            Body::from(fresh_mart_request().to_string()),
        )
        .await;
    assert_eq!(no_data.error_status(), Some("INVALID_ARGUMENT"));
}
