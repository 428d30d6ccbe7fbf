//! Handler tests for the orders domain against the in-memory store

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_orders::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn apps() -> (Router, Router) {
    let service = OrderService::new(InMemoryOrderRepository::new());
    (
        handlers::orders::router(service.clone()),
        handlers::order_products::router(service),
    )
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn order_body(items: Value) -> Value {
    json!({
        "user_id": 1,
        "name": "Jane",
        "lastname": "Doe",
        "email": "jane@example.com",
        "phone": "+1 555 0100",
        "address": "1 Main St",
        "postal_code": "10001",
        "city": "New York",
        "country": "US",
        "total": 129.9,
        "items": items
    })
}

async fn place(app: &Router, items: Value) -> Order {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/", order_body(items)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_order_lifecycle() {
    let (orders, _) = apps();
    let order = place(
        &orders,
        json!([{ "product_id": 1, "quantity": 2 }, { "product_id": 2, "quantity": 1 }]),
    )
    .await;
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.items.len(), 2);

    let path = format!("/{}", order.id);
    let response = orders
        .clone()
        .oneshot(json_request("PUT", &path, json!({ "status": "shipped" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Order = json_body(response.into_body()).await;
    assert_eq!(updated.status, OrderStatus::Shipped);
    assert_eq!(updated.items.len(), 2);
    assert_eq!(updated.city, "New York");

    let response = orders
        .clone()
        .oneshot(Request::delete(&path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert!(body["message"].as_str().unwrap().contains("deleted"));

    let response = orders.oneshot(get(&path)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rejected_order_leaves_nothing_behind() {
    let (orders, items) = apps();

    for lines in [
        json!([{ "product_id": 1, "quantity": 0 }]),
        json!([{ "product_id": 1, "quantity": 1 }, { "product_id": 1, "quantity": 2 }]),
    ] {
        let response = orders
            .clone()
            .oneshot(json_request("POST", "/", order_body(lines)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = orders.oneshot(get("/")).await.unwrap();
    let listed: Vec<Order> = json_body(response.into_body()).await;
    assert!(listed.is_empty());

    let response = items.oneshot(get("/")).await.unwrap();
    let listed: Vec<OrderItem> = json_body(response.into_body()).await;
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_create_order_validation() {
    let (orders, _) = apps();
    let mut missing_city = order_body(json!([]));
    missing_city.as_object_mut().unwrap().remove("city");
    let mut bad_email = order_body(json!([]));
    bad_email["email"] = json!("nope");
    let mut negative_total = order_body(json!([]));
    negative_total["total"] = json!(-5);
    let mut unknown_field = order_body(json!([]));
    unknown_field["coupon"] = json!("FREE");

    for body in [missing_city, bad_email, negative_total, unknown_field] {
        let response = orders
            .clone()
            .oneshot(json_request("POST", "/", body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
    }
}

#[tokio::test]
async fn test_list_filters() {
    let (orders, _) = apps();
    place(&orders, json!([])).await;
    let second = place(&orders, json!([])).await;
    orders
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/{}", second.id),
            json!({ "status": "delivered" }),
        ))
        .await
        .unwrap();

    let response = orders.clone().oneshot(get("/?status=delivered")).await.unwrap();
    let delivered: Vec<Order> = json_body(response.into_body()).await;
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].id, second.id);

    let response = orders.clone().oneshot(get("/?user_id=2")).await.unwrap();
    let none: Vec<Order> = json_body(response.into_body()).await;
    assert!(none.is_empty());

    let response = orders.oneshot(get("/?status=lost")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_order_product_endpoints() {
    let (orders, items) = apps();
    let order = place(&orders, json!([{ "product_id": 1, "quantity": 1 }])).await;

    let response = items
        .clone()
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "order_id": order.id, "product_id": 7, "quantity": 3 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let item: OrderItem = json_body(response.into_body()).await;
    assert_eq!(item.quantity, 3);

    let response = items
        .clone()
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "order_id": order.id, "product_id": 7, "quantity": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = items
        .clone()
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "order_id": 999, "product_id": 7, "quantity": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let path = format!("/{}", item.id);
    let response = items
        .clone()
        .oneshot(json_request("PUT", &path, json!({ "quantity": 5 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: OrderItem = json_body(response.into_body()).await;
    assert_eq!(updated.quantity, 5);

    let response = items
        .clone()
        .oneshot(get(&format!("/?order_id={}", order.id)))
        .await
        .unwrap();
    let listed: Vec<OrderItem> = json_body(response.into_body()).await;
    assert_eq!(listed.len(), 2);

    let response = items
        .clone()
        .oneshot(Request::delete(&path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = items.oneshot(get(&path)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = orders.oneshot(get(&format!("/{}", order.id))).await.unwrap();
    let order: Order = json_body(response.into_body()).await;
    assert_eq!(order.items.len(), 1);
}
