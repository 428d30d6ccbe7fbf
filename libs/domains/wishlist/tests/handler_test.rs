//! Handler tests for the wishlist domain against the in-memory store

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_wishlist::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app() -> Router {
    handlers::router(WishlistService::new(InMemoryWishlistRepository::new()))
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::delete(uri).body(Body::empty()).unwrap()
}

async fn add(app: &Router, user_id: i64, product_id: i64) -> StatusCode {
    app.clone()
        .oneshot(
            Request::post("/")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "user_id": user_id, "product_id": product_id }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn test_add_and_read_back() {
    let app = app();
    assert_eq!(add(&app, 1, 10).await, StatusCode::CREATED);
    assert_eq!(add(&app, 1, 11).await, StatusCode::CREATED);
    assert_eq!(add(&app, 2, 10).await, StatusCode::CREATED);

    let response = app.clone().oneshot(get("/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let entries: Vec<WishlistItem> = json_body(response.into_body()).await;
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.user_id == 1));

    let response = app.clone().oneshot(get("/1/11")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let entry: WishlistItem = json_body(response.into_body()).await;
    assert_eq!(entry.product_id, 11);

    let response = app.clone().oneshot(get("/?user_id=2")).await.unwrap();
    let entries: Vec<WishlistItem> = json_body(response.into_body()).await;
    assert_eq!(entries.len(), 1);

    let response = app.oneshot(get("/")).await.unwrap();
    let entries: Vec<WishlistItem> = json_body(response.into_body()).await;
    assert_eq!(entries.len(), 3);
}

#[tokio::test]
async fn test_duplicate_is_conflict() {
    let app = app();
    assert_eq!(add(&app, 1, 10).await, StatusCode::CREATED);
    assert_eq!(add(&app, 1, 10).await, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_invalid_input() {
    let app = app();
    assert_eq!(add(&app, 0, 10).await, StatusCode::BAD_REQUEST);

    let response = app.clone().oneshot(get("/abc")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get("/1/xyz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_remove_and_clear() {
    let app = app();
    add(&app, 1, 10).await;
    add(&app, 1, 11).await;
    add(&app, 1, 12).await;

    let response = app.clone().oneshot(delete("/1/10")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(delete("/1/10")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.clone().oneshot(get("/1/10")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.clone().oneshot(delete("/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert!(body["message"].as_str().unwrap().contains("Removed 2"));

    let response = app.oneshot(get("/1")).await.unwrap();
    let entries: Vec<WishlistItem> = json_body(response.into_body()).await;
    assert!(entries.is_empty());
}
