//! End-to-end tests: the full application on an ephemeral port, backed by
//! the in-memory stores.

use axum::Router;
use axum_helpers::{Server, ServerHandle};
use core_config::{AppInfo, http::HttpConfig, server::ServerConfig};
use domain_catalog::{InMemoryCatalog, MediaStorage, StorageConfig};
use domain_orders::InMemoryOrderRepository;
use domain_users::InMemoryUserRepository;
use domain_wishlist::InMemoryWishlistRepository;
use reqwest::StatusCode;
use serde_json::{Value, json};
use storefront_api::{Services, build_app};

async fn start() -> ServerHandle {
    let storage = MediaStorage::new(StorageConfig {
        upload_dir: std::env::temp_dir().join(format!("storefront-api-{}", uuid::Uuid::new_v4())),
        ..StorageConfig::default()
    });
    storage.ensure_dir().await.unwrap();

    let services = Services::new(
        InMemoryCatalog::new(),
        InMemoryUserRepository::new(),
        InMemoryOrderRepository::new(),
        InMemoryWishlistRepository::new(),
        storage,
    );
    let app = build_app(
        &services,
        Router::new(),
        AppInfo {
            name: "storefront_api",
            version: "test",
        },
        &HttpConfig::default(),
    )
    .unwrap();

    Server::bind(app, &ServerConfig::ephemeral())
        .await
        .unwrap()
        .spawn()
        .unwrap()
}

#[tokio::test]
async fn test_health_and_docs() {
    let server = start().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", server.url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");

    let response = client
        .get(format!("{}/api-docs/openapi.json", server.url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let doc: Value = response.json().await.unwrap();
    assert_eq!(doc["info"]["title"], "Storefront API");
    for path in ["/api/products", "/api/order-product", "/api/wishlist/{user_id}/{product_id}"] {
        assert!(doc["paths"].get(path).is_some(), "missing {}", path);
    }

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shopping_flow_across_domains() {
    let server = start().await;
    let client = reqwest::Client::new();
    let url = |path: &str| format!("{}/api{}", server.url(), path);

    let category: Value = client
        .post(url("/categories"))
        .json(&json!({ "name": "Lamps" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let response = client
        .post(url("/products"))
        .json(&json!({
            "name": "Desk Lamp",
            "price": 39.5,
            "category_id": category["id"]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let product: Value = response.json().await.unwrap();
    assert_eq!(product["slug"], "desk-lamp");

    let response = client
        .post(url("/users"))
        .json(&json!({ "name": "Jane", "email": "jane@example.com", "password": "Secret123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let user: Value = response.json().await.unwrap();

    let response = client
        .post(url("/wishlist"))
        .json(&json!({ "user_id": user["id"], "product_id": product["id"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = client
        .post(url("/orders"))
        .json(&json!({
            "user_id": user["id"],
            "name": "Jane",
            "lastname": "Doe",
            "email": "jane@example.com",
            "phone": "555",
            "address": "1 Main St",
            "postal_code": "10001",
            "city": "New York",
            "country": "US",
            "total": 39.5,
            "items": [{ "product_id": product["id"], "quantity": 1 }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let order: Value = response.json().await.unwrap();
    assert_eq!(order["items"].as_array().unwrap().len(), 1);

    let results: Vec<Value> = client
        .get(url("/search?query=lamp&category=Lamps"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(results.len(), 1);

    let response = client
        .get(format!("{}/api/nothing-here", server.url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_storefront_page_and_uploads() {
    let server = start().await;
    let client = reqwest::Client::new();

    let product: Value = client
        .post(format!("{}/api/products", server.url()))
        .json(&json!({ "name": "Oak Chair", "price": 120 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let form = reqwest::multipart::Form::new()
        .text("product_id", product["id"].to_string())
        .part(
            "file",
            reqwest::multipart::Part::bytes(b"fake-png".to_vec())
                .file_name("chair.png")
                .mime_str("image/png")
                .unwrap(),
        );
    let response = client
        .post(format!("{}/api/main-image", server.url()))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let main_image: Value = response.json().await.unwrap();
    let image_url = main_image["url"].as_str().unwrap().to_string();
    assert!(image_url.starts_with("/uploads/"));

    let response = client
        .get(format!("{}{}", server.url(), image_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(&response.bytes().await.unwrap()[..], b"fake-png");

    let response = client.get(server.url()).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    let html = response.text().await.unwrap();
    assert!(html.contains("Oak Chair"));
    assert!(html.contains(&image_url));

    server.shutdown().await.unwrap();
}
