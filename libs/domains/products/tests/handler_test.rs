//! Handler tests for the Products domain
//!
//! These tests drive the real router over the in-memory repository and
//! verify status codes, response shapes, and the localized messages of
//! the API contract.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn setup(test_name: &str) -> (Router, InMemoryProductRepository, Uuid) {
    let builder = TestDataBuilder::from_test_name(test_name);
    let repo = InMemoryProductRepository::new();
    let category_id = builder.record_id();
    repo.add_category(Category {
        id: category_id,
        name: builder.name("category", "main"),
    })
    .await;

    let app = handlers::router(ProductService::new(repo.clone()));
    (app, repo, category_id)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn delete_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn create_product(app: &Router, name: &str, category_id: Uuid) -> Product {
    let response = app
        .clone()
        .oneshot(post_json(
            "/",
            json!({
                "name": name,
                "category_id": category_id,
                "price": 12.5,
                "stock": 10
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_create_product_returns_201() {
    let (app, _repo, category_id) = setup("handler_create_201").await;

    let response = app
        .oneshot(post_json(
            "/",
            json!({
                "name": "Kopi Susu",
                "category_id": category_id,
                "price": 18.0,
                "stock": 25,
                "barcode": "8991234567890"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.name, "Kopi Susu");
    assert_eq!(product.barcode.as_deref(), Some("8991234567890"));
    assert!(product.active);
    assert_eq!(product.category.id, category_id);
}

#[tokio::test]
async fn test_create_product_missing_fields_returns_required_message() {
    let (app, _repo, category_id) = setup("handler_create_required").await;

    // price omitted entirely
    let response = app
        .oneshot(post_json(
            "/",
            json!({
                "name": "Kopi",
                "category_id": category_id,
                "stock": 5
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "Nama, Kategori, Harga, dan Stok diperlukan!");
}

#[tokio::test]
async fn test_create_product_oversized_name_returns_invalid_data() {
    let (app, _repo, category_id) = setup("handler_create_invalid").await;

    let response = app
        .oneshot(post_json(
            "/",
            json!({
                "name": "x".repeat(150),
                "category_id": category_id,
                "price": 10.0,
                "stock": 5
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "Data tidak valid");
}

#[tokio::test]
async fn test_create_duplicate_active_name_returns_400() {
    let (app, _repo, category_id) = setup("handler_create_duplicate").await;

    create_product(&app, "Teh Manis", category_id).await;

    let response = app
        .oneshot(post_json(
            "/",
            json!({
                "name": "Teh Manis",
                "category_id": category_id,
                "price": 8.0,
                "stock": 3
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "Produk sudah ada");
}

#[tokio::test]
async fn test_create_same_name_as_inactive_reactivates_in_place() {
    let (app, _repo, category_id) = setup("handler_reactivate").await;

    let product = create_product(&app, "Roti", category_id).await;

    // Deactivate through the update endpoint
    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/{}", product.id),
            json!({"active": false}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Creating the same name again must reuse the row
    let reactivated = create_product(&app, "Roti", category_id).await;
    assert_eq!(reactivated.id, product.id);
    assert!(reactivated.active);
}

#[tokio::test]
async fn test_list_excludes_inactive_products() {
    let (app, _repo, category_id) = setup("handler_list_active").await;

    let keep = create_product(&app, "Aqua", category_id).await;
    let hide = create_product(&app, "Sprite", category_id).await;

    let response = app
        .clone()
        .oneshot(put_json(&format!("/{}", hide.id), json!({"active": false})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let products: Vec<ProductSummary> = json_body(response.into_body()).await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, keep.id);
}

#[tokio::test]
async fn test_list_summary_omits_active_flag() {
    let (app, _repo, category_id) = setup("handler_list_shape").await;

    create_product(&app, "Aqua", category_id).await;

    let response = app.oneshot(get("/")).await.unwrap();
    let body: Value = json_body(response.into_body()).await;

    let first = &body.as_array().unwrap()[0];
    assert!(first.get("active").is_none());
    assert_eq!(first["category"]["id"], json!(category_id));
    // Timestamps stay part of the listing projection
    assert!(first.get("created_at").is_some());
    assert!(first.get("updated_at").is_some());
}

#[tokio::test]
async fn test_list_treats_non_true_flag_as_false() {
    let (app, _repo, category_id) = setup("handler_list_flag").await;

    create_product(&app, "Aqua", category_id).await;

    let response = app.oneshot(get("/?include_categories=1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Not an error, and not the {products, categories} shape either
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body.as_array().map(|items| items.len()), Some(1));
}

#[tokio::test]
async fn test_list_with_categories_returns_both_collections() {
    let (app, _repo, category_id) = setup("handler_list_categories").await;

    create_product(&app, "Aqua", category_id).await;

    let response = app
        .oneshot(get("/?include_categories=true"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: ProductsWithCategories = json_body(response.into_body()).await;
    assert_eq!(body.products.len(), 1);
    assert_eq!(body.categories.len(), 1);
    assert_eq!(body.categories[0].id, category_id);
}

#[tokio::test]
async fn test_get_product_includes_active_flag() {
    let (app, _repo, category_id) = setup("handler_get").await;

    let product = create_product(&app, "Aqua", category_id).await;

    let response = app.oneshot(get(&format!("/{}", product.id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["active"], json!(true));
    assert_eq!(body["id"], json!(product.id));
}

#[tokio::test]
async fn test_get_unknown_product_returns_404() {
    let (app, _repo, _category_id) = setup("handler_get_404").await;

    let response = app.oneshot(get(&format!("/{}", Uuid::now_v7()))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "Produk tidak ditemukan");
}

#[tokio::test]
async fn test_get_invalid_uuid_returns_400() {
    let (app, _repo, _category_id) = setup("handler_get_bad_uuid").await;

    let response = app.oneshot(get("/not-a-uuid")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_applies_only_present_fields() {
    let (app, _repo, category_id) = setup("handler_update_sparse").await;

    let product = create_product(&app, "Gula", category_id).await;

    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/{}", product.id),
            json!({"price": 20.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated: Product = json_body(response.into_body()).await;
    assert_eq!(updated.price, 20.0);
    assert_eq!(updated.name, "Gula");
    assert_eq!(updated.stock, product.stock);
}

#[tokio::test]
async fn test_update_with_empty_body_changes_nothing() {
    let (app, _repo, category_id) = setup("handler_update_empty").await;

    let product = create_product(&app, "Gula", category_id).await;

    let response = app
        .clone()
        .oneshot(put_json(&format!("/{}", product.id), json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated: Product = json_body(response.into_body()).await;
    assert_eq!(updated.name, product.name);
    assert_eq!(updated.price, product.price);
    assert_eq!(updated.stock, product.stock);
    assert_eq!(updated.active, product.active);
}

#[tokio::test]
async fn test_update_never_applies_stock() {
    let (app, _repo, category_id) = setup("handler_update_stock").await;

    let product = create_product(&app, "Gula", category_id).await;

    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/{}", product.id),
            json!({"stock": 999, "price": 15.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated: Product = json_body(response.into_body()).await;
    assert_eq!(updated.stock, product.stock, "stock must never change via update");
    assert_eq!(updated.price, 15.0);
}

#[tokio::test]
async fn test_update_unknown_product_returns_category_message() {
    let (app, _repo, _category_id) = setup("handler_update_404").await;

    let response = app
        .oneshot(put_json(
            &format!("/{}", Uuid::now_v7()),
            json!({"price": 10.0}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "Kategori tidak ditemukan");
}

#[tokio::test]
async fn test_update_unknown_category_returns_404() {
    let (app, _repo, category_id) = setup("handler_update_bad_category").await;

    let product = create_product(&app, "Gula", category_id).await;

    let response = app
        .oneshot(put_json(
            &format!("/{}", product.id),
            json!({"category_id": Uuid::now_v7()}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "Kategori tidak ditemukan");
}

#[tokio::test]
async fn test_delete_without_history_removes_product() {
    let (app, _repo, category_id) = setup("handler_delete_hard").await;

    let product = create_product(&app, "Susu", category_id).await;

    let response = app
        .clone()
        .oneshot(delete(&format!("/{}", product.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Produk dihapus");

    let response = app.oneshot(get(&format!("/{}", product.id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_with_history_deactivates_product() {
    let (app, repo, category_id) = setup("handler_delete_soft").await;

    let product = create_product(&app, "Susu", category_id).await;
    repo.record_sale(product.id).await;

    let response = app
        .clone()
        .oneshot(delete(&format!("/{}", product.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Produk dinonaktifkan");

    // Still retrievable, but inactive
    let response = app.oneshot(get(&format!("/{}", product.id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Product = json_body(response.into_body()).await;
    assert!(!fetched.active);
}

#[tokio::test]
async fn test_delete_unknown_product_returns_404() {
    let (app, _repo, _category_id) = setup("handler_delete_404").await;

    let response = app
        .oneshot(delete(&format!("/{}", Uuid::now_v7())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "Produk tidak ditemukan");
}

#[tokio::test]
async fn test_bulk_delete_reports_per_item_outcomes() {
    let (app, repo, category_id) = setup("handler_bulk_delete").await;

    let plain = create_product(&app, "Sabun", category_id).await;
    let with_history = create_product(&app, "Sampo", category_id).await;
    repo.record_purchase(with_history.id).await;
    let missing = Uuid::now_v7();

    let response = app
        .clone()
        .oneshot(delete_json(
            "/",
            json!({"ids": [plain.id, with_history.id, missing]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: BulkDeleteResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "Produk dihapus");
    assert_eq!(body.results.len(), 3);
    assert_eq!(body.results[0].status, BulkDeleteStatus::Deleted);
    assert_eq!(body.results[1].status, BulkDeleteStatus::Deactivated);
    assert_eq!(body.results[2].status, BulkDeleteStatus::Failed);
    assert_eq!(
        body.results[2].error.as_deref(),
        Some("Produk tidak ditemukan")
    );

    // The deactivated product survives with history intact
    let response = app
        .oneshot(get(&format!("/{}", with_history.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_product_lifecycle_end_to_end() {
    let (app, _repo, category_id) = setup("handler_lifecycle").await;

    // Create
    let widget = create_product(&app, "Widget", category_id).await;

    // Creating again while active is a duplicate
    let response = app
        .clone()
        .oneshot(post_json(
            "/",
            json!({
                "name": "Widget",
                "category_id": category_id,
                "price": 12.5,
                "stock": 10
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Delete removes it (no history)
    let response = app
        .clone()
        .oneshot(delete(&format!("/{}", widget.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Produk dihapus");

    // Gone
    let response = app.oneshot(get(&format!("/{}", widget.id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
