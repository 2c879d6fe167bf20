// server/tests/http_api_tests.rs

mod common;

use std::sync::Arc;

use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use async_trait::async_trait;
use chrono::DateTime;
use flow::FlowRegistry;
use serde_json::{json, Value};
use stockroom::models::{NewProduct, Product, ProductPatch};
use stockroom::pipelines;
use stockroom::state::AppState;
use stockroom::store::{MemoryStore, ProductRepository};
use stockroom::web::configure_app_routes;
use stockroom::AppError;

use common::{memory_state, seed_product, seed_user};

macro_rules! app {
  ($state:expr) => {
    test::init_service(
      App::new()
        .app_data(web::Data::new($state.clone()))
        .configure(configure_app_routes),
    )
    .await
  };
}

async fn seeded() -> (AppState, String, i32) {
  let state = memory_state();
  let user = seed_user(&state, "Ann", "ann@example.com").await;
  let product = seed_product(&state, "SKU1", 5).await;
  (state, user.uid, product.id)
}

#[actix_web::test]
async fn health_answers_ok() {
  let state = memory_state();
  let app = app!(state);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "status": "ok" }));
}

#[actix_web::test]
async fn unknown_route_gets_404_envelope() {
  let state = memory_state();
  let app = app!(state);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/nope").to_request()).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["status"], 404);
  assert_eq!(body["errorCode"], "E404");
  assert_eq!(body["message"], "Not Found");
  assert_eq!(body["errorDetails"], "Route not found");
  assert_eq!(body["path"], "/api/nope");
  assert!(DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
}

#[actix_web::test]
async fn order_lifecycle_over_http() {
  let (state, uid, product_id) = seeded().await;
  let app = app!(state);

  let req = test::TestRequest::post()
    .uri("/api/orders")
    .set_json(json!({ "uid": uid, "productId": product_id, "amount": 2 }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(
    body,
    json!({ "status": 200, "message": "Order created", "data": { "status": "success" } })
  );

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/orders/1").to_request()).await;
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Order found");
  assert_eq!(body["data"]["amount"], 2);
  assert_eq!(body["data"]["code"], "SKU1");
  assert_eq!(body["data"]["productId"], product_id);
  assert_eq!(body["data"]["user"]["name"], "Ann");
  assert_eq!(body["data"]["product"]["name"], "Product SKU1");

  let req = test::TestRequest::put()
    .uri("/api/orders/1")
    .set_json(json!({ "amount": 4 }))
    .to_request();
  let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
  assert_eq!(body["message"], "Order updated");
  assert_eq!(body["data"]["amount"], 4);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/products/1").to_request()).await;
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["data"]["amount"], 1);

  let resp = test::call_service(&app, test::TestRequest::delete().uri("/api/orders/1").to_request()).await;
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "status": 200, "message": "Order deleted", "data": null }));

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/products/code/sku1").to_request()).await;
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["data"]["amount"], 5);
}

#[actix_web::test]
async fn insufficient_stock_is_a_400_envelope() {
  let (state, uid, product_id) = seeded().await;
  let app = app!(state);

  let req = test::TestRequest::post()
    .uri("/api/orders")
    .set_json(json!({ "uid": uid, "productId": product_id, "amount": 6 }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["errorCode"], "E400");
  assert_eq!(body["message"], "Bad Request");
  assert_eq!(body["errorDetails"], "Not enough product in stock");
  assert_eq!(body["path"], "/api/orders");
}

#[actix_web::test]
async fn missing_order_is_a_404_envelope() {
  let state = memory_state();
  let app = app!(state);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/orders/99").to_request()).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["errorDetails"], "Order not found");
  assert_eq!(body["path"], "/api/orders/99");
}

#[actix_web::test]
async fn malformed_input_is_a_400_envelope() {
  let state = memory_state();
  let app = app!(state);

  let req = test::TestRequest::post()
    .uri("/api/orders")
    .insert_header(ContentType::json())
    .set_payload("{ not json")
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["errorCode"], "E400");

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/orders/abc").to_request()).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = test::call_service(
    &app,
    test::TestRequest::get().uri("/api/orders?page=0&pageSize=5").to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn pagination_over_http() {
  let (state, uid, product_id) = seeded().await;
  for _ in 0..3 {
    common::place_order(&state, &uid, product_id, 1).await.unwrap();
  }
  let app = app!(state);

  let resp = test::call_service(
    &app,
    test::TestRequest::get().uri("/api/orders?page=2&pageSize=2").to_request(),
  )
  .await;
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Orders found");
  assert_eq!(body["data"]["total"], 3);
  assert_eq!(body["data"]["page"], 2);
  assert_eq!(body["data"]["pageSize"], 2);
  assert_eq!(body["data"]["totalPages"], 2);
  assert_eq!(body["data"]["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn users_over_http() {
  let state = memory_state();
  let app = app!(state);

  let req = test::TestRequest::post()
    .uri("/api/users")
    .set_json(json!({ "name": "Ann", "email": "ann@example.com" }))
    .to_request();
  let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
  assert_eq!(body["message"], "User created");
  let uid = body["data"]["uid"].as_str().unwrap().to_string();

  let req = test::TestRequest::post()
    .uri("/api/users")
    .set_json(json!({ "name": "Ann 2", "email": "ann@example.com" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["errorCode"], "E409");
  assert_eq!(body["errorDetails"], "Email already in use");

  let resp = test::call_service(
    &app,
    test::TestRequest::get().uri(&format!("/api/users/uid/{}", uid)).to_request(),
  )
  .await;
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["data"]["email"], "ann@example.com");

  let resp = test::call_service(
    &app,
    test::TestRequest::get().uri(&format!("/api/users/{}/orders", uid)).to_request(),
  )
  .await;
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "User orders found");
  assert_eq!(body["data"], json!([]));

  let resp = test::call_service(&app, test::TestRequest::delete().uri("/api/users/1").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/users/1").to_request()).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

/// Products backend whose every call fails the way an exhausted pool does.
struct UnreachableProducts;

fn pool_timeout<T>() -> stockroom::Result<T> {
  Err(AppError::Sqlx(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl ProductRepository for UnreachableProducts {
  async fn list(&self) -> stockroom::Result<Vec<Product>> {
    pool_timeout()
  }
  async fn find_by_id(&self, _id: i32) -> stockroom::Result<Option<Product>> {
    pool_timeout()
  }
  async fn find_by_code(&self, _code: &str) -> stockroom::Result<Option<Product>> {
    pool_timeout()
  }
  async fn insert(&self, _product: NewProduct) -> stockroom::Result<Product> {
    pool_timeout()
  }
  async fn update(&self, _id: i32, _patch: ProductPatch) -> stockroom::Result<Option<Product>> {
    pool_timeout()
  }
  async fn delete(&self, _id: i32) -> stockroom::Result<bool> {
    pool_timeout()
  }
  async fn try_debit(&self, _id: i32, _qty: i32) -> stockroom::Result<Option<Product>> {
    pool_timeout()
  }
  async fn credit(&self, _id: i32, _qty: i32) -> stockroom::Result<Option<Product>> {
    pool_timeout()
  }
}

fn state_with_unreachable_products() -> AppState {
  let store = Arc::new(MemoryStore::new());
  let flows = Arc::new(FlowRegistry::<AppError>::new());
  pipelines::register_all_pipelines(&flows);
  AppState {
    users: store.clone(),
    products: Arc::new(UnreachableProducts),
    orders: store,
    flows,
  }
}

#[actix_web::test]
async fn database_failure_is_a_generic_500_envelope() {
  let state = state_with_unreachable_products();
  let user = seed_user(&state, "Ann", "ann@example.com").await;
  let app = app!(state);

  let req = test::TestRequest::post()
    .uri("/api/orders")
    .set_json(json!({ "uid": user.uid, "productId": 1, "amount": 1 }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["status"], 500);
  assert_eq!(body["errorCode"], "E500");
  assert_eq!(body["message"], "Internal Server Error");
  assert_eq!(body["errorDetails"], "Failed to create order");
  assert_eq!(body["path"], "/api/orders");
  assert!(!body.to_string().contains("timed out"));

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/products").to_request()).await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["errorDetails"], "Failed to retrieve products");
}
