// server/src/web/routes.rs

use actix_web::{error, web, HttpRequest, HttpResponse, ResponseError};

use crate::errors::{ApiError, AppError};
use crate::web::handlers::{order_handlers, product_handlers, user_handlers};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Answers any request no route matched.
pub async fn route_not_found(req: HttpRequest) -> HttpResponse {
  ApiError::new(AppError::NotFound("Route not found".to_string()), &req, "Route not found").error_response()
}

/// Malformed bodies, query strings and path segments all become 400 envelopes.
fn bad_request(detail: String, req: &HttpRequest) -> error::Error {
  ApiError::new(AppError::Validation(detail), req, "Invalid request").into()
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(|err, req| bad_request(err.to_string(), req)))
    .app_data(web::QueryConfig::default().error_handler(|err, req| bad_request(err.to_string(), req)))
    .app_data(web::PathConfig::default().error_handler(|err, req| bad_request(err.to_string(), req)))
    .route("/health", web::get().to(health_check_handler))
    .service(
      web::scope("/api")
        // Orders
        .route("/orders", web::get().to(order_handlers::list_orders_handler))
        .route("/orders", web::post().to(order_handlers::create_order_handler))
        .route("/orders/{id}", web::get().to(order_handlers::get_order_handler))
        .route("/orders/{id}", web::put().to(order_handlers::update_order_handler))
        .route("/orders/{id}", web::delete().to(order_handlers::delete_order_handler))
        // Products; the code lookup must precede the numeric id route.
        .route("/products", web::get().to(product_handlers::list_products_handler))
        .route("/products", web::post().to(product_handlers::create_product_handler))
        .route(
          "/products/code/{code}",
          web::get().to(product_handlers::get_product_by_code_handler),
        )
        .route("/products/{id}", web::get().to(product_handlers::get_product_handler))
        .route("/products/{id}", web::put().to(product_handlers::update_product_handler))
        .route("/products/{id}", web::delete().to(product_handlers::delete_product_handler))
        // Users; likewise `uid/{uid}` before `{id}`.
        .route("/users", web::get().to(user_handlers::list_users_handler))
        .route("/users", web::post().to(user_handlers::create_user_handler))
        .route("/users/uid/{uid}", web::get().to(user_handlers::get_user_by_uid_handler))
        .route("/users/{uid}/orders", web::get().to(order_handlers::user_orders_handler))
        .route("/users/{id}", web::get().to(user_handlers::get_user_handler))
        .route("/users/{id}", web::put().to(user_handlers::update_user_handler))
        .route("/users/{id}", web::delete().to(user_handlers::delete_user_handler)),
    )
    .default_service(web::to(route_not_found));
}
