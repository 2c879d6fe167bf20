// server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::envelope::success;
use crate::errors::{ApiError, ForRequest};
use crate::models::{NewOrder, OrderPatch, PageQuery};
use crate::pipelines;
use crate::services::orders;
use crate::state::AppState;

#[instrument(name = "handler::list_orders", skip(app_state, req))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  query: web::Query<PageQuery>,
) -> Result<HttpResponse, ApiError> {
  let page = orders::list_orders(&app_state, query.into_inner())
    .await
    .for_request(&req, "Failed to retrieve orders")?;
  info!(returned = page.data.len(), total = page.total, "Orders listed.");
  Ok(success("Orders found", page))
}

#[instrument(name = "handler::get_order", skip(app_state, req))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
  let order = orders::get_order(&app_state, path.into_inner())
    .await
    .for_request(&req, "Failed to retrieve order")?;
  Ok(success("Order found", order))
}

#[instrument(name = "handler::create_order", skip(app_state, req, body))]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  body: web::Json<NewOrder>,
) -> Result<HttpResponse, ApiError> {
  pipelines::run_create_order(&app_state, body.into_inner())
    .await
    .for_request(&req, "Failed to create order")?;
  Ok(success("Order created", json!({ "status": "success" })))
}

#[instrument(name = "handler::update_order", skip(app_state, req, body))]
pub async fn update_order_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  path: web::Path<i32>,
  body: web::Json<OrderPatch>,
) -> Result<HttpResponse, ApiError> {
  let order = pipelines::run_update_order(&app_state, path.into_inner(), body.into_inner().amount)
    .await
    .for_request(&req, "Failed to update order")?;
  Ok(success("Order updated", order))
}

#[instrument(name = "handler::delete_order", skip(app_state, req))]
pub async fn delete_order_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
  pipelines::run_delete_order(&app_state, path.into_inner())
    .await
    .for_request(&req, "Failed to delete order")?;
  Ok(success("Order deleted", ()))
}

#[instrument(name = "handler::user_orders", skip(app_state, req))]
pub async fn user_orders_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
  let user_orders = orders::orders_for_user(&app_state, &path)
    .await
    .for_request(&req, "Failed to retrieve user orders")?;
  Ok(success("User orders found", user_orders))
}
