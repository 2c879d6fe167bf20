// server/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use tracing::{info, instrument};

use crate::envelope::success;
use crate::errors::{ApiError, ForRequest};
use crate::models::{NewProduct, ProductPatch};
use crate::services::products;
use crate::state::AppState;

#[instrument(name = "handler::list_products", skip(app_state, req))]
pub async fn list_products_handler(app_state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, ApiError> {
  let all = products::list_products(&app_state)
    .await
    .for_request(&req, "Failed to retrieve products")?;
  info!("Successfully fetched {} products.", all.len());
  Ok(success("Products found", all))
}

#[instrument(name = "handler::get_product", skip(app_state, req))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
  let product = products::get_product(&app_state, path.into_inner())
    .await
    .for_request(&req, "Failed to retrieve product")?;
  Ok(success("Product found", product))
}

#[instrument(name = "handler::get_product_by_code", skip(app_state, req))]
pub async fn get_product_by_code_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
  let product = products::get_product_by_code(&app_state, &path)
    .await
    .for_request(&req, "Failed to retrieve product")?;
  Ok(success("Product found", product))
}

#[instrument(name = "handler::create_product", skip(app_state, req, body))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  body: web::Json<NewProduct>,
) -> Result<HttpResponse, ApiError> {
  let product = products::create_product(&app_state, body.into_inner())
    .await
    .for_request(&req, "Failed to create product")?;
  Ok(success("Product created", product))
}

#[instrument(name = "handler::update_product", skip(app_state, req, body))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  path: web::Path<i32>,
  body: web::Json<ProductPatch>,
) -> Result<HttpResponse, ApiError> {
  let product = products::update_product(&app_state, path.into_inner(), body.into_inner())
    .await
    .for_request(&req, "Failed to update product")?;
  Ok(success("Product updated", product))
}

#[instrument(name = "handler::delete_product", skip(app_state, req))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
  products::delete_product(&app_state, path.into_inner())
    .await
    .for_request(&req, "Failed to delete product")?;
  Ok(success("Product deleted", ()))
}
