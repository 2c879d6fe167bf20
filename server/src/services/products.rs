// server/src/services/products.rs
use crate::errors::{AppError, Result};
use crate::models::{NewProduct, Product, ProductPatch};
use crate::state::AppState;
use rust_decimal::Decimal;
use tracing::{info, instrument};

fn product_not_found() -> AppError {
  AppError::NotFound("Product not found".to_string())
}

fn check_stock_and_price(amount: Option<i32>, price: Option<Decimal>) -> Result<()> {
  if amount.is_some_and(|a| a < 0) {
    return Err(AppError::Validation("Amount must not be negative".to_string()));
  }
  if price.is_some_and(|p| p.is_sign_negative()) {
    return Err(AppError::Validation("Price must not be negative".to_string()));
  }
  Ok(())
}

pub async fn list_products(state: &AppState) -> Result<Vec<Product>> {
  state.products.list().await
}

pub async fn get_product(state: &AppState, product_id: i32) -> Result<Product> {
  state.products.find_by_id(product_id).await?.ok_or_else(product_not_found)
}

/// The requested code is upper-cased before the exact-match lookup.
pub async fn get_product_by_code(state: &AppState, code: &str) -> Result<Product> {
  let code = code.trim();
  if code.is_empty() {
    return Err(AppError::Validation("Code is required".to_string()));
  }
  state
    .products
    .find_by_code(&code.to_uppercase())
    .await?
    .ok_or_else(product_not_found)
}

#[instrument(name = "products::create", skip(state, product), fields(code = %product.code))]
pub async fn create_product(state: &AppState, product: NewProduct) -> Result<Product> {
  check_stock_and_price(Some(product.amount), Some(product.price))?;
  let created = state.products.insert(product).await?;
  info!(product_id = created.id, "Product created.");
  Ok(created)
}

#[instrument(name = "products::update", skip(state, patch))]
pub async fn update_product(state: &AppState, product_id: i32, patch: ProductPatch) -> Result<Product> {
  check_stock_and_price(patch.amount, patch.price)?;
  state.products.update(product_id, patch).await?.ok_or_else(product_not_found)
}

pub async fn delete_product(state: &AppState, product_id: i32) -> Result<()> {
  if !state.products.delete(product_id).await? {
    return Err(product_not_found());
  }
  info!(product_id, "Product deleted.");
  Ok(())
}
