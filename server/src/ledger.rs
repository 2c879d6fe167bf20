// server/src/ledger.rs

//! Stock movements. All changes to `products.amount` made on behalf of
//! orders go through here.

use crate::errors::{AppError, Result};
use crate::models::Product;
use crate::store::ProductRepository;
use tracing::{info, instrument, warn};

/// Takes `qty` units from the product, failing rather than going negative.
///
/// The decrement is a single conditional write, so of two concurrent debits
/// that together exceed the stock only one succeeds.
#[instrument(name = "ledger::debit", skip(products))]
pub async fn debit(products: &dyn ProductRepository, product_id: i32, qty: i32, shortage: &str) -> Result<Product> {
  if let Some(product) = products.try_debit(product_id, qty).await? {
    info!(remaining = product.amount, "Stock debited.");
    return Ok(product);
  }

  match products.find_by_id(product_id).await? {
    None => Err(AppError::NotFound("Product not found".to_string())),
    Some(product) => {
      warn!(available = product.amount, "Debit refused, stock too low.");
      Err(AppError::InsufficientStock(shortage.to_string()))
    }
  }
}

/// Returns `qty` units to the product. A product that no longer exists is
/// skipped, yielding `None`.
#[instrument(name = "ledger::credit", skip(products))]
pub async fn credit(products: &dyn ProductRepository, product_id: i32, qty: i32) -> Result<Option<Product>> {
  let credited = products.credit(product_id, qty).await?;
  match &credited {
    Some(product) => info!(remaining = product.amount, "Stock credited."),
    None => warn!("Product missing, credit skipped."),
  }
  Ok(credited)
}
