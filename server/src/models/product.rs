// server/src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: i32,
  pub code: String,
  pub name: String,
  pub description: String,
  /// NUMERIC(10,2)
  pub price: Decimal,
  /// Units in stock. Order operations never take this below zero.
  pub amount: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
  pub code: String,
  pub name: String,
  pub description: String,
  pub price: Decimal,
  pub amount: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
  pub code: Option<String>,
  pub name: Option<String>,
  pub description: Option<String>,
  pub price: Option<Decimal>,
  pub amount: Option<i32>,
}
