// server/src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An order row. `uid` and `code` are copies taken when the order was placed
/// and are not kept in sync with later user or product edits.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: i32,
  pub uid: String,
  pub code: String,
  pub amount: i32,
  /// Cleared when the user is deleted.
  pub user_id: Option<i32>,
  /// Cleared when the product is deleted.
  pub product_id: Option<i32>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
  pub uid: String,
  pub product_id: i32,
  pub amount: i32,
}

#[derive(Debug, Clone)]
pub struct NewOrderRow {
  pub uid: String,
  pub code: String,
  pub amount: i32,
  pub user_id: i32,
  pub product_id: i32,
}

/// Body of `PUT /orders/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPatch {
  pub amount: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
  pub name: String,
  pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
  pub name: String,
  pub description: String,
}

/// An order as returned by the read endpoints, with the referenced user and product summarized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetails {
  #[serde(flatten)]
  pub order: Order,
  pub user: Option<UserSummary>,
  pub product: Option<ProductSummary>,
}
