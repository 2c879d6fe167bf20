// server/src/store/mod.rs

//! One small repository trait per table, plus the two backends implementing all three.
//!
//! Every call commits on its own. Unique-key violations surface as
//! `AppError::Conflict`. Stock is only ever changed through
//! [`ProductRepository::try_debit`] and [`ProductRepository::credit`], which
//! apply the change in a single conditional statement so concurrent orders
//! cannot overdraw a product.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::{
  NewOrderRow, NewProduct, NewUserRow, Order, OrderDetails, Product, ProductPatch, User, UserPatch,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Reported by [`ProductRepository::credit`] when the new stock would not fit in `amount`.
pub const STOCK_OUT_OF_RANGE: &str = "Stock amount out of range";

#[async_trait]
pub trait UserRepository: Send + Sync {
  async fn list(&self) -> Result<Vec<User>>;
  async fn find_by_id(&self, id: i32) -> Result<Option<User>>;
  async fn find_by_uid(&self, uid: &str) -> Result<Option<User>>;
  async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
  async fn insert(&self, row: NewUserRow) -> Result<User>;
  /// Merges the present fields of `patch`; `None` when no such user.
  async fn update(&self, id: i32, patch: UserPatch) -> Result<Option<User>>;
  /// Orders keep their uid snapshot; their user reference is cleared.
  async fn delete(&self, id: i32) -> Result<bool>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
  async fn list(&self) -> Result<Vec<Product>>;
  async fn find_by_id(&self, id: i32) -> Result<Option<Product>>;
  /// Exact match; callers normalize case.
  async fn find_by_code(&self, code: &str) -> Result<Option<Product>>;
  async fn insert(&self, product: NewProduct) -> Result<Product>;
  async fn update(&self, id: i32, patch: ProductPatch) -> Result<Option<Product>>;
  async fn delete(&self, id: i32) -> Result<bool>;

  /// Takes `qty` units if at least that many are in stock. `None` when the
  /// product is missing or short; the stock is then untouched.
  async fn try_debit(&self, id: i32, qty: i32) -> Result<Option<Product>>;

  /// Adds `qty` units. `None` when the product no longer exists; a
  /// `Validation` error when the result would overflow the stock column.
  async fn credit(&self, id: i32, qty: i32) -> Result<Option<Product>>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
  async fn find_by_id(&self, id: i32) -> Result<Option<Order>>;
  async fn find_details(&self, id: i32) -> Result<Option<OrderDetails>>;
  /// Orders by id, `limit` rows from `offset`, with the total row count.
  async fn list_page(&self, offset: i64, limit: i64) -> Result<(Vec<OrderDetails>, i64)>;
  /// Matches on the order's uid snapshot.
  async fn list_by_uid(&self, uid: &str) -> Result<Vec<OrderDetails>>;
  async fn insert(&self, row: NewOrderRow) -> Result<Order>;
  async fn update_amount(&self, id: i32, amount: i32) -> Result<Option<Order>>;
  async fn delete(&self, id: i32) -> Result<bool>;
}
