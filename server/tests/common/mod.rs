// server/tests/common/mod.rs
#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal::Decimal;
use stockroom::models::{NewOrder, NewProduct, NewUser, Order, Product, User};
use stockroom::pipelines;
use stockroom::services::products;
use stockroom::state::AppState;
use stockroom::store::MemoryStore;

/// A fully wired state over a fresh in-memory store.
pub fn memory_state() -> AppState {
  AppState::with_store(Arc::new(MemoryStore::new()))
}

pub async fn seed_user(state: &AppState, name: &str, email: &str) -> User {
  pipelines::run_create_user(
    state,
    NewUser {
      name: name.to_string(),
      email: email.to_string(),
    },
  )
  .await
  .expect("seed user")
}

pub async fn seed_product(state: &AppState, code: &str, amount: i32) -> Product {
  products::create_product(
    state,
    NewProduct {
      code: code.to_string(),
      name: format!("Product {}", code),
      description: format!("Description of {}", code),
      price: Decimal::new(1250, 2),
      amount,
    },
  )
  .await
  .expect("seed product")
}

pub async fn place_order(state: &AppState, uid: &str, product_id: i32, amount: i32) -> stockroom::Result<Order> {
  pipelines::run_create_order(
    state,
    NewOrder {
      uid: uid.to_string(),
      product_id,
      amount,
    },
  )
  .await
}

pub async fn stock_of(state: &AppState, product_id: i32) -> i32 {
  state
    .products
    .find_by_id(product_id)
    .await
    .expect("product lookup")
    .expect("product exists")
    .amount
}
