// server/src/pipelines/contexts.rs

//! Root data for each pipeline. Handlers receive these wrapped in `flow::ContextData`.

use crate::models::{NewOrder, NewUser, Order, Product, User, UserPatch};
use crate::state::AppState;

#[derive(Clone)]
pub struct CreateOrderCtxData {
  pub app_state: AppState,
  pub uid: String,
  pub product_id: i32,
  pub amount: i32,
  pub user: Option<User>,
  pub product: Option<Product>,
  pub created_order: Option<Order>,
}

impl CreateOrderCtxData {
  pub fn new(app_state: AppState, input: NewOrder) -> Self {
    Self {
      app_state,
      uid: input.uid,
      product_id: input.product_id,
      amount: input.amount,
      user: None,
      product: None,
      created_order: None,
    }
  }
}

#[derive(Clone)]
pub struct UpdateOrderCtxData {
  pub app_state: AppState,
  pub order_id: i32,
  pub new_amount: Option<i32>,
  /// Loaded by `load_order`, replaced with the stored row once persisted.
  pub order: Option<Order>,
}

impl UpdateOrderCtxData {
  pub fn new(app_state: AppState, order_id: i32, new_amount: Option<i32>) -> Self {
    Self {
      app_state,
      order_id,
      new_amount,
      order: None,
    }
  }
}

#[derive(Clone)]
pub struct DeleteOrderCtxData {
  pub app_state: AppState,
  pub order_id: i32,
  pub order: Option<Order>,
}

impl DeleteOrderCtxData {
  pub fn new(app_state: AppState, order_id: i32) -> Self {
    Self {
      app_state,
      order_id,
      order: None,
    }
  }
}

#[derive(Clone)]
pub struct CreateUserCtxData {
  pub app_state: AppState,
  pub name: String,
  pub email: String,
  pub created_user: Option<User>,
}

impl CreateUserCtxData {
  pub fn new(app_state: AppState, input: NewUser) -> Self {
    Self {
      app_state,
      name: input.name,
      email: input.email,
      created_user: None,
    }
  }
}

#[derive(Clone)]
pub struct UpdateUserCtxData {
  pub app_state: AppState,
  pub user_id: i32,
  pub patch: UserPatch,
  pub user: Option<User>,
}

impl UpdateUserCtxData {
  pub fn new(app_state: AppState, user_id: i32, patch: UserPatch) -> Self {
    Self {
      app_state,
      user_id,
      patch,
      user: None,
    }
  }
}
