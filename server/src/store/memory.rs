// server/src/store/memory.rs

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use super::{OrderRepository, ProductRepository, UserRepository};
use crate::errors::{AppError, Result};
use crate::models::{
  NewOrderRow, NewProduct, NewUserRow, Order, OrderDetails, Product, ProductPatch, ProductSummary, User,
  UserPatch, UserSummary,
};

#[derive(Default)]
struct Tables {
  users: BTreeMap<i32, User>,
  products: BTreeMap<i32, Product>,
  orders: BTreeMap<i32, Order>,
  next_user_id: i32,
  next_product_id: i32,
  next_order_id: i32,
}

impl Tables {
  fn email_taken(&self, email: &str, except: Option<i32>) -> bool {
    self.users.values().any(|u| u.email == email && Some(u.id) != except)
  }

  fn code_taken(&self, code: &str, except: Option<i32>) -> bool {
    self.products.values().any(|p| p.code == code && Some(p.id) != except)
  }

  fn details(&self, order: &Order) -> OrderDetails {
    let user = order
      .user_id
      .and_then(|id| self.users.get(&id))
      .map(|u| UserSummary {
        name: u.name.clone(),
        email: u.email.clone(),
      });
    let product = order
      .product_id
      .and_then(|id| self.products.get(&id))
      .map(|p| ProductSummary {
        name: p.name.clone(),
        description: p.description.clone(),
      });
    OrderDetails {
      order: order.clone(),
      user,
      product,
    }
  }
}

fn next_id(counter: &mut i32) -> i32 {
  *counter += 1;
  *counter
}

/// Process-local store with the same semantics as the Postgres backend.
/// Every operation holds the single table lock for its whole duration.
#[derive(Default)]
pub struct MemoryStore {
  tables: Mutex<Tables>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl UserRepository for MemoryStore {
  async fn list(&self) -> Result<Vec<User>> {
    Ok(self.tables.lock().users.values().cloned().collect())
  }

  async fn find_by_id(&self, id: i32) -> Result<Option<User>> {
    Ok(self.tables.lock().users.get(&id).cloned())
  }

  async fn find_by_uid(&self, uid: &str) -> Result<Option<User>> {
    Ok(self.tables.lock().users.values().find(|u| u.uid == uid).cloned())
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
    Ok(self.tables.lock().users.values().find(|u| u.email == email).cloned())
  }

  async fn insert(&self, row: NewUserRow) -> Result<User> {
    let mut tables = self.tables.lock();
    if tables.email_taken(&row.email, None) {
      return Err(AppError::Conflict("Email already in use".to_string()));
    }
    if tables.users.values().any(|u| u.uid == row.uid) {
      return Err(AppError::Conflict("Duplicate value".to_string()));
    }
    let now = Utc::now();
    let user = User {
      id: next_id(&mut tables.next_user_id),
      uid: row.uid,
      name: row.name,
      email: row.email,
      created_at: now,
      updated_at: now,
    };
    tables.users.insert(user.id, user.clone());
    Ok(user)
  }

  async fn update(&self, id: i32, patch: UserPatch) -> Result<Option<User>> {
    let mut tables = self.tables.lock();
    if let Some(email) = &patch.email {
      if tables.email_taken(email, Some(id)) {
        return Err(AppError::Conflict("Email already in use".to_string()));
      }
    }
    let Some(user) = tables.users.get_mut(&id) else {
      return Ok(None);
    };
    if let Some(name) = patch.name {
      user.name = name;
    }
    if let Some(email) = patch.email {
      user.email = email;
    }
    user.updated_at = Utc::now();
    Ok(Some(user.clone()))
  }

  async fn delete(&self, id: i32) -> Result<bool> {
    let mut tables = self.tables.lock();
    if tables.users.remove(&id).is_none() {
      return Ok(false);
    }
    for order in tables.orders.values_mut() {
      if order.user_id == Some(id) {
        order.user_id = None;
      }
    }
    Ok(true)
  }
}

#[async_trait]
impl ProductRepository for MemoryStore {
  async fn list(&self) -> Result<Vec<Product>> {
    Ok(self.tables.lock().products.values().cloned().collect())
  }

  async fn find_by_id(&self, id: i32) -> Result<Option<Product>> {
    Ok(self.tables.lock().products.get(&id).cloned())
  }

  async fn find_by_code(&self, code: &str) -> Result<Option<Product>> {
    Ok(self.tables.lock().products.values().find(|p| p.code == code).cloned())
  }

  async fn insert(&self, product: NewProduct) -> Result<Product> {
    let mut tables = self.tables.lock();
    if tables.code_taken(&product.code, None) {
      return Err(AppError::Conflict("Product code already in use".to_string()));
    }
    let now = Utc::now();
    let product = Product {
      id: next_id(&mut tables.next_product_id),
      code: product.code,
      name: product.name,
      description: product.description,
      price: product.price.round_dp(2),
      amount: product.amount,
      created_at: now,
      updated_at: now,
    };
    tables.products.insert(product.id, product.clone());
    Ok(product)
  }

  async fn update(&self, id: i32, patch: ProductPatch) -> Result<Option<Product>> {
    let mut tables = self.tables.lock();
    if let Some(code) = &patch.code {
      if tables.code_taken(code, Some(id)) {
        return Err(AppError::Conflict("Product code already in use".to_string()));
      }
    }
    let Some(product) = tables.products.get_mut(&id) else {
      return Ok(None);
    };
    if let Some(code) = patch.code {
      product.code = code;
    }
    if let Some(name) = patch.name {
      product.name = name;
    }
    if let Some(description) = patch.description {
      product.description = description;
    }
    if let Some(price) = patch.price {
      product.price = price.round_dp(2);
    }
    if let Some(amount) = patch.amount {
      product.amount = amount;
    }
    product.updated_at = Utc::now();
    Ok(Some(product.clone()))
  }

  async fn delete(&self, id: i32) -> Result<bool> {
    let mut tables = self.tables.lock();
    if tables.products.remove(&id).is_none() {
      return Ok(false);
    }
    for order in tables.orders.values_mut() {
      if order.product_id == Some(id) {
        order.product_id = None;
      }
    }
    Ok(true)
  }

  async fn try_debit(&self, id: i32, qty: i32) -> Result<Option<Product>> {
    let mut tables = self.tables.lock();
    match tables.products.get_mut(&id) {
      Some(product) if product.amount >= qty => {
        product.amount -= qty;
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
      }
      _ => Ok(None),
    }
  }

  async fn credit(&self, id: i32, qty: i32) -> Result<Option<Product>> {
    let mut tables = self.tables.lock();
    let Some(product) = tables.products.get_mut(&id) else {
      return Ok(None);
    };
    product.amount = product
      .amount
      .checked_add(qty)
      .ok_or_else(|| AppError::Validation(super::STOCK_OUT_OF_RANGE.to_string()))?;
    product.updated_at = Utc::now();
    Ok(Some(product.clone()))
  }
}

#[async_trait]
impl OrderRepository for MemoryStore {
  async fn find_by_id(&self, id: i32) -> Result<Option<Order>> {
    Ok(self.tables.lock().orders.get(&id).cloned())
  }

  async fn find_details(&self, id: i32) -> Result<Option<OrderDetails>> {
    let tables = self.tables.lock();
    Ok(tables.orders.get(&id).map(|order| tables.details(order)))
  }

  async fn list_page(&self, offset: i64, limit: i64) -> Result<(Vec<OrderDetails>, i64)> {
    let tables = self.tables.lock();
    let total = tables.orders.len() as i64;
    let data = tables
      .orders
      .values()
      .skip(usize::try_from(offset).unwrap_or(usize::MAX))
      .take(usize::try_from(limit).unwrap_or(0))
      .map(|order| tables.details(order))
      .collect();
    Ok((data, total))
  }

  async fn list_by_uid(&self, uid: &str) -> Result<Vec<OrderDetails>> {
    let tables = self.tables.lock();
    Ok(
      tables
        .orders
        .values()
        .filter(|order| order.uid == uid)
        .map(|order| tables.details(order))
        .collect(),
    )
  }

  async fn insert(&self, row: NewOrderRow) -> Result<Order> {
    let mut tables = self.tables.lock();
    let now = Utc::now();
    let order = Order {
      id: next_id(&mut tables.next_order_id),
      uid: row.uid,
      code: row.code,
      amount: row.amount,
      user_id: tables.users.contains_key(&row.user_id).then_some(row.user_id),
      product_id: tables.products.contains_key(&row.product_id).then_some(row.product_id),
      created_at: now,
      updated_at: now,
    };
    tables.orders.insert(order.id, order.clone());
    Ok(order)
  }

  async fn update_amount(&self, id: i32, amount: i32) -> Result<Option<Order>> {
    let mut tables = self.tables.lock();
    Ok(tables.orders.get_mut(&id).map(|order| {
      order.amount = amount;
      order.updated_at = Utc::now();
      order.clone()
    }))
  }

  async fn delete(&self, id: i32) -> Result<bool> {
    Ok(self.tables.lock().orders.remove(&id).is_some())
  }
}
