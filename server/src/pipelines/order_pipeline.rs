// server/src/pipelines/order_pipeline.rs

use super::contexts::{CreateOrderCtxData, DeleteOrderCtxData, UpdateOrderCtxData};
use super::{expect_completed, required};
use crate::errors::{AppError, Result as AppResult};
use crate::ledger;
use crate::models::{NewOrder, NewOrderRow, Order};
use crate::state::AppState;
use flow::{ContextData, FlowRegistry, Pipeline, PipelineControl, SkipCondition};
use std::sync::Arc;
use tracing::{event, info, instrument, warn, Level};

const NOT_ENOUGH_STOCK: &str = "Not enough product in stock";
const NOT_ENOUGH_STOCK_FOR_UPDATE: &str = "Not enough product in stock for the update";

// --- Create ---

pub fn register_create_order_pipeline(flows: &FlowRegistry<AppError>) {
  let mut p = Pipeline::<CreateOrderCtxData, AppError>::new(&[
    ("validate_order_input", false, None),
    ("resolve_order_user", false, None),
    ("resolve_order_product", false, None),
    ("debit_order_stock", false, None),
    ("persist_new_order", false, None),
  ]);

  p.on("validate_order_input", validate_order_input);
  p.on("resolve_order_user", resolve_order_user);
  p.on("resolve_order_product", resolve_order_product);
  p.on("debit_order_stock", debit_order_stock);
  p.on("persist_new_order", persist_new_order);

  flows.register_pipeline(p);
  tracing::info!("Create-order pipeline registered.");
}

async fn validate_order_input(ctx_data: ContextData<CreateOrderCtxData>) -> AppResult<PipelineControl> {
  let amount = ctx_data.read().amount;
  event!(Level::DEBUG, amount, "Validating order input.");
  if amount <= 0 {
    return Err(AppError::Validation("Amount must be a positive integer".to_string()));
  }
  Ok(PipelineControl::Continue)
}

async fn resolve_order_user(ctx_data: ContextData<CreateOrderCtxData>) -> AppResult<PipelineControl> {
  let (uid, users) = {
    let guard = ctx_data.read();
    (guard.uid.clone(), guard.app_state.users.clone())
  };

  let Some(user) = users.find_by_uid(&uid).await? else {
    warn!(%uid, "Order placed for unknown user.");
    return Err(AppError::NotFound("User not found".to_string()));
  };
  ctx_data.write().user = Some(user);
  Ok(PipelineControl::Continue)
}

async fn resolve_order_product(ctx_data: ContextData<CreateOrderCtxData>) -> AppResult<PipelineControl> {
  let (product_id, amount, products) = {
    let guard = ctx_data.read();
    (guard.product_id, guard.amount, guard.app_state.products.clone())
  };

  let Some(product) = products.find_by_id(product_id).await? else {
    warn!(product_id, "Order placed for unknown product.");
    return Err(AppError::NotFound("Product not found".to_string()));
  };
  if product.amount < amount {
    warn!(product_id, available = product.amount, requested = amount, "Insufficient stock for order.");
    return Err(AppError::InsufficientStock(NOT_ENOUGH_STOCK.to_string()));
  }
  ctx_data.write().product = Some(product);
  Ok(PipelineControl::Continue)
}

async fn debit_order_stock(ctx_data: ContextData<CreateOrderCtxData>) -> AppResult<PipelineControl> {
  let (product_id, amount, products) = {
    let guard = ctx_data.read();
    (guard.product_id, guard.amount, guard.app_state.products.clone())
  };

  let product = ledger::debit(products.as_ref(), product_id, amount, NOT_ENOUGH_STOCK).await?;
  ctx_data.write().product = Some(product);
  Ok(PipelineControl::Continue)
}

async fn persist_new_order(ctx_data: ContextData<CreateOrderCtxData>) -> AppResult<PipelineControl> {
  let (user, product, amount, orders) = {
    let guard = ctx_data.read();
    (
      guard.user.clone(),
      guard.product.clone(),
      guard.amount,
      guard.app_state.orders.clone(),
    )
  };
  let user = required(user, "user")?;
  let product = required(product, "product")?;

  let order = orders
    .insert(NewOrderRow {
      uid: user.uid,
      code: product.code,
      amount,
      user_id: user.id,
      product_id: product.id,
    })
    .await?;
  info!(order_id = order.id, "Order created.");
  ctx_data.write().created_order = Some(order);
  Ok(PipelineControl::Continue)
}

/// Places an order, taking its quantity out of the product's stock.
#[instrument(name = "orders::create", skip(state, input), fields(uid = %input.uid, product_id = input.product_id, amount = input.amount))]
pub async fn run_create_order(state: &AppState, input: NewOrder) -> AppResult<Order> {
  let ctx_data = ContextData::new(CreateOrderCtxData::new(state.clone(), input));
  let result = state.flows.run(ctx_data.clone()).await?;
  expect_completed(result, "create_order")?;
  let created = ctx_data.read().created_order.clone();
  required(created, "created order")
}

// --- Update ---

/// Nothing past `load_order` runs when no new amount was given or it equals the current one.
fn amount_unchanged() -> SkipCondition<UpdateOrderCtxData> {
  Arc::new(|ctx_data: ContextData<UpdateOrderCtxData>| {
    let guard = ctx_data.read();
    let unchanged = match (&guard.order, guard.new_amount) {
      (Some(order), Some(new_amount)) => order.amount == new_amount,
      _ => true,
    };
    unchanged
  })
}

pub fn register_update_order_pipeline(flows: &FlowRegistry<AppError>) {
  let mut p = Pipeline::<UpdateOrderCtxData, AppError>::new(&[
    ("load_order", false, None),
    ("validate_new_amount", false, Some(amount_unchanged())),
    ("adjust_order_stock", false, Some(amount_unchanged())),
    ("persist_order_amount", false, Some(amount_unchanged())),
  ]);

  p.on("load_order", load_order_for_update);
  p.on("validate_new_amount", validate_new_amount);
  p.on("adjust_order_stock", adjust_order_stock);
  p.on("persist_order_amount", persist_order_amount);

  flows.register_pipeline(p);
  tracing::info!("Update-order pipeline registered.");
}

async fn load_order_for_update(ctx_data: ContextData<UpdateOrderCtxData>) -> AppResult<PipelineControl> {
  let (order_id, orders) = {
    let guard = ctx_data.read();
    (guard.order_id, guard.app_state.orders.clone())
  };
  let order = orders
    .find_by_id(order_id)
    .await?
    .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
  ctx_data.write().order = Some(order);
  Ok(PipelineControl::Continue)
}

async fn validate_new_amount(ctx_data: ContextData<UpdateOrderCtxData>) -> AppResult<PipelineControl> {
  let new_amount = ctx_data.read().new_amount;
  match new_amount {
    Some(amount) if amount > 0 => Ok(PipelineControl::Continue),
    _ => Err(AppError::Validation("Amount must be a positive integer".to_string())),
  }
}

/// Moves the difference between the new and the old quantity out of (or back into)
/// the product the order references.
async fn adjust_order_stock(ctx_data: ContextData<UpdateOrderCtxData>) -> AppResult<PipelineControl> {
  let (order, new_amount, products) = {
    let guard = ctx_data.read();
    (guard.order.clone(), guard.new_amount, guard.app_state.products.clone())
  };
  let order = required(order, "order")?;
  let new_amount = required(new_amount, "new amount")?;

  let product_id = order
    .product_id
    .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
  let product = products
    .find_by_id(product_id)
    .await?
    .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

  let delta = new_amount - order.amount;
  event!(Level::DEBUG, order_id = order.id, product_id, delta, "Adjusting stock for order update.");

  if delta > 0 {
    if product.amount < delta {
      warn!(product_id, available = product.amount, requested = delta, "Insufficient stock for order update.");
      return Err(AppError::InsufficientStock(NOT_ENOUGH_STOCK_FOR_UPDATE.to_string()));
    }
    ledger::debit(products.as_ref(), product_id, delta, NOT_ENOUGH_STOCK_FOR_UPDATE).await?;
  } else {
    ledger::credit(products.as_ref(), product_id, -delta).await?;
  }
  Ok(PipelineControl::Continue)
}

async fn persist_order_amount(ctx_data: ContextData<UpdateOrderCtxData>) -> AppResult<PipelineControl> {
  let (order_id, new_amount, orders) = {
    let guard = ctx_data.read();
    (guard.order_id, guard.new_amount, guard.app_state.orders.clone())
  };
  let new_amount = required(new_amount, "new amount")?;

  let updated = orders
    .update_amount(order_id, new_amount)
    .await?
    .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
  info!(order_id, amount = updated.amount, "Order amount updated.");
  ctx_data.write().order = Some(updated);
  Ok(PipelineControl::Continue)
}

/// Changes an order's quantity and moves the difference in stock. Returns the
/// order as stored afterwards, unchanged when the quantity is.
#[instrument(name = "orders::update", skip(state))]
pub async fn run_update_order(state: &AppState, order_id: i32, new_amount: Option<i32>) -> AppResult<Order> {
  let ctx_data = ContextData::new(UpdateOrderCtxData::new(state.clone(), order_id, new_amount));
  let result = state.flows.run(ctx_data.clone()).await?;
  expect_completed(result, "update_order")?;
  let order = ctx_data.read().order.clone();
  required(order, "order")
}

// --- Delete ---

pub fn register_delete_order_pipeline(flows: &FlowRegistry<AppError>) {
  let mut p = Pipeline::<DeleteOrderCtxData, AppError>::new(&[
    ("load_order", false, None),
    ("restock_order", true, None),
    ("remove_order", false, None),
  ]);

  p.on("load_order", load_order_for_delete);
  p.on("restock_order", restock_order);
  p.on("remove_order", remove_order);

  flows.register_pipeline(p);
  tracing::info!("Delete-order pipeline registered.");
}

async fn load_order_for_delete(ctx_data: ContextData<DeleteOrderCtxData>) -> AppResult<PipelineControl> {
  let (order_id, orders) = {
    let guard = ctx_data.read();
    (guard.order_id, guard.app_state.orders.clone())
  };
  let order = orders
    .find_by_id(order_id)
    .await?
    .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
  ctx_data.write().order = Some(order);
  Ok(PipelineControl::Continue)
}

async fn restock_order(ctx_data: ContextData<DeleteOrderCtxData>) -> AppResult<PipelineControl> {
  let (order, products) = {
    let guard = ctx_data.read();
    (guard.order.clone(), guard.app_state.products.clone())
  };
  let order = required(order, "order")?;

  let Some(product_id) = order.product_id else {
    warn!(order_id = order.id, "Order has no product reference, nothing to restock.");
    return Ok(PipelineControl::Continue);
  };
  ledger::credit(products.as_ref(), product_id, order.amount).await?;
  Ok(PipelineControl::Continue)
}

async fn remove_order(ctx_data: ContextData<DeleteOrderCtxData>) -> AppResult<PipelineControl> {
  let (order_id, orders) = {
    let guard = ctx_data.read();
    (guard.order_id, guard.app_state.orders.clone())
  };
  if orders.delete(order_id).await? {
    info!(order_id, "Order removed.");
  } else {
    warn!(order_id, "Order was already gone when removing it.");
  }
  Ok(PipelineControl::Continue)
}

/// Deletes an order after returning its quantity to stock.
#[instrument(name = "orders::delete", skip(state))]
pub async fn run_delete_order(state: &AppState, order_id: i32) -> AppResult<()> {
  let ctx_data = ContextData::new(DeleteOrderCtxData::new(state.clone(), order_id));
  let result = state.flows.run(ctx_data).await?;
  expect_completed(result, "delete_order")
}
