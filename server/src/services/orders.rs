// server/src/services/orders.rs
use crate::errors::{AppError, Result};
use crate::models::page::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use crate::models::{OrderDetails, Page, PageQuery};
use crate::state::AppState;
use tracing::instrument;

pub async fn get_order(state: &AppState, order_id: i32) -> Result<OrderDetails> {
  state
    .orders
    .find_details(order_id)
    .await?
    .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}

/// Fills in the defaults and rejects pages or sizes below one.
pub fn resolve_page(query: PageQuery) -> Result<(i64, i64)> {
  let page = query.page.unwrap_or(DEFAULT_PAGE);
  let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
  if page < 1 {
    return Err(AppError::Validation("page must be at least 1".to_string()));
  }
  if page_size < 1 {
    return Err(AppError::Validation("pageSize must be at least 1".to_string()));
  }
  Ok((page, page_size))
}

#[instrument(name = "orders::list", skip(state))]
pub async fn list_orders(state: &AppState, query: PageQuery) -> Result<Page<OrderDetails>> {
  let (page, page_size) = resolve_page(query)?;
  let offset = (page - 1).saturating_mul(page_size);
  let (data, total) = state.orders.list_page(offset, page_size).await?;
  Ok(Page::new(data, total, page, page_size))
}

/// Orders placed under the user's uid, including ones whose user reference was since cleared.
pub async fn orders_for_user(state: &AppState, uid: &str) -> Result<Vec<OrderDetails>> {
  if state.users.find_by_uid(uid).await?.is_none() {
    return Err(AppError::NotFound("User not found".to_string()));
  }
  state.orders.list_by_uid(uid).await
}
