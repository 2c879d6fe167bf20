// server/src/models/page.rs

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// `?page=&pageSize=` on list endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
  pub page: Option<i64>,
  pub page_size: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
  pub data: Vec<T>,
  pub total: i64,
  pub page: i64,
  pub page_size: i64,
  pub total_pages: i64,
}

impl<T> Page<T> {
  pub fn new(data: Vec<T>, total: i64, page: i64, page_size: i64) -> Self {
    Self {
      data,
      total,
      page,
      page_size,
      total_pages: total_pages(total, page_size),
    }
  }
}

/// `ceil(total / page_size)` without overflowing on huge page sizes; `page_size` is always positive here.
pub fn total_pages(total: i64, page_size: i64) -> i64 {
  if total <= 0 {
    0
  } else {
    (total - 1) / page_size + 1
  }
}
