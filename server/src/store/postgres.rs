// server/src/store/postgres.rs

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use tracing::{error, info, instrument};

use super::{OrderRepository, ProductRepository, UserRepository, STOCK_OUT_OF_RANGE};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::{
  NewOrderRow, NewProduct, NewUserRow, Order, OrderDetails, Product, ProductPatch, ProductSummary, User,
  UserPatch, UserSummary,
};

const USER_COLUMNS: &str = "id, uid, name, email, created_at, updated_at";
const PRODUCT_COLUMNS: &str = "id, code, name, description, price, amount, created_at, updated_at";
const ORDER_COLUMNS: &str = "id, uid, code, amount, user_id, product_id, created_at, updated_at";
const ORDER_DETAILS_SELECT: &str = "SELECT o.id, o.uid, o.code, o.amount, o.user_id, o.product_id, o.created_at, o.updated_at, \
   u.name AS user_name, u.email AS user_email, p.name AS product_name, p.description AS product_description \
   FROM orders o \
   LEFT JOIN users u ON u.id = o.user_id \
   LEFT JOIN products p ON p.id = o.product_id";

/// Postgres-backed repositories sharing one connection pool.
#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(config: &AppConfig) -> Result<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(config.db_max_connections)
      .connect(&config.database_url)
      .await?;
    info!("Successfully connected to the database.");
    Ok(Self::new(pool))
  }

  pub async fn migrate(&self) -> Result<()> {
    sqlx::migrate!("./migrations").run(&self.pool).await?;
    info!("Database migrations applied.");
    Ok(())
  }
}

/// Turns unique-key violations into `Conflict`, naming the offending field.
fn map_write_error(err: sqlx::Error) -> AppError {
  if let sqlx::Error::Database(db_err) = &err {
    if db_err.is_unique_violation() {
      let constraint = db_err.constraint().unwrap_or_default();
      let message = if constraint.contains("email") {
        "Email already in use"
      } else if constraint.contains("code") {
        "Product code already in use"
      } else {
        "Duplicate value"
      };
      return AppError::Conflict(message.to_string());
    }
  }
  error!(error = %err, "Database write failed.");
  AppError::Sqlx(err)
}

/// `numeric_value_out_of_range` from a stock increment gets the same error the memory backend reports.
fn map_stock_error(err: sqlx::Error) -> AppError {
  if let sqlx::Error::Database(db_err) = &err {
    if db_err.code().as_deref() == Some("22003") {
      return AppError::Validation(STOCK_OUT_OF_RANGE.to_string());
    }
  }
  AppError::Sqlx(err)
}

#[derive(FromRow)]
struct OrderDetailsRow {
  #[sqlx(flatten)]
  order: Order,
  user_name: Option<String>,
  user_email: Option<String>,
  product_name: Option<String>,
  product_description: Option<String>,
}

impl From<OrderDetailsRow> for OrderDetails {
  fn from(row: OrderDetailsRow) -> Self {
    let user = match (row.user_name, row.user_email) {
      (Some(name), Some(email)) => Some(UserSummary { name, email }),
      _ => None,
    };
    let product = match (row.product_name, row.product_description) {
      (Some(name), Some(description)) => Some(ProductSummary { name, description }),
      _ => None,
    };
    OrderDetails {
      order: row.order,
      user,
      product,
    }
  }
}

#[async_trait]
impl UserRepository for PgStore {
  async fn list(&self) -> Result<Vec<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC");
    Ok(sqlx::query_as(&sql).fetch_all(&self.pool).await?)
  }

  async fn find_by_id(&self, id: i32) -> Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
  }

  async fn find_by_uid(&self, uid: &str) -> Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE uid = $1");
    Ok(sqlx::query_as(&sql).bind(uid).fetch_optional(&self.pool).await?)
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
    Ok(sqlx::query_as(&sql).bind(email).fetch_optional(&self.pool).await?)
  }

  #[instrument(name = "pg::insert_user", skip(self, row), fields(uid = %row.uid))]
  async fn insert(&self, row: NewUserRow) -> Result<User> {
    let sql = format!("INSERT INTO users (uid, name, email) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}");
    sqlx::query_as(&sql)
      .bind(&row.uid)
      .bind(&row.name)
      .bind(&row.email)
      .fetch_one(&self.pool)
      .await
      .map_err(map_write_error)
  }

  async fn update(&self, id: i32, patch: UserPatch) -> Result<Option<User>> {
    let sql = format!(
      "UPDATE users SET name = COALESCE($2, name), email = COALESCE($3, email), updated_at = NOW() \
       WHERE id = $1 RETURNING {USER_COLUMNS}"
    );
    sqlx::query_as(&sql)
      .bind(id)
      .bind(patch.name)
      .bind(patch.email)
      .fetch_optional(&self.pool)
      .await
      .map_err(map_write_error)
  }

  async fn delete(&self, id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() == 1)
  }
}

#[async_trait]
impl ProductRepository for PgStore {
  async fn list(&self) -> Result<Vec<Product>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id ASC");
    Ok(sqlx::query_as(&sql).fetch_all(&self.pool).await?)
  }

  async fn find_by_id(&self, id: i32) -> Result<Option<Product>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
    Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
  }

  async fn find_by_code(&self, code: &str) -> Result<Option<Product>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE code = $1");
    Ok(sqlx::query_as(&sql).bind(code).fetch_optional(&self.pool).await?)
  }

  #[instrument(name = "pg::insert_product", skip(self, product), fields(code = %product.code))]
  async fn insert(&self, product: NewProduct) -> Result<Product> {
    let sql = format!(
      "INSERT INTO products (code, name, description, price, amount) VALUES ($1, $2, $3, $4, $5) \
       RETURNING {PRODUCT_COLUMNS}"
    );
    sqlx::query_as(&sql)
      .bind(&product.code)
      .bind(&product.name)
      .bind(&product.description)
      .bind(product.price.round_dp(2))
      .bind(product.amount)
      .fetch_one(&self.pool)
      .await
      .map_err(map_write_error)
  }

  async fn update(&self, id: i32, patch: ProductPatch) -> Result<Option<Product>> {
    let sql = format!(
      "UPDATE products SET code = COALESCE($2, code), name = COALESCE($3, name), \
       description = COALESCE($4, description), price = COALESCE($5, price), amount = COALESCE($6, amount), \
       updated_at = NOW() WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
    );
    sqlx::query_as(&sql)
      .bind(id)
      .bind(patch.code)
      .bind(patch.name)
      .bind(patch.description)
      .bind(patch.price.map(|p| p.round_dp(2)))
      .bind(patch.amount)
      .fetch_optional(&self.pool)
      .await
      .map_err(map_write_error)
  }

  async fn delete(&self, id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() == 1)
  }

  #[instrument(name = "pg::try_debit", skip(self))]
  async fn try_debit(&self, id: i32, qty: i32) -> Result<Option<Product>> {
    let sql = format!(
      "UPDATE products SET amount = amount - $2, updated_at = NOW() \
       WHERE id = $1 AND amount >= $2 RETURNING {PRODUCT_COLUMNS}"
    );
    Ok(sqlx::query_as(&sql).bind(id).bind(qty).fetch_optional(&self.pool).await?)
  }

  #[instrument(name = "pg::credit", skip(self))]
  async fn credit(&self, id: i32, qty: i32) -> Result<Option<Product>> {
    let sql = format!(
      "UPDATE products SET amount = amount + $2, updated_at = NOW() WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
    );
    sqlx::query_as(&sql)
      .bind(id)
      .bind(qty)
      .fetch_optional(&self.pool)
      .await
      .map_err(map_stock_error)
  }
}

#[async_trait]
impl OrderRepository for PgStore {
  async fn find_by_id(&self, id: i32) -> Result<Option<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
    Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
  }

  async fn find_details(&self, id: i32) -> Result<Option<OrderDetails>> {
    let sql = format!("{ORDER_DETAILS_SELECT} WHERE o.id = $1");
    let row: Option<OrderDetailsRow> = sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?;
    Ok(row.map(OrderDetails::from))
  }

  async fn list_page(&self, offset: i64, limit: i64) -> Result<(Vec<OrderDetails>, i64)> {
    let sql = format!("{ORDER_DETAILS_SELECT} ORDER BY o.id ASC LIMIT $1 OFFSET $2");
    let rows: Vec<OrderDetailsRow> = sqlx::query_as(&sql)
      .bind(limit)
      .bind(offset)
      .fetch_all(&self.pool)
      .await?;
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
      .fetch_one(&self.pool)
      .await?;
    Ok((rows.into_iter().map(OrderDetails::from).collect(), total))
  }

  async fn list_by_uid(&self, uid: &str) -> Result<Vec<OrderDetails>> {
    let sql = format!("{ORDER_DETAILS_SELECT} WHERE o.uid = $1 ORDER BY o.id ASC");
    let rows: Vec<OrderDetailsRow> = sqlx::query_as(&sql).bind(uid).fetch_all(&self.pool).await?;
    Ok(rows.into_iter().map(OrderDetails::from).collect())
  }

  #[instrument(name = "pg::insert_order", skip(self, row), fields(uid = %row.uid, product_id = row.product_id))]
  async fn insert(&self, row: NewOrderRow) -> Result<Order> {
    let sql = format!(
      "INSERT INTO orders (uid, code, amount, user_id, product_id) VALUES ($1, $2, $3, $4, $5) \
       RETURNING {ORDER_COLUMNS}"
    );
    sqlx::query_as(&sql)
      .bind(&row.uid)
      .bind(&row.code)
      .bind(row.amount)
      .bind(row.user_id)
      .bind(row.product_id)
      .fetch_one(&self.pool)
      .await
      .map_err(map_write_error)
  }

  async fn update_amount(&self, id: i32, amount: i32) -> Result<Option<Order>> {
    let sql = format!("UPDATE orders SET amount = $2, updated_at = NOW() WHERE id = $1 RETURNING {ORDER_COLUMNS}");
    Ok(sqlx::query_as(&sql).bind(id).bind(amount).fetch_optional(&self.pool).await?)
  }

  async fn delete(&self, id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() == 1)
  }
}
