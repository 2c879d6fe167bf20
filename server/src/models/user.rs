// server/src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: i32,
  /// Generated server-side at creation; clients never choose it.
  pub uid: String,
  pub name: String,
  pub email: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
  pub name: String,
  pub email: String,
}

/// What the repository inserts: the request plus the generated uid.
#[derive(Debug, Clone)]
pub struct NewUserRow {
  pub uid: String,
  pub name: String,
  pub email: String,
}

/// Body of `PUT /users/{id}`; absent fields are left as they are.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
  pub name: Option<String>,
  pub email: Option<String>,
}
