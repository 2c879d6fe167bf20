// server/src/services/users.rs
use crate::errors::{AppError, Result};
use crate::models::User;
use crate::state::AppState;
use tracing::info;

fn user_not_found() -> AppError {
  AppError::NotFound("User not found".to_string())
}

pub async fn list_users(state: &AppState) -> Result<Vec<User>> {
  state.users.list().await
}

pub async fn get_user(state: &AppState, user_id: i32) -> Result<User> {
  state.users.find_by_id(user_id).await?.ok_or_else(user_not_found)
}

pub async fn get_user_by_uid(state: &AppState, uid: &str) -> Result<User> {
  state.users.find_by_uid(uid).await?.ok_or_else(user_not_found)
}

pub async fn delete_user(state: &AppState, user_id: i32) -> Result<()> {
  if !state.users.delete(user_id).await? {
    return Err(user_not_found());
  }
  info!(user_id, "User deleted.");
  Ok(())
}
