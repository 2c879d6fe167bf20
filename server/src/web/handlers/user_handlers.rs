// server/src/web/handlers/user_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use tracing::instrument;

use crate::envelope::success;
use crate::errors::{ApiError, ForRequest};
use crate::models::{NewUser, UserPatch};
use crate::pipelines;
use crate::services::users;
use crate::state::AppState;

#[instrument(name = "handler::list_users", skip(app_state, req))]
pub async fn list_users_handler(app_state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, ApiError> {
  let all = users::list_users(&app_state)
    .await
    .for_request(&req, "Failed to retrieve users")?;
  Ok(success("Users found", all))
}

#[instrument(name = "handler::get_user", skip(app_state, req))]
pub async fn get_user_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
  let user = users::get_user(&app_state, path.into_inner())
    .await
    .for_request(&req, "Failed to retrieve user")?;
  Ok(success("User found", user))
}

#[instrument(name = "handler::get_user_by_uid", skip(app_state, req))]
pub async fn get_user_by_uid_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
  let user = users::get_user_by_uid(&app_state, &path)
    .await
    .for_request(&req, "Failed to retrieve user")?;
  Ok(success("User found", user))
}

#[instrument(name = "handler::create_user", skip(app_state, req, body))]
pub async fn create_user_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  body: web::Json<NewUser>,
) -> Result<HttpResponse, ApiError> {
  let user = pipelines::run_create_user(&app_state, body.into_inner())
    .await
    .for_request(&req, "Failed to create user")?;
  Ok(success("User created", user))
}

#[instrument(name = "handler::update_user", skip(app_state, req, body))]
pub async fn update_user_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  path: web::Path<i32>,
  body: web::Json<UserPatch>,
) -> Result<HttpResponse, ApiError> {
  let user = pipelines::run_update_user(&app_state, path.into_inner(), body.into_inner())
    .await
    .for_request(&req, "Failed to update user")?;
  Ok(success("User updated", user))
}

#[instrument(name = "handler::delete_user", skip(app_state, req))]
pub async fn delete_user_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
  users::delete_user(&app_state, path.into_inner())
    .await
    .for_request(&req, "Failed to delete user")?;
  Ok(success("User deleted", ()))
}
