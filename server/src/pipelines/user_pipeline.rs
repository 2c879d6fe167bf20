// server/src/pipelines/user_pipeline.rs

use super::contexts::{CreateUserCtxData, UpdateUserCtxData};
use super::{expect_completed, required};
use crate::errors::{AppError, Result as AppResult};
use crate::models::{NewUser, NewUserRow, User, UserPatch};
use crate::state::AppState;
use flow::{ContextData, FlowRegistry, Pipeline, PipelineControl, SkipCondition};
use std::sync::Arc;
use tracing::{event, info, instrument, warn, Level};
use uuid::Uuid;

const EMAIL_IN_USE: &str = "Email already in use";

/// Registers the user sign-up pipeline.
pub fn register_create_user_pipeline(flows: &FlowRegistry<AppError>) {
  let mut p = Pipeline::<CreateUserCtxData, AppError>::new(&[
    ("check_email_available", false, None),
    ("insert_user", false, None),
  ]);

  p.on("check_email_available", |ctx_data: ContextData<CreateUserCtxData>| async move {
    let (email, users) = {
      let guard = ctx_data.read();
      (guard.email.clone(), guard.app_state.users.clone())
    };

    event!(Level::DEBUG, %email, "Checking if user email already exists.");
    if users.find_by_email(&email).await?.is_some() {
      warn!(%email, "Attempt to register an email that is already in use.");
      return Err(AppError::Conflict(EMAIL_IN_USE.to_string()));
    }
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  p.on("insert_user", |ctx_data: ContextData<CreateUserCtxData>| async move {
    let (name, email, users) = {
      let guard = ctx_data.read();
      (guard.name.clone(), guard.email.clone(), guard.app_state.users.clone())
    };

    let user = users
      .insert(NewUserRow {
        uid: Uuid::new_v4().to_string(),
        name,
        email,
      })
      .await?;
    info!(user_id = user.id, uid = %user.uid, "User created.");
    ctx_data.write().created_user = Some(user);
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  flows.register_pipeline(p);
  tracing::info!("Create-user pipeline registered.");
}

/// Registers the profile update pipeline. The email check only runs when the
/// patch actually changes the address.
pub fn register_update_user_pipeline(flows: &FlowRegistry<AppError>) {
  let email_unchanged: SkipCondition<UpdateUserCtxData> = Arc::new(|ctx_data: ContextData<UpdateUserCtxData>| {
    let guard = ctx_data.read();
    let unchanged = match (&guard.user, &guard.patch.email) {
      (Some(user), Some(email)) => &user.email == email,
      _ => true,
    };
    unchanged
  });

  let mut p = Pipeline::<UpdateUserCtxData, AppError>::new(&[
    ("load_user", false, None),
    ("check_email_change", false, Some(email_unchanged)),
    ("apply_user_patch", false, None),
  ]);

  p.on("load_user", |ctx_data: ContextData<UpdateUserCtxData>| async move {
    let (user_id, users) = {
      let guard = ctx_data.read();
      (guard.user_id, guard.app_state.users.clone())
    };
    let user = users
      .find_by_id(user_id)
      .await?
      .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    ctx_data.write().user = Some(user);
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  p.on("check_email_change", |ctx_data: ContextData<UpdateUserCtxData>| async move {
    let (user_id, email, users) = {
      let guard = ctx_data.read();
      (guard.user_id, guard.patch.email.clone(), guard.app_state.users.clone())
    };
    let email = required(email, "new email")?;

    match users.find_by_email(&email).await? {
      Some(other) if other.id != user_id => {
        warn!(user_id, %email, "Email change collides with another user.");
        Err(AppError::Conflict(EMAIL_IN_USE.to_string()))
      }
      _ => Ok::<_, AppError>(PipelineControl::Continue),
    }
  });

  p.on("apply_user_patch", |ctx_data: ContextData<UpdateUserCtxData>| async move {
    let (user_id, patch, users) = {
      let guard = ctx_data.read();
      (guard.user_id, guard.patch.clone(), guard.app_state.users.clone())
    };
    let user = users
      .update(user_id, patch)
      .await?
      .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    info!(user_id, "User updated.");
    ctx_data.write().user = Some(user);
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  flows.register_pipeline(p);
  tracing::info!("Update-user pipeline registered.");
}

#[instrument(name = "users::create", skip(state, input), fields(email = %input.email))]
pub async fn run_create_user(state: &AppState, input: NewUser) -> AppResult<User> {
  let ctx_data = ContextData::new(CreateUserCtxData::new(state.clone(), input));
  let result = state.flows.run(ctx_data.clone()).await?;
  expect_completed(result, "create_user")?;
  let created = ctx_data.read().created_user.clone();
  required(created, "created user")
}

#[instrument(name = "users::update", skip(state, input))]
pub async fn run_update_user(state: &AppState, user_id: i32, input: UserPatch) -> AppResult<User> {
  let ctx_data = ContextData::new(UpdateUserCtxData::new(state.clone(), user_id, input));
  let result = state.flows.run(ctx_data.clone()).await?;
  expect_completed(result, "update_user")?;
  let user = ctx_data.read().user.clone();
  required(user, "user")
}
