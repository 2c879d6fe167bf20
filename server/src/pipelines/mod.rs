// server/src/pipelines/mod.rs

//! The multi-step workflows, defined on the `flow` engine and registered once at startup.

use crate::errors::{AppError, Result as AppResult};
use flow::{FlowRegistry, PipelineResult};

pub mod contexts;
pub mod order_pipeline;
pub mod user_pipeline;

pub use order_pipeline::{run_create_order, run_delete_order, run_update_order};
pub use user_pipeline::{run_create_user, run_update_user};

/// Registers every application pipeline. Called once when `AppState` is built.
pub fn register_all_pipelines(flows: &FlowRegistry<AppError>) {
  tracing::info!("Registering pipelines...");

  order_pipeline::register_create_order_pipeline(flows);
  order_pipeline::register_update_order_pipeline(flows);
  order_pipeline::register_delete_order_pipeline(flows);
  user_pipeline::register_create_user_pipeline(flows);
  user_pipeline::register_update_user_pipeline(flows);

  tracing::info!("All application pipelines registered.");
}

/// None of the workflows stop early on success, so a stopped run is a wiring fault.
fn expect_completed(result: PipelineResult, pipeline: &str) -> AppResult<()> {
  match result {
    PipelineResult::Completed => Ok(()),
    PipelineResult::Stopped => Err(AppError::Internal(format!("Pipeline '{}' stopped before completing", pipeline))),
  }
}

/// Reads a value an earlier step was expected to leave in the context.
fn required<T>(value: Option<T>, what: &str) -> AppResult<T> {
  value.ok_or_else(|| AppError::Internal(format!("{} missing from pipeline context", what)))
}
