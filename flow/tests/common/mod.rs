// tests/common/mod.rs
#![allow(dead_code)]

use flow::{ContextData, FlowError, PipelineControl};
use tracing::Level;

/// A small reservation-shaped context: each step records itself in `trail`.
#[derive(Clone, Debug, Default)]
pub struct ReserveContext {
  pub available: i32,
  pub requested: i32,
  pub reserved: i32,
  pub trail: Vec<String>,
  pub stop_at: Option<String>,
}

impl ReserveContext {
  pub fn with_stock(available: i32, requested: i32) -> Self {
    Self {
      available,
      requested,
      ..Default::default()
    }
  }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Flow error: {0}")]
  Flow(String),

  #[error("Not enough stock: {0}")]
  Insufficient(String),

  #[error("Step failed: {0}")]
  Step(String),
}

impl From<FlowError> for TestError {
  fn from(err: FlowError) -> Self {
    TestError::Flow(format!("{:?}", err))
  }
}

/// Records `step_name` in the trail and stops if the context asks for it.
pub fn recording_handler(step_name: &'static str) -> flow::Handler<ReserveContext, TestError> {
  Box::new(move |ctx: ContextData<ReserveContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.trail.push(step_name.to_string());
      tracing::debug!(target: "test_handlers", step = step_name, "recorded");
      if guard.stop_at.as_deref() == Some(step_name) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  })
}

/// Moves `requested` units from `available` to `reserved`, failing when short.
pub fn reserve_handler() -> flow::Handler<ReserveContext, TestError> {
  Box::new(|ctx: ContextData<ReserveContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.trail.push("reserve".to_string());
      if guard.available < guard.requested {
        return Err(TestError::Insufficient(format!(
          "requested {}, available {}",
          guard.requested, guard.available
        )));
      }
      let requested = guard.requested;
      guard.available -= requested;
      guard.reserved += requested;
      Ok(PipelineControl::Continue)
    })
  })
}

pub fn failing_handler(step_name: &'static str, message: &'static str) -> flow::Handler<ReserveContext, TestError> {
  Box::new(move |ctx: ContextData<ReserveContext>| {
    Box::pin(async move {
      ctx.write().trail.push(step_name.to_string());
      Err(TestError::Step(message.to_string()))
    })
  })
}

use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
