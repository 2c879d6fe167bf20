// tests/context_management_tests.rs
mod common;

use common::*;
use flow::{ContextData, FlowError, Pipeline, PipelineControl};
use serial_test::serial;

#[tokio::test]
#[serial]
async fn later_steps_see_writes_from_earlier_steps() {
  setup_tracing();
  let mut pipeline = Pipeline::<ReserveContext, TestError>::new(&[("load", false, None), ("reserve", false, None)]);

  pipeline.on("load", |ctx: ContextData<ReserveContext>| async move {
    let mut guard = ctx.write();
    guard.available = 8;
    guard.requested = 3;
    Ok::<_, FlowError>(PipelineControl::Continue)
  });
  pipeline.on("reserve", reserve_handler());

  let ctx = ContextData::new(ReserveContext::default());
  pipeline.run(ctx.clone()).await.unwrap();

  let guard = ctx.read();
  assert_eq!(guard.available, 5);
  assert_eq!(guard.reserved, 3);
}

#[tokio::test]
#[serial]
async fn clones_share_the_same_data() {
  setup_tracing();
  let original = ContextData::new(ReserveContext::with_stock(1, 0));
  let cloned = original.clone();

  original.write().available = 5;
  assert_eq!(cloned.read().available, 5);

  cloned.write().reserved = 2;
  assert_eq!(original.read().reserved, 2);
}

#[tokio::test]
#[serial]
async fn snapshot_detaches_from_later_writes() {
  setup_tracing();
  let ctx = ContextData::new(ReserveContext::with_stock(4, 1));
  let before = ctx.snapshot();
  ctx.write().available = 0;

  assert_eq!(before.available, 4);
  assert_eq!(ctx.read().available, 0);
}

#[tokio::test]
#[serial]
async fn handler_can_await_after_releasing_its_guard() {
  setup_tracing();
  let mut pipeline = Pipeline::<ReserveContext, TestError>::new(&[("reload", false, None)]);
  pipeline.on("reload", |ctx: ContextData<ReserveContext>| async move {
    let requested = ctx.read().requested;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    ctx.write().available = requested * 2;
    Ok::<_, FlowError>(PipelineControl::Continue)
  });

  let ctx = ContextData::new(ReserveContext::with_stock(0, 6));
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().available, 12);
}
