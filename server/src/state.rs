// server/src/state.rs
use crate::errors::AppError;
use crate::pipelines;
use crate::store::{OrderRepository, ProductRepository, UserRepository};
use flow::FlowRegistry;
use std::sync::Arc;

/// Everything a handler needs, cloned into each actix worker.
#[derive(Clone)]
pub struct AppState {
  pub users: Arc<dyn UserRepository>,
  pub products: Arc<dyn ProductRepository>,
  pub orders: Arc<dyn OrderRepository>,
  pub flows: Arc<FlowRegistry<AppError>>,
}

impl AppState {
  /// Wires one backend into all three repository slots and registers every pipeline.
  pub fn with_store<S>(store: Arc<S>) -> Self
  where
    S: UserRepository + ProductRepository + OrderRepository + 'static,
  {
    let flows = Arc::new(FlowRegistry::<AppError>::new());
    pipelines::register_all_pipelines(&flows);

    Self {
      users: store.clone(),
      products: store.clone(),
      orders: store,
      flows,
    }
  }
}
