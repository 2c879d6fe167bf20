// flow/src/core/context.rs

//! The boxed handler type stored by a pipeline for each step phase.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// A step handler: takes a clone of the run's `ContextData<TData>` and
/// resolves to `Continue`, `Stop` or the pipeline's error type.
///
/// Lock guards taken from the context must be dropped before the handler
/// awaits anything.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;
