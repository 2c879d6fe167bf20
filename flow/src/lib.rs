// flow/src/lib.rs

//! Async step pipelines for multi-step business workflows.
//!
//! A [`Pipeline`] is an ordered list of named steps run against a shared
//! [`ContextData`]. Every step may carry `before`, `on` and `after` handlers,
//! can be marked optional, and can be skipped by a condition evaluated on the
//! context at run time. Handlers return [`PipelineControl::Continue`] to move
//! on, [`PipelineControl::Stop`] to halt the run, or an error which aborts it.
//!
//! A [`FlowRegistry`] keeps one pipeline per context type, so callers only
//! need to build the context and call `run`.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context::Handler;
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{FlowError, FlowResult};

pub use crate::registry::FlowRegistry;
