// server/src/lib.rs

//! Stockroom: users, products and orders over a REST API, with order
//! placement, amendment and cancellation moving product stock.

pub mod config;
pub mod envelope;
pub mod errors;
pub mod ledger;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod store;
pub mod web;

pub use errors::{AppError, Result};
pub use state::AppState;
