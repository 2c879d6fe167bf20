// server/src/services/mod.rs

//! Single-step reads and writes that need no pipeline.

pub mod orders;
pub mod products;
pub mod users;
