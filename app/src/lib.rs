// app/src/lib.rs

//! Restaurant ordering service: a session cart with stock taken as items
//! are added, order placement, and per-user order history.

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod session;
pub mod state;
pub mod web;

pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use state::AppState;
