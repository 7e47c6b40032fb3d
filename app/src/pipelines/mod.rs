// app/src/pipelines/mod.rs

//! Pipelines behind the order workflow, and the registration of all of them.

use crate::errors::AppError;
use bistro_flow::Registry;
use tracing::info;

pub mod cart_pipeline;
pub mod contexts;
pub mod order_pipeline;

pub use cart_pipeline::{add_item, AddItemOutcome};
pub use order_pipeline::{place_order, PlaceOrderOutcome};

/// Registers every pipeline the application runs. Called once while the
/// application state is built.
pub fn register_all_pipelines(registry: &Registry<AppError>) {
  cart_pipeline::register_add_item_pipeline(registry);
  order_pipeline::register_place_order_pipeline(registry);
  info!("All application pipelines registered.");
}
