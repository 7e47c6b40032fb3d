// app/src/pipelines/cart_pipeline.rs

use crate::db::StockTake;
use crate::errors::{AppError, Result};
use crate::models::Cart;
use crate::pipelines::contexts::AddItemCtxData;
use crate::session::SessionId;
use crate::state::AppState;
use bistro_flow::{ContextData, Pipeline, PipelineControl, PipelineResult, Registry};
use tracing::{info, instrument, warn};

pub const INSUFFICIENT_STOCK_MESSAGE: &str = "Insufficient stock available.";

/// What became of an add-item request that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddItemOutcome {
  Added { cart: Cart },
  /// Nothing changed. A flash message was left for the next cart view.
  InsufficientStock { available: i32 },
}

pub fn build_add_item_pipeline() -> Pipeline<AddItemCtxData, AppError> {
  let mut p = Pipeline::<AddItemCtxData, AppError>::new(&[
    ("validate_quantity", false, None),
    ("take_stock", false, None),
    ("update_cart", false, None),
  ]);

  p.on_root("validate_quantity", |ctx_data: ContextData<AddItemCtxData>| {
    Box::pin(async move {
      let quantity = ctx_data.read().quantity;
      if quantity <= 0 {
        warn!(quantity, "Add item: quantity must be positive.");
        return Err(AppError::Validation("Quantity must be a positive number.".to_string()));
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Stock is decremented as soon as the item lands in the cart, not at
  // checkout. The decrement is a single conditional write.
  p.on_root("take_stock", |ctx_data| Box::pin(take_stock(ctx_data)));
  p.on_root("update_cart", |ctx_data| Box::pin(update_cart(ctx_data)));

  p
}

async fn take_stock(ctx_data: ContextData<AddItemCtxData>) -> Result<PipelineControl> {
  let (products, carts, session, product_id, quantity) = {
    let guard = ctx_data.read();
    (
      guard.app_state.products.clone(),
      guard.app_state.carts.clone(),
      guard.session,
      guard.product_id,
      guard.quantity,
    )
  };

  match products.try_take_stock(product_id, quantity).await? {
    StockTake::Taken(product) => {
      info!(product_id, quantity, remaining = product.stock, "Add item: stock taken.");
      ctx_data.write().taken_product = Some(product);
      Ok(PipelineControl::Continue)
    }
    StockTake::NotFound => {
      warn!(product_id, "Add item: product not found.");
      Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)))
    }
    StockTake::Insufficient { available } => {
      warn!(product_id, quantity, available, "Add item: insufficient stock.");
      carts.set_flash_error(session, INSUFFICIENT_STOCK_MESSAGE).await?;
      ctx_data.write().insufficient_available = Some(available);
      Ok(PipelineControl::Stop)
    }
  }
}

async fn update_cart(ctx_data: ContextData<AddItemCtxData>) -> Result<PipelineControl> {
  let (carts, session, quantity, product) = {
    let guard = ctx_data.read();
    (
      guard.app_state.carts.clone(),
      guard.session,
      guard.quantity,
      guard.taken_product.clone(),
    )
  };
  let product =
    product.ok_or_else(|| AppError::Internal("Add item reached update_cart without a product.".to_string()))?;

  let mut cart = carts.get_or_create(session).await?;
  cart.add_line(&product, quantity);
  carts.save(session, &cart).await?;

  info!(
    product_id = product.id,
    lines = cart.lines().len(),
    total_cents = cart.total_cents(),
    "Add item: cart updated."
  );
  ctx_data.write().updated_cart = Some(cart);
  Ok(PipelineControl::Continue)
}

pub fn register_add_item_pipeline(registry: &Registry<AppError>) {
  registry.register_pipeline(build_add_item_pipeline());
  info!("Add item pipeline registered.");
}

/// Adds `quantity` of a product to the session's cart, taking the stock.
///
/// A missing product or a non-positive quantity is an error; running short
/// of stock is an ordinary outcome.
#[instrument(name = "pipeline::add_item", skip(state), fields(session = %session))]
pub async fn add_item(state: &AppState, session: SessionId, product_id: i32, quantity: i32) -> Result<AddItemOutcome> {
  // Held for the whole run: one cart change per session at a time.
  let _cart_lock = state.carts.lock(session).await;
  let ctx_data = ContextData::new(AddItemCtxData::new(state.clone(), session, product_id, quantity));

  match state.flows.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {
      let cart = ctx_data.read().updated_cart.clone();
      cart
        .map(|cart| AddItemOutcome::Added { cart })
        .ok_or_else(|| AppError::Internal("Add item completed without an updated cart.".to_string()))
    }
    PipelineResult::Stopped => {
      let available = ctx_data.read().insufficient_available;
      available
        .map(|available| AddItemOutcome::InsufficientStock { available })
        .ok_or_else(|| AppError::Internal("Add item halted without a reason.".to_string()))
    }
  }
}
