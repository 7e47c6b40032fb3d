// app/src/pipelines/order_pipeline.rs

use crate::errors::{AppError, Result};
use crate::models::{NewOrder, Order};
use crate::pipelines::contexts::PlaceOrderCtxData;
use crate::session::SessionId;
use crate::state::AppState;
use bistro_flow::{ContextData, Pipeline, PipelineControl, PipelineResult, Registry};
use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceOrderOutcome {
  Placed(Order),
  /// There was nothing to order; nothing was written.
  EmptyCart,
}

pub fn build_place_order_pipeline() -> Pipeline<PlaceOrderCtxData, AppError> {
  let mut p = Pipeline::<PlaceOrderCtxData, AppError>::new(&[
    ("load_cart", false, None),
    ("persist_order", false, None),
    ("clear_cart", false, None),
  ]);

  p.on_root("load_cart", |ctx_data| Box::pin(load_cart(ctx_data)));
  p.on_root("persist_order", |ctx_data| Box::pin(persist_order(ctx_data)));
  p.on_root("clear_cart", |ctx_data| Box::pin(clear_cart(ctx_data)));

  p
}

/// Stops the pipeline when there is no cart or it has no lines.
async fn load_cart(ctx_data: ContextData<PlaceOrderCtxData>) -> Result<PipelineControl> {
  let (carts, session) = {
    let guard = ctx_data.read();
    (guard.app_state.carts.clone(), guard.session)
  };

  match carts.load(session).await? {
    Some(cart) if !cart.is_empty() => {
      ctx_data.write().cart = Some(cart);
      Ok(PipelineControl::Continue)
    }
    _ => {
      info!("Place order: cart is empty, nothing to place.");
      Ok(PipelineControl::Stop)
    }
  }
}

async fn persist_order(ctx_data: ContextData<PlaceOrderCtxData>) -> Result<PipelineControl> {
  let (orders, user_id, cart) = {
    let guard = ctx_data.read();
    (guard.app_state.orders.clone(), guard.user_id, guard.cart.clone())
  };
  let cart = cart.ok_or_else(|| AppError::Internal("Place order reached persist_order without a cart.".to_string()))?;

  let order = orders.insert_order(NewOrder::from_cart(user_id, &cart, Utc::now())).await?;
  info!(
    order_id = order.id,
    total_cents = order.total_cents,
    lines = order.items.len(),
    "Place order: order persisted."
  );
  ctx_data.write().placed_order = Some(order);
  Ok(PipelineControl::Continue)
}

async fn clear_cart(ctx_data: ContextData<PlaceOrderCtxData>) -> Result<PipelineControl> {
  let (carts, session) = {
    let guard = ctx_data.read();
    (guard.app_state.carts.clone(), guard.session)
  };
  carts.clear(session).await?;
  Ok(PipelineControl::Continue)
}

pub fn register_place_order_pipeline(registry: &Registry<AppError>) {
  registry.register_pipeline(build_place_order_pipeline());
  info!("Place order pipeline registered.");
}

/// Turns the session's cart into a persisted order owned by `user_id` and
/// empties the cart.
#[instrument(name = "pipeline::place_order", skip(state), fields(session = %session, user_id = %user_id))]
pub async fn place_order(state: &AppState, session: SessionId, user_id: Uuid) -> Result<PlaceOrderOutcome> {
  let _cart_lock = state.carts.lock(session).await;
  let ctx_data = ContextData::new(PlaceOrderCtxData::new(state.clone(), session, user_id));

  match state.flows.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {
      let order = ctx_data.read().placed_order.clone();
      order
        .map(PlaceOrderOutcome::Placed)
        .ok_or_else(|| AppError::Internal("Place order completed without an order.".to_string()))
    }
    PipelineResult::Stopped => Ok(PlaceOrderOutcome::EmptyCart),
  }
}
