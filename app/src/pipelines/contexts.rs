// app/src/pipelines/contexts.rs

//! Data carried through the application's pipelines. Handlers receive these
//! wrapped in `bistro_flow::ContextData`.

use crate::models::{Cart, Order, Product};
use crate::session::SessionId;
use crate::state::AppState;
use uuid::Uuid;

#[derive(Clone)]
pub struct AddItemCtxData {
  pub app_state: AppState,
  pub session: SessionId,
  pub product_id: i32,
  pub quantity: i32,
  /// Product as it is after its stock was taken.
  pub taken_product: Option<Product>,
  /// Stock seen when the request could not be satisfied.
  pub insufficient_available: Option<i32>,
  pub updated_cart: Option<Cart>,
}

impl AddItemCtxData {
  pub fn new(app_state: AppState, session: SessionId, product_id: i32, quantity: i32) -> Self {
    Self {
      app_state,
      session,
      product_id,
      quantity,
      taken_product: None,
      insufficient_available: None,
      updated_cart: None,
    }
  }
}

#[derive(Clone)]
pub struct PlaceOrderCtxData {
  pub app_state: AppState,
  pub session: SessionId,
  pub user_id: Uuid,
  pub cart: Option<Cart>,
  pub placed_order: Option<Order>,
}

impl PlaceOrderCtxData {
  pub fn new(app_state: AppState, session: SessionId, user_id: Uuid) -> Self {
    Self {
      app_state,
      session,
      user_id,
      cart: None,
      placed_order: None,
    }
  }
}
