// app/src/web/handlers/order_handlers.rs

use actix_web::http::header;
use actix_web::{web, Either, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::pipelines::{self, AddItemOutcome, PlaceOrderOutcome};
use crate::state::AppState;
use crate::web::extractors::{AuthenticatedUser, SessionHandle};

pub const CREATE_PATH: &str = "/order/create";
pub const HISTORY_PATH: &str = "/order/history";

fn see_other(location: &str) -> HttpResponse {
  HttpResponse::SeeOther()
    .insert_header((header::LOCATION, location))
    .finish()
}

#[derive(Deserialize, Debug)]
pub struct AddItemPayload {
  #[serde(alias = "prodId")]
  pub product_id: i32,
  #[serde(alias = "prodQty")]
  pub quantity: i32,
}

/// Cart-building view: the session's cart, the menu and any pending error.
#[instrument(name = "handler::order_create", skip_all, fields(user_id = %auth_user.user_id))]
pub async fn create_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  session: SessionHandle,
) -> Result<HttpResponse, AppError> {
  let error = app_state.carts.take_flash_error(session.id).await?;
  let cart = app_state.carts.get_or_create(session.id).await?;
  let products = app_state.products.list_products().await?;
  let categories = app_state.products.list_categories().await?;

  Ok(HttpResponse::Ok().json(json!({
      "cart": cart.view(),
      "products": products,
      "categories": categories,
      "error": error
  })))
}

#[instrument(name = "handler::order_add_item", skip_all, fields(user_id = %auth_user.user_id))]
pub async fn add_item_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  session: SessionHandle,
  payload: Either<web::Json<AddItemPayload>, web::Form<AddItemPayload>>,
) -> Result<HttpResponse, AppError> {
  let payload = match payload {
    Either::Left(json) => json.into_inner(),
    Either::Right(form) => form.into_inner(),
  };
  info!(
    product_id = payload.product_id,
    quantity = payload.quantity,
    "Add item requested."
  );

  match pipelines::add_item(&app_state, session.id, payload.product_id, payload.quantity).await? {
    AddItemOutcome::Added { cart } => {
      info!(total_cents = cart.total_cents(), "Item added to cart.");
    }
    AddItemOutcome::InsufficientStock { available } => {
      info!(available, "Item not added, insufficient stock.");
    }
  }
  Ok(see_other(CREATE_PATH))
}

#[instrument(name = "handler::order_cart", skip_all, fields(user_id = %auth_user.user_id))]
pub async fn cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  session: SessionHandle,
) -> Result<HttpResponse, AppError> {
  match app_state.carts.load(session.id).await? {
    Some(cart) if !cart.is_empty() => Ok(HttpResponse::Ok().json(json!({ "cart": cart.view() }))),
    _ => Ok(see_other(CREATE_PATH)),
  }
}

#[instrument(name = "handler::order_place", skip_all, fields(user_id = %auth_user.user_id))]
pub async fn place_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  session: SessionHandle,
) -> Result<HttpResponse, AppError> {
  match pipelines::place_order(&app_state, session.id, auth_user.user_id).await? {
    PlaceOrderOutcome::Placed(order) => {
      info!(order_id = order.id, total_cents = order.total_cents, "Order placed.");
      Ok(see_other(HISTORY_PATH))
    }
    PlaceOrderOutcome::EmptyCart => Ok(see_other(CREATE_PATH)),
  }
}

#[instrument(name = "handler::order_history", skip_all, fields(user_id = %auth_user.user_id))]
pub async fn history_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.orders.list_orders_for_user(auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}
