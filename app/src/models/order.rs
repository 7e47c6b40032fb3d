// app/src/models/order.rs

use crate::models::cart::Cart;
use crate::models::order_item::OrderItem;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A placed order. Never edited after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Order {
  pub id: i32,
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
  pub total_cents: i64,
  #[sqlx(skip)]
  pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderLine {
  pub product_id: i32,
  pub quantity: i32,
  pub price_cents: i32,
}

/// Everything needed to write an order and its lines in one go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
  pub total_cents: i64,
  pub lines: Vec<NewOrderLine>,
}

impl NewOrder {
  /// Copies the cart's snapshot prices, not the products' live prices.
  pub fn from_cart(user_id: Uuid, cart: &Cart, created_at: DateTime<Utc>) -> Self {
    Self {
      user_id,
      created_at,
      total_cents: cart.total_cents(),
      lines: cart
        .lines()
        .iter()
        .map(|line| NewOrderLine {
          product_id: line.product_id,
          quantity: line.quantity,
          price_cents: line.price_cents,
        })
        .collect(),
    }
  }
}
