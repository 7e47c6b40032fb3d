// app/src/models/order_item.rs

use crate::models::product::Product;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct OrderItem {
  pub id: i32,
  pub order_id: i32,
  pub product_id: i32,
  pub quantity: i32,
  /// Unit price captured when the item went into the cart.
  pub price_cents: i32,
  /// Filled in by the order history query.
  #[sqlx(skip)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub product: Option<Product>,
}
