// app/src/models/product.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Product {
  pub id: i32,
  pub name: String,
  pub description: Option<String>,
  pub price_cents: i32,
  /// Units left to sell. Never negative.
  pub stock: i32,
  pub category_id: i32,
  pub image_url: Option<String>,
  pub ingredient_ids: Vec<i32>,
}
