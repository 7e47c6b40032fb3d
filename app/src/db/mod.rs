// app/src/db/mod.rs

//! Typed data access for products and orders.
//!
//! Each entity gets its own trait so handlers and pipelines depend on the
//! operations they use, not on a storage engine. `postgres` is the durable
//! backend; `memory` keeps seeded tables in process for development and tests.

pub mod memory;
pub mod postgres;

use crate::errors::Result;
use crate::models::{Category, Ingredient, NewOrder, Order, OrderItem, Product};
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// Outcome of a conditional stock decrement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockTake {
  /// Stock was decremented; carries the product as it is after the update.
  Taken(Product),
  NotFound,
  /// Nothing changed; `available` is the stock seen at the time.
  Insufficient { available: i32 },
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
  /// All products ordered by id.
  async fn list_products(&self) -> Result<Vec<Product>>;

  async fn find_product(&self, product_id: i32) -> Result<Option<Product>>;

  async fn list_categories(&self) -> Result<Vec<Category>>;

  async fn list_ingredients(&self) -> Result<Vec<Ingredient>>;

  /// Decrements stock by `quantity` only if at least that much is left.
  /// Check and write happen as one atomic operation, so concurrent callers
  /// can never drive stock below zero.
  async fn try_take_stock(&self, product_id: i32, quantity: i32) -> Result<StockTake>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
  /// Writes the order and all its lines as a single unit.
  async fn insert_order(&self, new_order: NewOrder) -> Result<Order>;

  /// The user's orders by `(created_at, id)`, each with its items and the
  /// referenced products loaded. Empty when the user has none.
  async fn list_orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>>;
}

/// Distributes `items` (already in id order) onto their orders and resolves
/// each item's product.
pub(crate) fn attach_items(orders: &mut [Order], items: Vec<OrderItem>, products: &HashMap<i32, Product>) {
  let index: HashMap<i32, usize> = orders.iter().enumerate().map(|(pos, o)| (o.id, pos)).collect();
  for mut item in items {
    item.product = products.get(&item.product_id).cloned();
    if let Some(&pos) = index.get(&item.order_id) {
      orders[pos].items.push(item);
    }
  }
}
