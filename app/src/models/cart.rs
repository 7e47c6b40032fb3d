// app/src/models/cart.rs

//! The in-progress cart kept in session state between requests.

use crate::models::product::Product;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
  pub product_id: i32,
  /// Name and price are copied from the product when the line is created.
  pub product_name: String,
  pub price_cents: i32,
  pub quantity: i32,
}

impl CartLine {
  pub fn line_total_cents(&self) -> i64 {
    i64::from(self.price_cents) * i64::from(self.quantity)
  }
}

/// Lines in the order they were first added. The total is never stored,
/// only derived from the lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
  lines: Vec<CartLine>,
}

impl Cart {
  pub fn lines(&self) -> &[CartLine] {
    &self.lines
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  pub fn total_cents(&self) -> i64 {
    self.lines.iter().map(CartLine::line_total_cents).sum()
  }

  /// Adds `quantity` of `product`, merging into the existing line for the
  /// same product. A merged line keeps its original price snapshot.
  pub fn add_line(&mut self, product: &Product, quantity: i32) {
    match self.lines.iter_mut().find(|line| line.product_id == product.id) {
      Some(line) => line.quantity += quantity,
      None => self.lines.push(CartLine {
        product_id: product.id,
        product_name: product.name.clone(),
        price_cents: product.price_cents,
        quantity,
      }),
    }
  }

  pub fn clear(&mut self) {
    self.lines.clear();
  }

  pub fn view(&self) -> CartView {
    CartView {
      lines: self.lines.clone(),
      total_cents: self.total_cents(),
    }
  }
}

/// Serializable cart with its derived total, for responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
  pub lines: Vec<CartLine>,
  pub total_cents: i64,
}
