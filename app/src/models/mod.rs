// app/src/models/mod.rs

//! Catalog and order records plus the session-held cart.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod order_item;
pub mod product;

pub use cart::{Cart, CartLine, CartView};
pub use catalog::{Category, Ingredient};
pub use order::{NewOrder, NewOrderLine, Order};
pub use order_item::OrderItem;
pub use product::Product;
