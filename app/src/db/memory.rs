// app/src/db/memory.rs

//! Process-local tables behind the repository traits.
//!
//! Each operation takes a single `parking_lot` lock, which gives the same
//! atomicity the Postgres backend gets from its row locks and transactions.

use crate::db::{attach_items, OrderRepository, ProductRepository, StockTake};
use crate::errors::Result;
use crate::models::{Category, Ingredient, NewOrder, Order, OrderItem, Product};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use uuid::Uuid;

/// The menu the seed migrations install, for the in-memory backend.
pub fn seed_products() -> Vec<Product> {
  let taco = |id: i32, name: &str, description: &str, price_cents: i32, stock: i32, ingredient_ids: Vec<i32>| Product {
    id,
    name: name.to_string(),
    description: Some(description.to_string()),
    price_cents,
    stock,
    category_id: 2,
    image_url: Some("https://via.placeholder.com/150".to_string()),
    ingredient_ids,
  };
  vec![
    taco(1, "Beef Taco", "A delicious beef taco", 250, 100, vec![1, 4]),
    taco(2, "Chicken Taco", "A delicious chicken taco", 199, 101, vec![2, 4]),
    taco(3, "Fish Taco", "A delicious fish taco", 399, 90, vec![3, 4]),
    taco(4, "Pizza Special", "A delicious pizza everyone loves", 800, 50, vec![1, 5, 6]),
  ]
}

pub fn seed_categories() -> Vec<Category> {
  ["Appetizer", "Entree", "Side Dish", "Dessert", "Beverage"]
    .into_iter()
    .zip(1..)
    .map(|(name, id)| Category {
      id,
      name: name.to_string(),
    })
    .collect()
}

pub fn seed_ingredients() -> Vec<Ingredient> {
  ["Beef", "Chicken", "Fish", "Tortilla", "Lettuce", "Tomato"]
    .into_iter()
    .zip(1..)
    .map(|(name, id)| Ingredient {
      id,
      name: name.to_string(),
    })
    .collect()
}

#[derive(Clone, Default)]
pub struct InMemoryCatalog {
  products: Arc<RwLock<BTreeMap<i32, Product>>>,
  categories: Arc<Vec<Category>>,
  ingredients: Arc<Vec<Ingredient>>,
}

impl InMemoryCatalog {
  /// A catalog of `products` over the seeded categories and ingredients.
  pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
    Self {
      products: Arc::new(RwLock::new(products.into_iter().map(|p| (p.id, p)).collect())),
      categories: Arc::new(seed_categories()),
      ingredients: Arc::new(seed_ingredients()),
    }
  }

  pub fn seeded() -> Self {
    Self::new(seed_products())
  }

  /// Current stock of a product, if it exists.
  pub fn stock_of(&self, product_id: i32) -> Option<i32> {
    self.products.read().get(&product_id).map(|p| p.stock)
  }

  /// Changes a product's live price. Only catalog maintenance does this.
  pub fn set_price(&self, product_id: i32, price_cents: i32) -> bool {
    match self.products.write().get_mut(&product_id) {
      Some(product) => {
        product.price_cents = price_cents;
        true
      }
      None => false,
    }
  }

  fn snapshot_of(&self, ids: impl IntoIterator<Item = i32>) -> HashMap<i32, Product> {
    let products = self.products.read();
    ids
      .into_iter()
      .filter_map(|id| products.get(&id).map(|p| (id, p.clone())))
      .collect()
  }
}

#[async_trait]
impl ProductRepository for InMemoryCatalog {
  async fn list_products(&self) -> Result<Vec<Product>> {
    Ok(self.products.read().values().cloned().collect())
  }

  async fn find_product(&self, product_id: i32) -> Result<Option<Product>> {
    Ok(self.products.read().get(&product_id).cloned())
  }

  async fn list_categories(&self) -> Result<Vec<Category>> {
    Ok(self.categories.as_ref().clone())
  }

  async fn list_ingredients(&self) -> Result<Vec<Ingredient>> {
    Ok(self.ingredients.as_ref().clone())
  }

  async fn try_take_stock(&self, product_id: i32, quantity: i32) -> Result<StockTake> {
    let mut products = self.products.write();
    let Some(product) = products.get_mut(&product_id) else {
      return Ok(StockTake::NotFound);
    };
    if product.stock < quantity {
      return Ok(StockTake::Insufficient {
        available: product.stock,
      });
    }
    product.stock -= quantity;
    Ok(StockTake::Taken(product.clone()))
  }
}

#[derive(Default)]
struct OrderTables {
  orders: Vec<Order>,
  next_order_id: i32,
  next_item_id: i32,
}

#[derive(Clone)]
pub struct InMemoryOrders {
  catalog: InMemoryCatalog,
  tables: Arc<RwLock<OrderTables>>,
}

impl InMemoryOrders {
  /// `catalog` resolves product references in the history query.
  pub fn new(catalog: InMemoryCatalog) -> Self {
    Self {
      catalog,
      tables: Arc::new(RwLock::new(OrderTables {
        next_order_id: 1,
        next_item_id: 1,
        ..Default::default()
      })),
    }
  }

  pub fn order_count(&self) -> usize {
    self.tables.read().orders.len()
  }
}

#[async_trait]
impl OrderRepository for InMemoryOrders {
  async fn insert_order(&self, new_order: NewOrder) -> Result<Order> {
    let mut tables = self.tables.write();
    let order_id = tables.next_order_id;
    tables.next_order_id += 1;

    let mut items = Vec::with_capacity(new_order.lines.len());
    for line in &new_order.lines {
      items.push(OrderItem {
        id: tables.next_item_id,
        order_id,
        product_id: line.product_id,
        quantity: line.quantity,
        price_cents: line.price_cents,
        product: None,
      });
      tables.next_item_id += 1;
    }

    let order = Order {
      id: order_id,
      user_id: new_order.user_id,
      created_at: new_order.created_at,
      total_cents: new_order.total_cents,
      items,
    };
    tables.orders.push(order.clone());
    Ok(order)
  }

  async fn list_orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
    let mut orders: Vec<Order> = Vec::new();
    let mut items: Vec<OrderItem> = Vec::new();
    {
      let tables = self.tables.read();
      for stored in tables.orders.iter().filter(|o| o.user_id == user_id) {
        items.extend(stored.items.iter().cloned());
        orders.push(Order {
          items: Vec::new(),
          ..stored.clone()
        });
      }
    }
    orders.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
    items.sort_by_key(|i| i.id);

    let products = self.catalog.snapshot_of(items.iter().map(|i| i.product_id));
    attach_items(&mut orders, items, &products);
    Ok(orders)
  }
}
