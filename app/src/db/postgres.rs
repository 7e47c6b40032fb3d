// app/src/db/postgres.rs

use crate::config::AppConfig;
use crate::db::{attach_items, OrderRepository, ProductRepository, StockTake};
use crate::errors::{AppError, Result};
use crate::models::{Category, Ingredient, NewOrder, Order, OrderItem, Product};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{error, info, instrument};
use uuid::Uuid;

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.description, p.price_cents, p.stock, p.category_id, p.image_url, \
   ARRAY(SELECT pi.ingredient_id FROM product_ingredients pi WHERE pi.product_id = p.id ORDER BY pi.ingredient_id) AS ingredient_ids";

pub async fn connect(config: &AppConfig) -> Result<PgPool> {
  let database_url = config
    .database_url
    .as_deref()
    .ok_or_else(|| AppError::Config("DATABASE_URL is not set".to_string()))?;

  let pool = PgPoolOptions::new()
    .max_connections(config.database_max_connections)
    .connect(database_url)
    .await
    .map_err(|e| {
      error!(error = %e, "Failed to connect to the database.");
      AppError::Sqlx(e)
    })?;
  info!("Successfully connected to the database.");
  Ok(pool)
}

/// Applies `app/migrations` (schema and seed menu).
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
  sqlx::migrate!("./migrations").run(pool).await?;
  info!("Database migrations applied.");
  Ok(())
}

#[derive(Clone)]
pub struct PgProductRepository {
  pool: PgPool,
}

impl PgProductRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
  #[instrument(name = "db::list_products", skip(self), err)]
  async fn list_products(&self) -> Result<Vec<Product>> {
    let sql = format!("SELECT {} FROM products p ORDER BY p.id ASC", PRODUCT_COLUMNS);
    let products = sqlx::query_as::<_, Product>(&sql).fetch_all(&self.pool).await?;
    Ok(products)
  }

  #[instrument(name = "db::find_product", skip(self), err)]
  async fn find_product(&self, product_id: i32) -> Result<Option<Product>> {
    let sql = format!("SELECT {} FROM products p WHERE p.id = $1", PRODUCT_COLUMNS);
    let product = sqlx::query_as::<_, Product>(&sql)
      .bind(product_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(product)
  }

  #[instrument(name = "db::list_categories", skip(self), err)]
  async fn list_categories(&self) -> Result<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id ASC")
      .fetch_all(&self.pool)
      .await?;
    Ok(categories)
  }

  #[instrument(name = "db::list_ingredients", skip(self), err)]
  async fn list_ingredients(&self) -> Result<Vec<Ingredient>> {
    let ingredients = sqlx::query_as::<_, Ingredient>("SELECT id, name FROM ingredients ORDER BY id ASC")
      .fetch_all(&self.pool)
      .await?;
    Ok(ingredients)
  }

  #[instrument(name = "db::try_take_stock", skip(self), err)]
  async fn try_take_stock(&self, product_id: i32, quantity: i32) -> Result<StockTake> {
    // The WHERE clause is the stock check; Postgres row locking makes the
    // check-and-decrement a single step.
    let sql = format!(
      "UPDATE products p SET stock = p.stock - $2 WHERE p.id = $1 AND p.stock >= $2 RETURNING {}",
      PRODUCT_COLUMNS
    );
    let updated = sqlx::query_as::<_, Product>(&sql)
      .bind(product_id)
      .bind(quantity)
      .fetch_optional(&self.pool)
      .await?;

    if let Some(product) = updated {
      return Ok(StockTake::Taken(product));
    }

    let available: Option<i32> = sqlx::query_scalar("SELECT stock FROM products WHERE id = $1")
      .bind(product_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(match available {
      Some(available) => StockTake::Insufficient { available },
      None => StockTake::NotFound,
    })
  }
}

#[derive(Clone)]
pub struct PgOrderRepository {
  pool: PgPool,
}

impl PgOrderRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
  #[instrument(name = "db::insert_order", skip(self, new_order), fields(user_id = %new_order.user_id, lines = new_order.lines.len()), err)]
  async fn insert_order(&self, new_order: NewOrder) -> Result<Order> {
    let mut tx = self.pool.begin().await?;

    let mut order = sqlx::query_as::<_, Order>(
      "INSERT INTO orders (user_id, created_at, total_cents) VALUES ($1, $2, $3) \
       RETURNING id, user_id, created_at, total_cents",
    )
    .bind(new_order.user_id)
    .bind(new_order.created_at)
    .bind(new_order.total_cents)
    .fetch_one(&mut *tx)
    .await?;

    for line in &new_order.lines {
      let item = sqlx::query_as::<_, OrderItem>(
        "INSERT INTO order_items (order_id, product_id, quantity, price_cents) VALUES ($1, $2, $3, $4) \
         RETURNING id, order_id, product_id, quantity, price_cents",
      )
      .bind(order.id)
      .bind(line.product_id)
      .bind(line.quantity)
      .bind(line.price_cents)
      .fetch_one(&mut *tx)
      .await?;
      order.items.push(item);
    }

    tx.commit().await?;
    info!(order_id = order.id, "Order persisted.");
    Ok(order)
  }

  #[instrument(name = "db::list_orders_for_user", skip(self), err)]
  async fn list_orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
    let mut orders = sqlx::query_as::<_, Order>(
      "SELECT id, user_id, created_at, total_cents FROM orders WHERE user_id = $1 ORDER BY created_at ASC, id ASC",
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;
    if orders.is_empty() {
      return Ok(orders);
    }

    let items = sqlx::query_as::<_, OrderItem>(
      "SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, oi.price_cents \
       FROM order_items oi JOIN orders o ON o.id = oi.order_id \
       WHERE o.user_id = $1 ORDER BY oi.id ASC",
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;

    let mut product_ids: Vec<i32> = items.iter().map(|i| i.product_id).collect();
    product_ids.sort_unstable();
    product_ids.dedup();
    let sql = format!("SELECT {} FROM products p WHERE p.id = ANY($1)", PRODUCT_COLUMNS);
    let products: HashMap<i32, Product> = sqlx::query_as::<_, Product>(&sql)
      .bind(product_ids)
      .fetch_all(&self.pool)
      .await?
      .into_iter()
      .map(|p| (p.id, p))
      .collect();

    attach_items(&mut orders, items, &products);
    Ok(orders)
  }
}
