// app/src/state.rs

use crate::config::{AppConfig, StorageBackend};
use crate::db::memory::{InMemoryCatalog, InMemoryOrders};
use crate::db::postgres::{self, PgOrderRepository, PgProductRepository};
use crate::db::{OrderRepository, ProductRepository};
use crate::errors::{AppError, Result};
use crate::pipelines;
use crate::session::{CartStore, InMemorySessionStore, SessionStore};
use bistro_flow::Registry;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
  pub products: Arc<dyn ProductRepository>,
  pub orders: Arc<dyn OrderRepository>,
  pub carts: CartStore,
  pub flows: Arc<Registry<AppError>>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Wires the given collaborators together and registers every pipeline.
  pub fn new(
    config: Arc<AppConfig>,
    products: Arc<dyn ProductRepository>,
    orders: Arc<dyn OrderRepository>,
    sessions: Arc<dyn SessionStore>,
  ) -> Self {
    let flows = Arc::new(Registry::<AppError>::new());
    pipelines::register_all_pipelines(&flows);

    Self {
      products,
      orders,
      carts: CartStore::new(sessions),
      flows,
      config,
    }
  }

  /// State over the seeded in-process catalog. Returns the catalog handle
  /// too, so callers can inspect stock.
  pub fn in_memory(config: Arc<AppConfig>) -> (Self, InMemoryCatalog) {
    let catalog = InMemoryCatalog::seeded();
    let orders = InMemoryOrders::new(catalog.clone());
    let sessions = InMemorySessionStore::new(config.session_idle_timeout);
    let state = Self::new(config, Arc::new(catalog.clone()), Arc::new(orders), Arc::new(sessions));
    (state, catalog)
  }

  /// State for the configured storage backend. Connects to Postgres and
  /// applies migrations when asked to.
  pub async fn from_config(config: Arc<AppConfig>) -> Result<Self> {
    match config.storage {
      StorageBackend::Memory => {
        info!("Using the in-memory storage backend.");
        Ok(Self::in_memory(config).0)
      }
      StorageBackend::Postgres => {
        let pool = postgres::connect(&config).await?;
        if config.run_migrations {
          postgres::run_migrations(&pool).await?;
        }
        let sessions = InMemorySessionStore::new(config.session_idle_timeout);
        Ok(Self::new(
          config,
          Arc::new(PgProductRepository::new(pool.clone())),
          Arc::new(PgOrderRepository::new(pool)),
          Arc::new(sessions),
        ))
      }
    }
  }
}
