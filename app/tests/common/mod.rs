// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use bistro::db::memory::{InMemoryCatalog, InMemoryOrders};
use bistro::session::{InMemorySessionStore, SessionId, SessionStore};
use bistro::{AppConfig, AppState};
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use uuid::Uuid;

pub const PIZZA_ID: i32 = 4;
pub const BEEF_TACO_ID: i32 = 1;

/// Application state over the seeded in-memory backend, with handles on
/// the tables so tests can look behind the repositories.
pub struct TestBackend {
  pub state: AppState,
  pub catalog: InMemoryCatalog,
  pub orders: InMemoryOrders,
  pub sessions: InMemorySessionStore,
}

/// Session store that answers reads after a delay, like a store across
/// the network.
pub struct LaggySessions {
  inner: InMemorySessionStore,
  lag: Duration,
}

#[async_trait]
impl SessionStore for LaggySessions {
  async fn get(&self, session: SessionId, key: &str) -> bistro::Result<Option<String>> {
    tokio::time::sleep(self.lag).await;
    self.inner.get(session, key).await
  }

  async fn set(&self, session: SessionId, key: &str, value: String) -> bistro::Result<()> {
    self.inner.set(session, key, value).await
  }

  async fn remove(&self, session: SessionId, key: &str) -> bistro::Result<()> {
    self.inner.remove(session, key).await
  }
}

pub fn test_backend() -> TestBackend {
  backend_with_lag(Duration::ZERO)
}

/// Like `test_backend`, but every session read is delayed by `lag`.
pub fn backend_with_lag(lag: Duration) -> TestBackend {
  Lazy::force(&TRACING);
  let config = Arc::new(AppConfig::default());
  let catalog = InMemoryCatalog::seeded();
  let orders = InMemoryOrders::new(catalog.clone());
  let sessions = InMemorySessionStore::new(config.session_idle_timeout);
  let store: Arc<dyn SessionStore> = if lag.is_zero() {
    Arc::new(sessions.clone())
  } else {
    Arc::new(LaggySessions {
      inner: sessions.clone(),
      lag,
    })
  };
  let state = AppState::new(config, Arc::new(catalog.clone()), Arc::new(orders.clone()), store);
  TestBackend {
    state,
    catalog,
    orders,
    sessions,
  }
}

pub fn new_user() -> Uuid {
  Uuid::new_v4()
}

static TRACING: Lazy<()> = Lazy::new(|| {
  let _ = tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init();
});
