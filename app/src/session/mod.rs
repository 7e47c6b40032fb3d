// app/src/session/mod.rs

//! Per-session keyed storage and the cart kept in it.
//!
//! The store is an external collaborator: anything that can get, set and
//! remove a string value under `(session id, key)` will do. The in-memory
//! store is the one the server ships with.

pub mod cart_store;
pub mod memory;

pub use cart_store::CartStore;
pub use memory::InMemorySessionStore;

use crate::errors::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Key of the serialized cart inside a session.
pub const CART_KEY: &str = "cart";
/// Key of the one-shot error message shown on the next cart-building view.
pub const FLASH_ERROR_KEY: &str = "flash_error";

/// Opaque session identifier carried by the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
  pub fn generate() -> Self {
    SessionId(Uuid::new_v4())
  }

  pub fn parse(raw: &str) -> Option<Self> {
    Uuid::parse_str(raw.trim()).ok().map(SessionId)
  }
}

impl fmt::Display for SessionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&self.0, f)
  }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
  async fn get(&self, session: SessionId, key: &str) -> Result<Option<String>>;

  async fn set(&self, session: SessionId, key: &str, value: String) -> Result<()>;

  async fn remove(&self, session: SessionId, key: &str) -> Result<()>;
}
