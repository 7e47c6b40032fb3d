// app/src/session/cart_store.rs

use crate::errors::Result;
use crate::models::Cart;
use crate::session::{SessionId, SessionStore, CART_KEY, FLASH_ERROR_KEY};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type SessionLocks = Arc<Mutex<HashMap<SessionId, Arc<AsyncMutex<()>>>>>;

/// The cart state holder: reads and writes a session's cart as JSON under
/// `CART_KEY`, plus the flash message that goes with the cart page.
#[derive(Clone)]
pub struct CartStore {
  sessions: Arc<dyn SessionStore>,
  locks: SessionLocks,
}

/// Exclusive hold on one session's cart. Released on drop.
pub struct CartLock {
  session: SessionId,
  guard: Option<OwnedMutexGuard<()>>,
  locks: SessionLocks,
}

impl Drop for CartLock {
  fn drop(&mut self) {
    drop(self.guard.take());
    let mut locks = self.locks.lock();
    // Only the map still points at an idle lock.
    if locks.get(&self.session).is_some_and(|lock| Arc::strong_count(lock) == 1) {
      locks.remove(&self.session);
    }
  }
}

impl CartStore {
  pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
    Self {
      sessions,
      locks: Arc::new(Mutex::new(HashMap::new())),
    }
  }

  /// Waits until no other request is working on this session's cart.
  /// Hold the returned lock across every load-modify-save of the cart.
  pub async fn lock(&self, session: SessionId) -> CartLock {
    let lock = self.locks.lock().entry(session).or_default().clone();
    let guard = lock.lock_owned().await;
    CartLock {
      session,
      guard: Some(guard),
      locks: self.locks.clone(),
    }
  }

  pub fn held_locks(&self) -> usize {
    self.locks.lock().len()
  }

  /// The session's cart, if one has been saved.
  pub async fn load(&self, session: SessionId) -> Result<Option<Cart>> {
    match self.sessions.get(session, CART_KEY).await? {
      Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
      None => Ok(None),
    }
  }

  /// The session's cart, or a new empty one. Nothing is written.
  pub async fn get_or_create(&self, session: SessionId) -> Result<Cart> {
    Ok(self.load(session).await?.unwrap_or_default())
  }

  pub async fn save(&self, session: SessionId, cart: &Cart) -> Result<()> {
    let raw = serde_json::to_string(cart)?;
    self.sessions.set(session, CART_KEY, raw).await
  }

  pub async fn clear(&self, session: SessionId) -> Result<()> {
    self.sessions.remove(session, CART_KEY).await
  }

  pub async fn set_flash_error(&self, session: SessionId, message: &str) -> Result<()> {
    self.sessions.set(session, FLASH_ERROR_KEY, message.to_string()).await
  }

  /// Returns and forgets the pending flash message.
  pub async fn take_flash_error(&self, session: SessionId) -> Result<Option<String>> {
    let message = self.sessions.get(session, FLASH_ERROR_KEY).await?;
    if message.is_some() {
      self.sessions.remove(session, FLASH_ERROR_KEY).await?;
    }
    Ok(message)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::memory::seed_products;
  use crate::session::InMemorySessionStore;
  use std::time::Duration;

  fn store() -> CartStore {
    CartStore::new(Arc::new(InMemorySessionStore::new(Duration::from_secs(60))))
  }

  #[tokio::test]
  async fn get_or_create_does_not_persist_empty_cart() {
    let carts = store();
    let session = SessionId::generate();
    assert!(carts.get_or_create(session).await.unwrap().is_empty());
    assert_eq!(carts.load(session).await.unwrap(), None);
  }

  #[tokio::test]
  async fn save_load_and_clear() {
    let carts = store();
    let session = SessionId::generate();
    let mut cart = Cart::default();
    cart.add_line(&seed_products()[3], 2);

    carts.save(session, &cart).await.unwrap();
    assert_eq!(carts.load(session).await.unwrap(), Some(cart));

    carts.clear(session).await.unwrap();
    assert_eq!(carts.load(session).await.unwrap(), None);
  }

  #[tokio::test]
  async fn lock_is_exclusive_per_session_and_forgotten_when_released() {
    let carts = store();
    let session = SessionId::generate();
    let other = SessionId::generate();

    let held = carts.lock(session).await;
    // Another session is never blocked.
    let other_lock = carts.lock(other).await;

    let contender = {
      let carts = carts.clone();
      tokio::spawn(async move {
        let _lock = carts.lock(session).await;
      })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!contender.is_finished());

    drop(held);
    contender.await.unwrap();
    drop(other_lock);
    assert_eq!(carts.held_locks(), 0);
  }

  #[tokio::test]
  async fn flash_error_is_read_once() {
    let carts = store();
    let session = SessionId::generate();
    carts.set_flash_error(session, "Insufficient stock available.").await.unwrap();
    assert_eq!(
      carts.take_flash_error(session).await.unwrap().as_deref(),
      Some("Insufficient stock available.")
    );
    assert_eq!(carts.take_flash_error(session).await.unwrap(), None);
  }
}
