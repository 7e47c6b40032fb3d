// app/src/session/memory.rs

use crate::errors::Result;
use crate::session::{SessionId, SessionStore};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

struct SessionEntry {
  values: HashMap<String, String>,
  last_seen: Instant,
}

impl SessionEntry {
  fn is_idle(&self, now: Instant, idle_timeout: Duration) -> bool {
    now.saturating_duration_since(self.last_seen) >= idle_timeout
  }
}

/// Session values held in process memory.
///
/// A session untouched for `idle_timeout` is gone: reads treat it as absent
/// and it is dropped the next time the store is written.
#[derive(Clone)]
pub struct InMemorySessionStore {
  sessions: Arc<RwLock<HashMap<SessionId, SessionEntry>>>,
  idle_timeout: Duration,
}

impl InMemorySessionStore {
  pub fn new(idle_timeout: Duration) -> Self {
    Self {
      sessions: Arc::new(RwLock::new(HashMap::new())),
      idle_timeout,
    }
  }

  pub fn active_sessions(&self) -> usize {
    let now = Instant::now();
    self
      .sessions
      .read()
      .values()
      .filter(|entry| !entry.is_idle(now, self.idle_timeout))
      .count()
  }

  fn purge_idle(sessions: &mut HashMap<SessionId, SessionEntry>, now: Instant, idle_timeout: Duration) {
    let before = sessions.len();
    sessions.retain(|_, entry| !entry.is_idle(now, idle_timeout));
    let purged = before - sessions.len();
    if purged > 0 {
      debug!(purged, "Dropped idle sessions.");
    }
  }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
  async fn get(&self, session: SessionId, key: &str) -> Result<Option<String>> {
    let now = Instant::now();
    let mut sessions = self.sessions.write();
    let Some(entry) = sessions.get_mut(&session) else {
      return Ok(None);
    };
    if entry.is_idle(now, self.idle_timeout) {
      sessions.remove(&session);
      return Ok(None);
    }
    entry.last_seen = now;
    Ok(entry.values.get(key).cloned())
  }

  async fn set(&self, session: SessionId, key: &str, value: String) -> Result<()> {
    let now = Instant::now();
    let mut sessions = self.sessions.write();
    Self::purge_idle(&mut sessions, now, self.idle_timeout);
    let entry = sessions.entry(session).or_insert_with(|| SessionEntry {
      values: HashMap::new(),
      last_seen: now,
    });
    entry.last_seen = now;
    entry.values.insert(key.to_string(), value);
    Ok(())
  }

  async fn remove(&self, session: SessionId, key: &str) -> Result<()> {
    let mut sessions = self.sessions.write();
    if let Some(entry) = sessions.get_mut(&session) {
      entry.values.remove(key);
      entry.last_seen = Instant::now();
    }
    Ok(())
  }
}
