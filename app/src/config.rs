// app/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
  Postgres,
  /// Seeded, process-local tables. Nothing survives a restart.
  Memory,
}

impl FromStr for StorageBackend {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
      "memory" | "in-memory" => Ok(StorageBackend::Memory),
      other => Err(AppError::Config(format!("Unknown STORAGE_BACKEND '{}'", other))),
    }
  }
}

/// `Default` holds the same values `from_lookup` falls back to, minus a
/// database URL.
#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub storage: StorageBackend,
  /// Required when `storage` is `Postgres`.
  pub database_url: Option<String>,
  pub database_max_connections: u32,
  pub run_migrations: bool,
  pub session_cookie_name: String,
  pub session_idle_timeout: Duration,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      storage: StorageBackend::Postgres,
      database_url: None,
      database_max_connections: 5,
      run_migrations: false,
      session_cookie_name: "bistro_session".to_string(),
      session_idle_timeout: Duration::from_secs(30 * 60),
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source; `from_env` passes the
  /// process environment.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

    let server_host = get_or("SERVER_HOST", "127.0.0.1");
    let server_port = parse_var::<u16>("SERVER_PORT", &get_or("SERVER_PORT", "8080"))?;
    let storage = get_or("STORAGE_BACKEND", "postgres").parse::<StorageBackend>()?;
    let database_url = lookup("DATABASE_URL");
    if storage == StorageBackend::Postgres && database_url.is_none() {
      return Err(AppError::Config(
        "Missing environment variable 'DATABASE_URL' (required for the postgres backend)".to_string(),
      ));
    }
    let database_max_connections = parse_var::<u32>("DATABASE_MAX_CONNECTIONS", &get_or("DATABASE_MAX_CONNECTIONS", "5"))?;
    let run_migrations = parse_var::<bool>("RUN_MIGRATIONS", &get_or("RUN_MIGRATIONS", "false"))?;
    let session_cookie_name = get_or("SESSION_COOKIE_NAME", "bistro_session");
    if session_cookie_name.trim().is_empty() {
      return Err(AppError::Config("SESSION_COOKIE_NAME must not be empty".to_string()));
    }
    let idle_secs = parse_var::<u64>("SESSION_IDLE_TIMEOUT_SECS", &get_or("SESSION_IDLE_TIMEOUT_SECS", "1800"))?;

    tracing::info!(
      storage = ?storage,
      server_port,
      run_migrations,
      "Application configuration loaded."
    );

    Ok(Self {
      server_host,
      server_port,
      storage,
      database_url,
      database_max_connections,
      run_migrations,
      session_cookie_name,
      session_idle_timeout: Duration::from_secs(idle_secs),
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  raw
    .trim()
    .parse::<T>()
    .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", name, raw, e)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |name| map.get(name).cloned()
  }

  #[test]
  fn defaults_apply_for_memory_backend() {
    let cfg = AppConfig::from_lookup(lookup_from(&[("STORAGE_BACKEND", "memory")])).unwrap();
    assert_eq!(cfg.storage, StorageBackend::Memory);
    assert_eq!(cfg.bind_address(), "127.0.0.1:8080");
    assert_eq!(cfg.session_cookie_name, "bistro_session");
    assert_eq!(cfg.session_idle_timeout, Duration::from_secs(1800));
    assert!(!cfg.run_migrations);
  }

  #[test]
  fn postgres_backend_requires_database_url() {
    let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
    assert!(matches!(err, AppError::Config(m) if m.contains("DATABASE_URL")));

    let cfg = AppConfig::from_lookup(lookup_from(&[
      ("DATABASE_URL", "postgres://localhost/bistro"),
      ("RUN_MIGRATIONS", "true"),
      ("SERVER_PORT", "9000"),
    ]))
    .unwrap();
    assert_eq!(cfg.storage, StorageBackend::Postgres);
    assert!(cfg.run_migrations);
    assert_eq!(cfg.server_port, 9000);
  }

  #[test]
  fn default_matches_an_empty_environment() {
    let from_vars = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/bistro")])).unwrap();
    let default = AppConfig::default();
    assert_eq!(default.storage, from_vars.storage);
    assert_eq!(default.bind_address(), from_vars.bind_address());
    assert_eq!(default.database_max_connections, from_vars.database_max_connections);
    assert_eq!(default.run_migrations, from_vars.run_migrations);
    assert_eq!(default.session_cookie_name, from_vars.session_cookie_name);
    assert_eq!(default.session_idle_timeout, from_vars.session_idle_timeout);
    assert_eq!(default.database_url, None);
  }

  #[test]
  fn invalid_values_are_config_errors() {
    let err = AppConfig::from_lookup(lookup_from(&[("STORAGE_BACKEND", "memory"), ("SERVER_PORT", "eighty")])).unwrap_err();
    assert!(matches!(err, AppError::Config(m) if m.contains("SERVER_PORT")));

    let err = AppConfig::from_lookup(lookup_from(&[("STORAGE_BACKEND", "redis")])).unwrap_err();
    assert!(matches!(err, AppError::Config(m) if m.contains("redis")));
  }
}
