pub mod cards;
pub mod events;
pub mod schema;
pub mod stats;

use rusqlite::{Connection, Result};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

// Re-export all public items from submodules
pub use cards::*;
pub use events::*;
pub use schema::run_migrations;
pub use stats::*;

pub type DbPool = Arc<Mutex<Connection>>;

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
  /// Log the error at warn level and return None
  fn log_warn(self, context: &str) -> Option<T>;
  /// Log the error at warn level and return the default
  fn log_warn_default(self, context: &str) -> T
  where
    T: Default;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
  fn log_warn(self, context: &str) -> Option<T> {
    match self {
      Ok(v) => Some(v),
      Err(e) => {
        tracing::warn!("{}: {}", context, e);
        None
      }
    }
  }

  fn log_warn_default(self, context: &str) -> T
  where
    T: Default,
  {
    match self {
      Ok(v) => v,
      Err(e) => {
        tracing::warn!("{}: {}", context, e);
        T::default()
      }
    }
  }
}

/// Error returned when database lock cannot be acquired
#[derive(Debug)]
pub struct DbLockError;

impl std::fmt::Display for DbLockError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Database unavailable")
  }
}

impl std::error::Error for DbLockError {}

/// Try to acquire the database lock, returning an error if poisoned
pub fn try_lock(pool: &DbPool) -> std::result::Result<MutexGuard<'_, Connection>, DbLockError> {
  pool.lock().map_err(|_: PoisonError<_>| {
    tracing::error!("Database mutex poisoned - a thread panicked while holding the lock");
    DbLockError
  })
}

pub fn init_db(path: &Path) -> Result<DbPool> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).log_warn("Could not create database directory");
  }

  // Create backup before migrations if database exists
  if path.exists() {
    std::fs::copy(path, path.with_extension("db.backup")).log_warn("Could not create database backup");
  }

  let conn = Connection::open(path)?;
  run_migrations(&conn)?;
  Ok(Arc::new(Mutex::new(conn)))
}

/// Open a fresh in-memory database, mostly for tests
pub fn init_db_in_memory() -> Result<DbPool> {
  let conn = Connection::open_in_memory()?;
  run_migrations(&conn)?;
  Ok(Arc::new(Mutex::new(conn)))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_init_db_creates_file_and_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studymate.db");

    let pool = init_db(&path).unwrap();
    assert!(path.exists());

    let conn = try_lock(&pool).unwrap();
    let count: i64 = conn
      .query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('events', 'flashcards', 'study_totals')",
        [],
        |row| row.get(0),
      )
      .unwrap();
    assert_eq!(count, 3);
  }

  #[test]
  fn test_init_db_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studymate.db");

    drop(init_db(&path).unwrap());
    // Second open runs migrations again over the existing file
    let pool = init_db(&path).unwrap();
    assert!(try_lock(&pool).is_ok());
  }
}
