//! Error type for `sharer-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A live row already holds this slug or category name.
  #[error("{0} is already in use")]
  Duplicate(String),

  #[error("database schema version {found} is newer than supported version {supported}")]
  SchemaTooNew { found: i64, supported: i64 },
}

impl Error {
  /// Turn a unique-index violation into [`Error::Duplicate`]; pass anything
  /// else through as a database error.
  pub(crate) fn unique(err: tokio_rusqlite::Error, what: impl FnOnce() -> String) -> Self {
    match &err {
      tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
        if e.code == rusqlite::ErrorCode::ConstraintViolation =>
      {
        Self::Duplicate(what())
      }
      _ => Self::Database(err),
    }
  }
}

impl sharer_core::store::StoreError for Error {
  fn is_duplicate(&self) -> bool { matches!(self, Self::Duplicate(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
