//! Error types for `sharer-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Bad input; reported to the caller verbatim and never retried.
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  NotFound(String),

  /// Every candidate collided. `attempts` is kept for logs.
  #[error("Error generating unique slug")]
  ExhaustedRetries { attempts: u32 },

  #[error("operation cancelled")]
  Cancelled,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn validation(msg: impl Into<String>) -> Self {
    Self::Validation(msg.into())
  }

  /// Box a backend error. Used as `.map_err(Error::store)` on every store call.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
