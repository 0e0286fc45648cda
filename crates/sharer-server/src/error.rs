//! Error types and axum `IntoResponse` implementation for the HTML surface.
//!
//! Form and page handlers answer in plain text; a missing resource renders
//! the 404 page. Category endpoints use [`sharer_api::ApiError`] instead so
//! their failures are JSON.

use axum::{
  extract::multipart::MultipartError,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::views;

#[derive(Debug, Error)]
pub enum Error {
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("not found")]
  NotFound,
  #[error("unavailable: {0}")]
  Unavailable(String),
  #[error("internal error: {0}")]
  Internal(String),
  #[error("upload error: {0}")]
  Upload(#[from] MultipartError),
  /// A backend failure. `message` is what the client sees.
  #[error("{message}: {source}")]
  Store {
    message: &'static str,
    #[source]
    source:  Box<dyn std::error::Error + Send + Sync>,
  },
}

impl Error {
  /// Word a storage failure for the operation that hit it.
  pub fn on_store_failure(self, message: &'static str) -> Self {
    match self {
      Error::Store { source, .. } => Error::Store { message, source },
      other => other,
    }
  }
}

impl From<sharer_core::Error> for Error {
  fn from(err: sharer_core::Error) -> Self {
    use sharer_core::Error as E;
    match err {
      E::Validation(m) => Error::BadRequest(m),
      E::NotFound(_) => Error::NotFound,
      e @ E::ExhaustedRetries { .. } => Error::Internal(e.to_string()),
      e @ E::Cancelled => Error::Unavailable(e.to_string()),
      E::Store(source) => Error::Store { message: "Internal server error", source },
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
      Error::NotFound => {
        (StatusCode::NOT_FOUND, views::render(views::not_found())).into_response()
      }
      Error::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg).into_response(),
      Error::Internal(msg) => {
        tracing::error!(error = %msg, "internal server error");
        (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response()
      }
      Error::Upload(err) => (err.status(), err.body_text()).into_response(),
      Error::Store { message, source } => {
        tracing::error!(error = %source, context = message, "storage failure");
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
      }
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
