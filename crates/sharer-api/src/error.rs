//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler. Rendered as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The request was abandoned before it finished.
  #[error("unavailable: {0}")]
  Unavailable(String),

  #[error("internal error: {0}")]
  Internal(String),

  /// A backend failure. `message` is what the client sees; `source` is only
  /// logged.
  #[error("{message}: {source}")]
  Store {
    message: &'static str,
    #[source]
    source:  Box<dyn std::error::Error + Send + Sync>,
  },
}

/// Client text for a storage failure with no more specific wording.
pub const STORE_FAILURE: &str = "Internal server error";

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
      ApiError::Internal(_) | ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  /// The text shown to the client. Storage failures are logged and replaced
  /// with a generic message.
  pub fn client_message(&self) -> String {
    match self {
      ApiError::NotFound(m)
      | ApiError::BadRequest(m)
      | ApiError::Unavailable(m)
      | ApiError::Internal(m) => m.clone(),
      ApiError::Store { message, .. } => (*message).to_owned(),
    }
  }

  /// Word a storage failure for the operation that hit it. Other errors pass
  /// through unchanged.
  pub fn on_store_failure(self, message: &'static str) -> Self {
    match self {
      ApiError::Store { source, .. } => ApiError::Store { message, source },
      other => other,
    }
  }

  /// Emit the server-side log line for 5xx errors.
  pub fn log(&self) {
    match self {
      ApiError::Store { message, source } => {
        tracing::error!(error = %source, context = *message, "storage failure")
      }
      ApiError::Internal(msg) => tracing::error!(error = %msg, "internal server error"),
      _ => {}
    }
  }
}

impl From<sharer_core::Error> for ApiError {
  fn from(err: sharer_core::Error) -> Self {
    use sharer_core::Error as E;
    match err {
      E::Validation(m) => ApiError::BadRequest(m),
      E::NotFound(m) => ApiError::NotFound(m),
      e @ E::ExhaustedRetries { .. } => ApiError::Internal(e.to_string()),
      e @ E::Cancelled => ApiError::Unavailable(e.to_string()),
      E::Store(source) => ApiError::Store { message: STORE_FAILURE, source },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    self.log();
    (self.status(), Json(json!({ "error": self.client_message() }))).into_response()
  }
}
