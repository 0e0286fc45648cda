//! JSON REST API for the sharer service.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`PageStore`] and [`CategoryStore`]. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", sharer_api::api_router(ApiState::new(store.clone())))
//! ```

pub mod categories;
pub mod error;
pub mod pages;
pub mod query;
pub mod share;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use sharer_core::{
  service::{CategoryService, PageService},
  store::{CategoryStore, PageStore},
};
use tokio_util::sync::CancellationToken;

pub use error::ApiError;
pub use query::ListQuery;

/// Services shared by every API handler.
pub struct ApiState<S> {
  pub pages:      PageService<S>,
  pub categories: CategoryService<S>,
  /// Cancelled when the server begins shutting down; in-flight page creation
  /// stops at its next slug attempt.
  pub shutdown:   CancellationToken,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      pages:      self.pages.clone(),
      categories: self.categories.clone(),
      shutdown:   self.shutdown.clone(),
    }
  }
}

impl<S: PageStore + CategoryStore> ApiState<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self::from_services(PageService::new(store.clone()), CategoryService::new(store))
  }

  pub fn from_services(pages: PageService<S>, categories: CategoryService<S>) -> Self {
    Self { pages, categories, shutdown: CancellationToken::new() }
  }

  /// Share the server's shutdown token instead of a private one.
  pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
    self.shutdown = shutdown;
    self
  }
}

/// Build a fully-materialised API router.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: PageStore + CategoryStore + 'static,
{
  Router::new()
    .route("/share", post(share::create::<S>))
    // Pages
    .route("/pages", get(pages::list::<S>))
    .route(
      "/pages/{slug}",
      get(pages::get_one::<S>)
        .patch(pages::update::<S>)
        .delete(pages::delete::<S>),
    )
    // Categories
    .route("/categories", get(categories::list::<S>).post(categories::create::<S>))
    .route("/categories/all", get(categories::all::<S>))
    .route("/categories/options", get(categories::options::<S>))
    .route(
      "/categories/{id}",
      get(categories::get_one::<S>)
        .patch(categories::update::<S>)
        .delete(categories::delete::<S>),
    )
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
