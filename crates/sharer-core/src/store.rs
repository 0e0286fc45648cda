//! Storage capability traits.
//!
//! The traits are implemented by storage backends (`sharer-store-sqlite`, and
//! [`crate::memory::MemoryStore`] for tests). The services in
//! [`crate::service`] depend on these abstractions, never on a concrete
//! backend.
//!
//! Conventions shared by every method:
//!
//! - Soft-deleted rows are invisible: they are never returned, counted, or
//!   reported as existing.
//! - "Not found" is `Ok(None)` / `Ok(false)`, distinct from `Err`.
//! - Cancellation is expressed by dropping the returned future.
//! - Uniqueness violations are reported through [`StoreError::is_duplicate`].
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use crate::{
  category::{Category, CategoryUpdate, NewCategory},
  page::{NewPage, Page, PageSummary, PageUpdate},
};

/// Error type of a storage backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// `true` when a write was rejected because a live row already holds the
  /// slug or category name.
  fn is_duplicate(&self) -> bool;
}

// ─── Pages ───────────────────────────────────────────────────────────────────

pub trait PageStore: Send + Sync {
  type Error: StoreError;

  /// Persist a new page. Fails if a live page already holds `input.slug`.
  fn create_page(
    &self,
    input: NewPage,
  ) -> impl Future<Output = Result<Page, Self::Error>> + Send + '_;

  fn get_page(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Page>, Self::Error>> + Send + '_;

  fn get_page_by_slug<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<Option<Page>, Self::Error>> + Send + 'a;

  /// A window of page summaries, newest first (ties broken by id, newest
  /// first). `category_id` restricts the window to one category.
  fn list_pages(
    &self,
    offset: u64,
    limit: u32,
    category_id: Option<i64>,
  ) -> impl Future<Output = Result<Vec<PageSummary>, Self::Error>> + Send + '_;

  /// Number of live pages, scoped the same way as [`Self::list_pages`].
  fn count_pages(
    &self,
    category_id: Option<i64>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Apply a partial edit and bump `updated_at`. `None` if no live page has
  /// this id.
  fn update_page(
    &self,
    id: i64,
    update: PageUpdate,
  ) -> impl Future<Output = Result<Option<Page>, Self::Error>> + Send + '_;

  /// Soft-delete. Returns `false` if no live page has this id.
  fn delete_page(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn slug_exists<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}

// ─── Categories ──────────────────────────────────────────────────────────────

pub trait CategoryStore: Send + Sync {
  type Error: StoreError;

  /// Persist a new category. Fails if a live category already has the name.
  fn create_category(
    &self,
    input: NewCategory,
  ) -> impl Future<Output = Result<Category, Self::Error>> + Send + '_;

  fn get_category(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Category>, Self::Error>> + Send + '_;

  fn get_category_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Category>, Self::Error>> + Send + 'a;

  /// A window of categories ordered by name (ties broken by id).
  fn list_categories(
    &self,
    offset: u64,
    limit: u32,
  ) -> impl Future<Output = Result<Vec<Category>, Self::Error>> + Send + '_;

  /// Every live category, ordered by name.
  fn all_categories(
    &self,
  ) -> impl Future<Output = Result<Vec<Category>, Self::Error>> + Send + '_;

  fn count_categories(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  fn update_category(
    &self,
    id: i64,
    update: CategoryUpdate,
  ) -> impl Future<Output = Result<Option<Category>, Self::Error>> + Send + '_;

  /// Soft-delete the category and detach it from every page that references
  /// it (their `category_id` becomes `None`), atomically. Returns `false` if
  /// no live category has this id.
  fn delete_category(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn category_name_exists<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}
