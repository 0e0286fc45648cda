//! Page types: a stored HTML snippet addressed by its slug.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shared HTML page as persisted by a [`PageStore`](crate::store::PageStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
  pub id:           i64,
  /// Public key of the page; fixed at creation and never rewritten.
  pub slug:         String,
  /// Stored and served byte-for-byte.
  pub html_content: String,
  pub title:        String,
  pub category_id:  Option<i64>,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

impl Page {
  /// Path under which the page is served.
  pub fn url(&self) -> String { share_path(&self.slug) }
}

/// The public path for `slug`, e.g. `/shared/aB3dE5fG`.
pub fn share_path(slug: &str) -> String { format!("/shared/{slug}") }

/// A listing row: the page without its content, plus the category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
  pub id:            i64,
  pub slug:          String,
  pub title:         String,
  pub category_id:   Option<i64>,
  /// `None` when the page has no category or the category was deleted.
  pub category_name: Option<String>,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::PageStore::create_page`].
/// Timestamps and the id are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewPage {
  pub slug:         String,
  pub html_content: String,
  pub title:        String,
  pub category_id:  Option<i64>,
}

/// Caller input to [`crate::service::PageService::create_page`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePage {
  pub html_content: String,
  #[serde(default)]
  pub title:        Option<String>,
  #[serde(default)]
  pub category_id:  Option<i64>,
}

/// A partial edit of a page. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageUpdate {
  pub html_content: Option<String>,
  pub title:        Option<String>,
}

impl PageUpdate {
  pub fn is_empty(&self) -> bool {
    self.html_content.is_none() && self.title.is_none()
  }
}
