//! Category types and the dropdown fragment used by the submission form.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named group of shared pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub id:          i64,
  /// Trimmed; unique among live categories (exact, case-sensitive match).
  pub name:        String,
  pub description: String,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

/// Input to [`crate::store::CategoryStore::create_category`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCategory {
  pub name:        String,
  #[serde(default)]
  pub description: String,
}

/// A partial edit of a category. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdate {
  pub name:        Option<String>,
  pub description: Option<String>,
}

impl CategoryUpdate {
  pub fn is_empty(&self) -> bool {
    self.name.is_none() && self.description.is_none()
  }
}

/// Placeholder entry that heads every dropdown.
pub const DROPDOWN_PLACEHOLDER: &str = "Select a category...";

/// Render `<option>` elements for a category `<select>`.
///
/// Names are emitted as stored, without escaping.
pub fn render_options(categories: &[Category]) -> String {
  let mut html = format!(r#"<option value="">{DROPDOWN_PLACEHOLDER}</option>"#);
  for category in categories {
    let _ = write!(
      html,
      r#"<option value="{}">{}</option>"#,
      category.id, category.name
    );
  }
  html
}
