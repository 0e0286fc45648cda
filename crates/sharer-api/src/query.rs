//! Listing query parameters shared by the JSON and HTML surfaces.
//!
//! `page` and `page_size` are parsed leniently: anything that is not an
//! integer falls back to the default. `category` is strict.

use serde::Deserialize;
use sharer_core::{Error, Result, pagination::PageRequest};

pub const INVALID_CATEGORY_ID: &str = "Invalid category ID";

/// `?page=&page_size=&category=`
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListQuery {
  pub page:      Option<String>,
  pub page_size: Option<String>,
  pub category:  Option<String>,
}

impl ListQuery {
  pub fn page_request(&self) -> PageRequest {
    PageRequest::from_query(lenient(&self.page), lenient(&self.page_size))
  }

  /// The category filter. An empty value means "no filter".
  pub fn category_id(&self) -> Result<Option<i64>> {
    parse_category_id(self.category.as_deref())
  }
}

fn lenient(raw: &Option<String>) -> Option<i64> {
  raw.as_deref().and_then(|s| s.trim().parse().ok())
}

/// Parse an optional category id from a query string or form field. Blank
/// means none; anything else must be an integer.
pub fn parse_category_id(raw: Option<&str>) -> Result<Option<i64>> {
  match raw.map(str::trim) {
    None | Some("") => Ok(None),
    Some(s) => s
      .parse()
      .map(Some)
      .map_err(|_| Error::validation(INVALID_CATEGORY_ID)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn query(page: &str, size: &str, category: &str) -> ListQuery {
    let opt = |s: &str| (!s.is_empty()).then(|| s.to_owned());
    ListQuery { page: opt(page), page_size: opt(size), category: opt(category) }
  }

  #[test]
  fn junk_paging_values_fall_back_to_defaults() {
    let req = query("abc", "-", "").page_request();
    assert_eq!((req.page(), req.page_size()), (1, 20));

    let req = query("3", "5", "").page_request();
    assert_eq!((req.page(), req.page_size()), (3, 5));
  }

  #[test]
  fn category_must_be_numeric_when_present() {
    assert_eq!(query("", "", "").category_id().unwrap(), None);
    assert_eq!(query("", "", "7").category_id().unwrap(), Some(7));
    assert!(matches!(
      query("", "", "seven").category_id(),
      Err(Error::Validation(ref m)) if m == INVALID_CATEGORY_ID
    ));
  }
}
