//! Offset/limit windows and derived paging metadata.

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A normalised `(page, page_size)` request.
///
/// `page` is 1-based. Out-of-range inputs are normalised rather than
/// rejected: `page < 1` becomes 1, and a `page_size` below 1 or above
/// [`MAX_PAGE_SIZE`] becomes [`DEFAULT_PAGE_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  page:      u32,
  page_size: u32,
}

impl PageRequest {
  pub fn new(page: i64, page_size: i64) -> Self {
    let page = u32::try_from(page.max(1)).unwrap_or(u32::MAX);
    let page_size = match u32::try_from(page_size) {
      Ok(size) if (1..=MAX_PAGE_SIZE).contains(&size) => size,
      _ => DEFAULT_PAGE_SIZE,
    };
    Self { page, page_size }
  }

  /// Build from optional query inputs; missing values take the defaults.
  pub fn from_query(page: Option<i64>, page_size: Option<i64>) -> Self {
    Self::new(page.unwrap_or(1), page_size.unwrap_or(DEFAULT_PAGE_SIZE.into()))
  }

  pub fn page(&self) -> u32 { self.page }

  pub fn page_size(&self) -> u32 { self.page_size }

  pub fn offset(&self) -> u64 {
    u64::from(self.page - 1) * u64::from(self.page_size)
  }

  pub fn limit(&self) -> u32 { self.page_size }
}

impl Default for PageRequest {
  fn default() -> Self { Self::new(1, DEFAULT_PAGE_SIZE.into()) }
}

/// One window of a larger ordered collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginated<T> {
  pub items:       Vec<T>,
  pub page:        u32,
  pub page_size:   u32,
  pub total:       u64,
  pub total_pages: u64,
  pub has_next:    bool,
  pub has_prev:    bool,
}

impl<T> Paginated<T> {
  /// Assemble the window. `items` is truncated to the page size so a
  /// misbehaving backend cannot overfill it.
  pub fn new(mut items: Vec<T>, request: PageRequest, total: u64) -> Self {
    items.truncate(request.page_size as usize);
    let total_pages = total.div_ceil(u64::from(request.page_size));
    Self {
      items,
      page: request.page,
      page_size: request.page_size,
      total,
      total_pages,
      has_next: u64::from(request.page) < total_pages,
      has_prev: request.page > 1,
    }
  }
}
