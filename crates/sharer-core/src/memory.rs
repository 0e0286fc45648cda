//! In-memory backend implementing both storage traits.
//!
//! Used by the service tests and anywhere a throwaway store is handy. It
//! enforces the same live-row uniqueness rules as the SQLite backend, so a
//! duplicate slug or category name is an error here too.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
  category::{Category, CategoryUpdate, NewCategory},
  page::{NewPage, Page, PageSummary, PageUpdate},
  store::{CategoryStore, PageStore, StoreError},
};

#[derive(Debug, Error)]
pub enum MemoryError {
  #[error("slug {0:?} is already in use")]
  DuplicateSlug(String),

  #[error("category name {0:?} is already in use")]
  DuplicateName(String),
}

impl StoreError for MemoryError {
  fn is_duplicate(&self) -> bool {
    matches!(self, Self::DuplicateSlug(_) | Self::DuplicateName(_))
  }
}

struct Row<T> {
  value:      T,
  deleted_at: Option<DateTime<Utc>>,
}

impl<T> Row<T> {
  fn live(value: T) -> Self { Self { value, deleted_at: None } }

  fn is_live(&self) -> bool { self.deleted_at.is_none() }
}

#[derive(Default)]
struct Inner {
  pages:      Vec<Row<Page>>,
  categories: Vec<Row<Category>>,
  next_page:  i64,
  next_cat:   i64,
}

impl Inner {
  fn live_pages(&self) -> impl Iterator<Item = &Page> {
    self.pages.iter().filter(|r| r.is_live()).map(|r| &r.value)
  }

  fn live_categories(&self) -> impl Iterator<Item = &Category> {
    self.categories.iter().filter(|r| r.is_live()).map(|r| &r.value)
  }

  fn live_page_mut(&mut self, id: i64) -> Option<&mut Row<Page>> {
    self.pages.iter_mut().find(|r| r.is_live() && r.value.id == id)
  }

  fn live_category_mut(&mut self, id: i64) -> Option<&mut Row<Category>> {
    self.categories.iter_mut().find(|r| r.is_live() && r.value.id == id)
  }

  fn category_name(&self, id: Option<i64>) -> Option<String> {
    let id = id?;
    self.live_categories().find(|c| c.id == id).map(|c| c.name.clone())
  }
}

/// A store that lives and dies with the process.
///
/// Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

// ─── PageStore impl ──────────────────────────────────────────────────────────

impl PageStore for MemoryStore {
  type Error = MemoryError;

  async fn create_page(&self, input: NewPage) -> Result<Page, MemoryError> {
    let mut inner = self.lock();
    if inner.live_pages().any(|p| p.slug == input.slug) {
      return Err(MemoryError::DuplicateSlug(input.slug));
    }

    inner.next_page += 1;
    let now = Utc::now();
    let page = Page {
      id:           inner.next_page,
      slug:         input.slug,
      html_content: input.html_content,
      title:        input.title,
      category_id:  input.category_id,
      created_at:   now,
      updated_at:   now,
    };
    inner.pages.push(Row::live(page.clone()));
    Ok(page)
  }

  async fn get_page(&self, id: i64) -> Result<Option<Page>, MemoryError> {
    Ok(self.lock().live_pages().find(|p| p.id == id).cloned())
  }

  async fn get_page_by_slug(&self, slug: &str) -> Result<Option<Page>, MemoryError> {
    Ok(self.lock().live_pages().find(|p| p.slug == slug).cloned())
  }

  async fn list_pages(
    &self,
    offset:      u64,
    limit:       u32,
    category_id: Option<i64>,
  ) -> Result<Vec<PageSummary>, MemoryError> {
    let inner = self.lock();
    let mut pages: Vec<&Page> = inner
      .live_pages()
      .filter(|p| category_id.is_none() || p.category_id == category_id)
      .collect();
    pages.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

    Ok(
      pages
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(limit as usize)
        .map(|p| PageSummary {
          id:            p.id,
          slug:          p.slug.clone(),
          title:         p.title.clone(),
          category_id:   p.category_id,
          category_name: inner.category_name(p.category_id),
          created_at:    p.created_at,
        })
        .collect(),
    )
  }

  async fn count_pages(&self, category_id: Option<i64>) -> Result<u64, MemoryError> {
    let count = self
      .lock()
      .live_pages()
      .filter(|p| category_id.is_none() || p.category_id == category_id)
      .count();
    Ok(count as u64)
  }

  async fn update_page(
    &self,
    id:     i64,
    update: PageUpdate,
  ) -> Result<Option<Page>, MemoryError> {
    let mut inner = self.lock();
    let Some(row) = inner.live_page_mut(id) else {
      return Ok(None);
    };
    if let Some(html) = update.html_content {
      row.value.html_content = html;
    }
    if let Some(title) = update.title {
      row.value.title = title;
    }
    row.value.updated_at = Utc::now();
    Ok(Some(row.value.clone()))
  }

  async fn delete_page(&self, id: i64) -> Result<bool, MemoryError> {
    let mut inner = self.lock();
    match inner.live_page_mut(id) {
      Some(row) => {
        row.deleted_at = Some(Utc::now());
        Ok(true)
      }
      None => Ok(false),
    }
  }

  async fn slug_exists(&self, slug: &str) -> Result<bool, MemoryError> {
    Ok(self.lock().live_pages().any(|p| p.slug == slug))
  }
}

// ─── CategoryStore impl ──────────────────────────────────────────────────────

impl CategoryStore for MemoryStore {
  type Error = MemoryError;

  async fn create_category(&self, input: NewCategory) -> Result<Category, MemoryError> {
    let mut inner = self.lock();
    if inner.live_categories().any(|c| c.name == input.name) {
      return Err(MemoryError::DuplicateName(input.name));
    }

    inner.next_cat += 1;
    let now = Utc::now();
    let category = Category {
      id:          inner.next_cat,
      name:        input.name,
      description: input.description,
      created_at:  now,
      updated_at:  now,
    };
    inner.categories.push(Row::live(category.clone()));
    Ok(category)
  }

  async fn get_category(&self, id: i64) -> Result<Option<Category>, MemoryError> {
    Ok(self.lock().live_categories().find(|c| c.id == id).cloned())
  }

  async fn get_category_by_name(
    &self,
    name: &str,
  ) -> Result<Option<Category>, MemoryError> {
    Ok(self.lock().live_categories().find(|c| c.name == name).cloned())
  }

  async fn list_categories(
    &self,
    offset: u64,
    limit:  u32,
  ) -> Result<Vec<Category>, MemoryError> {
    let all = self.all_categories().await?;
    Ok(
      all
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(limit as usize)
        .collect(),
    )
  }

  async fn all_categories(&self) -> Result<Vec<Category>, MemoryError> {
    let mut all: Vec<Category> = self.lock().live_categories().cloned().collect();
    all.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));
    Ok(all)
  }

  async fn count_categories(&self) -> Result<u64, MemoryError> {
    Ok(self.lock().live_categories().count() as u64)
  }

  async fn update_category(
    &self,
    id:     i64,
    update: CategoryUpdate,
  ) -> Result<Option<Category>, MemoryError> {
    let mut inner = self.lock();
    if let Some(name) = &update.name
      && inner.live_categories().any(|c| c.id != id && &c.name == name)
    {
      return Err(MemoryError::DuplicateName(name.clone()));
    }

    let Some(row) = inner.live_category_mut(id) else {
      return Ok(None);
    };
    if let Some(name) = update.name {
      row.value.name = name;
    }
    if let Some(description) = update.description {
      row.value.description = description;
    }
    row.value.updated_at = Utc::now();
    Ok(Some(row.value.clone()))
  }

  async fn delete_category(&self, id: i64) -> Result<bool, MemoryError> {
    let mut inner = self.lock();
    let Some(row) = inner.live_category_mut(id) else {
      return Ok(false);
    };
    row.deleted_at = Some(Utc::now());

    let now = Utc::now();
    for row in inner.pages.iter_mut().filter(|r| r.value.category_id == Some(id)) {
      row.value.category_id = None;
      row.value.updated_at = now;
    }
    Ok(true)
  }

  async fn category_name_exists(&self, name: &str) -> Result<bool, MemoryError> {
    Ok(self.lock().live_categories().any(|c| c.name == name))
  }
}

// ─── Race simulation ─────────────────────────────────────────────────────────

/// Delegates to a [`MemoryStore`] but answers every existence check with
/// "absent", so writes go straight to the uniqueness rules as they would
/// when two requests race past the check.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct Unchecked(pub MemoryStore);

#[cfg(test)]
impl PageStore for Unchecked {
  type Error = MemoryError;

  async fn create_page(&self, input: NewPage) -> Result<Page, MemoryError> {
    self.0.create_page(input).await
  }

  async fn get_page(&self, id: i64) -> Result<Option<Page>, MemoryError> {
    self.0.get_page(id).await
  }

  async fn get_page_by_slug(&self, slug: &str) -> Result<Option<Page>, MemoryError> {
    self.0.get_page_by_slug(slug).await
  }

  async fn list_pages(
    &self,
    offset: u64,
    limit: u32,
    category_id: Option<i64>,
  ) -> Result<Vec<PageSummary>, MemoryError> {
    self.0.list_pages(offset, limit, category_id).await
  }

  async fn count_pages(&self, category_id: Option<i64>) -> Result<u64, MemoryError> {
    self.0.count_pages(category_id).await
  }

  async fn update_page(
    &self,
    id: i64,
    update: PageUpdate,
  ) -> Result<Option<Page>, MemoryError> {
    self.0.update_page(id, update).await
  }

  async fn delete_page(&self, id: i64) -> Result<bool, MemoryError> {
    self.0.delete_page(id).await
  }

  async fn slug_exists(&self, _slug: &str) -> Result<bool, MemoryError> { Ok(false) }
}

#[cfg(test)]
impl CategoryStore for Unchecked {
  type Error = MemoryError;

  async fn create_category(&self, input: NewCategory) -> Result<Category, MemoryError> {
    self.0.create_category(input).await
  }

  async fn get_category(&self, id: i64) -> Result<Option<Category>, MemoryError> {
    self.0.get_category(id).await
  }

  async fn get_category_by_name(
    &self,
    _name: &str,
  ) -> Result<Option<Category>, MemoryError> {
    Ok(None)
  }

  async fn list_categories(
    &self,
    offset: u64,
    limit: u32,
  ) -> Result<Vec<Category>, MemoryError> {
    self.0.list_categories(offset, limit).await
  }

  async fn all_categories(&self) -> Result<Vec<Category>, MemoryError> {
    self.0.all_categories().await
  }

  async fn count_categories(&self) -> Result<u64, MemoryError> {
    self.0.count_categories().await
  }

  async fn update_category(
    &self,
    id: i64,
    update: CategoryUpdate,
  ) -> Result<Option<Category>, MemoryError> {
    self.0.update_category(id, update).await
  }

  async fn delete_category(&self, id: i64) -> Result<bool, MemoryError> {
    self.0.delete_category(id).await
  }

  async fn category_name_exists(&self, _name: &str) -> Result<bool, MemoryError> {
    Ok(false)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn new_page(slug: &str, category_id: Option<i64>) -> NewPage {
    NewPage {
      slug:         slug.into(),
      html_content: format!("<p>{slug}</p>"),
      title:        slug.into(),
      category_id,
    }
  }

  #[tokio::test]
  async fn duplicate_live_slug_is_rejected() {
    let store = MemoryStore::new();
    store.create_page(new_page("Same1234", None)).await.unwrap();
    let err = store.create_page(new_page("Same1234", None)).await.unwrap_err();
    assert!(matches!(err, MemoryError::DuplicateSlug(_)));
  }

  #[tokio::test]
  async fn listing_is_newest_first() {
    let store = MemoryStore::new();
    for slug in ["First123", "Second12", "Third123"] {
      store.create_page(new_page(slug, None)).await.unwrap();
    }
    let slugs: Vec<String> = store
      .list_pages(0, 10, None)
      .await
      .unwrap()
      .into_iter()
      .map(|p| p.slug)
      .collect();
    assert_eq!(slugs, ["Third123", "Second12", "First123"]);
  }

  #[tokio::test]
  async fn deleting_a_category_detaches_its_pages() {
    let store = MemoryStore::new();
    let cat = store
      .create_category(NewCategory { name: "Docs".into(), description: String::new() })
      .await
      .unwrap();
    let page = store.create_page(new_page("Docs1234", Some(cat.id))).await.unwrap();

    assert!(store.delete_category(cat.id).await.unwrap());
    let page = store.get_page(page.id).await.unwrap().unwrap();
    assert_eq!(page.category_id, None);
    assert_eq!(store.count_pages(Some(cat.id)).await.unwrap(), 0);
    assert!(!store.delete_category(cat.id).await.unwrap());
  }
}
