use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{
  Error, Result,
  page::{CreatePage, NewPage, Page, PageSummary, PageUpdate},
  pagination::{PageRequest, Paginated},
  slug::{RandomSlugs, SlugSource, generate_unique},
  store::PageStore,
  title::resolve_title,
};

const NO_CONTENT: &str = "No HTML content provided";

/// Creation, lookup, listing, and editing of shared pages.
pub struct PageService<S> {
  store: Arc<S>,
  slugs: Arc<dyn SlugSource>,
}

impl<S> Clone for PageService<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), slugs: Arc::clone(&self.slugs) }
  }
}

impl<S: PageStore> PageService<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self::with_slug_source(store, Arc::new(RandomSlugs))
  }

  pub fn with_slug_source(store: Arc<S>, slugs: Arc<dyn SlugSource>) -> Self {
    Self { store, slugs }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  /// Validate, allocate a slug, derive a title, and persist.
  ///
  /// Blank content is rejected before any storage call. A duplicate-key
  /// failure from a concurrent creation surfaces as [`Error::Store`].
  pub async fn create_page(
    &self,
    input: CreatePage,
    cancel: &CancellationToken,
  ) -> Result<Page> {
    if input.html_content.trim().is_empty() {
      return Err(Error::validation(NO_CONTENT));
    }

    let slug = generate_unique(&*self.store, &*self.slugs, cancel).await?;
    let title = resolve_title(input.title.as_deref(), &input.html_content);

    let page = self
      .store
      .create_page(NewPage {
        slug,
        html_content: input.html_content,
        title,
        category_id: input.category_id,
      })
      .await
      .map_err(Error::store)?;

    tracing::info!(id = page.id, slug = %page.slug, "shared page created");
    Ok(page)
  }

  pub async fn get_by_slug(&self, slug: &str) -> Result<Page> {
    self
      .store
      .get_page_by_slug(slug)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound(format!("page {slug} not found")))
  }

  pub async fn get(&self, id: i64) -> Result<Page> {
    self
      .store
      .get_page(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound(format!("page {id} not found")))
  }

  /// One window of pages, newest first, optionally restricted to a category.
  ///
  /// The window and the total come from two separate queries with no
  /// transaction between them.
  pub async fn list(
    &self,
    request: PageRequest,
    category_id: Option<i64>,
  ) -> Result<Paginated<PageSummary>> {
    let items = self
      .store
      .list_pages(request.offset(), request.limit(), category_id)
      .await
      .map_err(Error::store)?;
    let total = self.store.count_pages(category_id).await.map_err(Error::store)?;
    Ok(Paginated::new(items, request, total))
  }

  /// Edit content and/or title. A blank replacement title is re-derived from
  /// the effective content.
  pub async fn update(&self, id: i64, mut update: PageUpdate) -> Result<Page> {
    if let Some(html) = &update.html_content
      && html.trim().is_empty()
    {
      return Err(Error::validation(NO_CONTENT));
    }

    let current = self.get(id).await?;
    if update.is_empty() {
      return Ok(current);
    }

    if let Some(title) = update.title.take() {
      let html = update.html_content.as_deref().unwrap_or(&current.html_content);
      update.title = Some(resolve_title(Some(&title), html));
    }

    self
      .store
      .update_page(id, update)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound(format!("page {id} not found")))
  }

  pub async fn delete(&self, id: i64) -> Result<()> {
    let deleted = self.store.delete_page(id).await.map_err(Error::store)?;
    if !deleted {
      return Err(Error::NotFound(format!("page {id} not found")));
    }
    tracing::info!(id, "shared page deleted");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    category::NewCategory,
    memory::{MemoryStore, Unchecked},
    slug::is_valid_slug,
    store::CategoryStore as _,
  };

  struct Always(&'static str);

  impl SlugSource for Always {
    fn draw(&self) -> String { self.0.to_owned() }
  }

  fn service() -> PageService<MemoryStore> {
    PageService::new(Arc::new(MemoryStore::new()))
  }

  fn create(html: &str) -> CreatePage {
    CreatePage { html_content: html.into(), ..Default::default() }
  }

  #[tokio::test]
  async fn created_page_round_trips_byte_for_byte() {
    let svc = service();
    let html = "<!DOCTYPE html>\n<title>T</title>\r\n<p>&amp; <b>raw</b> é</p>  \n";
    let page = svc.create_page(create(html), &CancellationToken::new()).await.unwrap();

    assert!(is_valid_slug(&page.slug));
    assert_eq!(page.url(), format!("/shared/{}", page.slug));

    let fetched = svc.get_by_slug(&page.slug).await.unwrap();
    assert_eq!(fetched.html_content, html);
    assert_eq!(fetched.title, "T");
  }

  #[tokio::test]
  async fn blank_content_is_rejected_without_storing() {
    let svc = service();
    for html in ["", "   ", "\n\t  \r\n"] {
      let err = svc.create_page(create(html), &CancellationToken::new()).await.unwrap_err();
      assert!(matches!(err, Error::Validation(ref m) if m == NO_CONTENT));
    }
    assert_eq!(svc.store().count_pages(None).await.unwrap(), 0);
  }

  #[tokio::test]
  async fn exhausted_slugs_create_nothing() {
    let store = Arc::new(MemoryStore::new());
    let svc = PageService::with_slug_source(store.clone(), Arc::new(Always("AAAAAAAA")));

    svc.create_page(create("<p>one</p>"), &CancellationToken::new()).await.unwrap();
    let err = svc
      .create_page(create("<p>two</p>"), &CancellationToken::new())
      .await
      .unwrap_err();

    assert!(matches!(err, Error::ExhaustedRetries { attempts: 10 }));
    assert_eq!(store.count_pages(None).await.unwrap(), 1);
  }

  #[tokio::test]
  async fn slug_taken_between_check_and_insert_is_a_store_error() {
    let store = Arc::new(Unchecked::default());
    let svc = PageService::with_slug_source(store.clone(), Arc::new(Always("RaceRace")));
    let cancel = CancellationToken::new();

    let first = svc.create_page(create("<p>a</p>"), &cancel).await.unwrap();
    let err = svc.create_page(create("<p>b</p>"), &cancel).await.unwrap_err();

    assert!(matches!(err, Error::Store(_)), "got {err:?}");
    assert_eq!(store.count_pages(None).await.unwrap(), 1);
    let kept = svc.get_by_slug("RaceRace").await.unwrap();
    assert_eq!(kept.id, first.id);
    assert_eq!(kept.html_content, "<p>a</p>");
  }

  #[tokio::test]
  async fn explicit_title_is_kept() {
    let svc = service();
    let input = CreatePage {
      html_content: "<title>Foo</title>".into(),
      title:        Some("Mine".into()),
      category_id:  None,
    };
    let page = svc.create_page(input, &CancellationToken::new()).await.unwrap();
    assert_eq!(page.title, "Mine");
  }

  #[tokio::test]
  async fn missing_slug_is_not_found() {
    let err = service().get_by_slug("Nope1234").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
  }

  #[tokio::test]
  async fn listing_filters_by_category_and_counts_the_same_scope() {
    let store = Arc::new(MemoryStore::new());
    let svc = PageService::new(store.clone());
    let docs = store
      .create_category(NewCategory { name: "Docs".into(), description: String::new() })
      .await
      .unwrap();

    let cancel = CancellationToken::new();
    for i in 0..5 {
      let mut input = create(&format!("<h1>Doc {i}</h1>"));
      input.category_id = Some(docs.id);
      svc.create_page(input, &cancel).await.unwrap();
    }
    for i in 0..3 {
      svc.create_page(create(&format!("<h1>Loose {i}</h1>")), &cancel).await.unwrap();
    }

    let page = svc.list(PageRequest::new(2, 2), Some(docs.id)).await.unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items.len(), 2);
    assert!(page.has_next && page.has_prev);
    assert!(page.items.iter().all(|p| p.category_name.as_deref() == Some("Docs")));

    let all = svc.list(PageRequest::default(), None).await.unwrap();
    assert_eq!(all.total, 8);
    assert_eq!(all.items.len(), 8);
    assert!(!all.has_next && !all.has_prev);
  }

  #[tokio::test]
  async fn update_rewrites_content_and_rederives_blank_title() {
    let svc = service();
    let page = svc
      .create_page(create("<title>Old</title>"), &CancellationToken::new())
      .await
      .unwrap();

    let updated = svc
      .update(page.id, PageUpdate {
        html_content: Some("<h1>New</h1>".into()),
        title:        Some(" ".into()),
      })
      .await
      .unwrap();
    assert_eq!(updated.slug, page.slug);
    assert_eq!(updated.html_content, "<h1>New</h1>");
    assert_eq!(updated.title, "New");
  }

  #[tokio::test]
  async fn update_rejects_blank_content() {
    let svc = service();
    let page = svc
      .create_page(create("<p>x</p>"), &CancellationToken::new())
      .await
      .unwrap();
    let err = svc
      .update(page.id, PageUpdate { html_content: Some("  ".into()), title: None })
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(svc.get(page.id).await.unwrap().html_content, "<p>x</p>");
  }

  #[tokio::test]
  async fn deleted_page_disappears() {
    let svc = service();
    let page = svc
      .create_page(create("<p>bye</p>"), &CancellationToken::new())
      .await
      .unwrap();
    svc.delete(page.id).await.unwrap();

    assert!(matches!(svc.get_by_slug(&page.slug).await, Err(Error::NotFound(_))));
    assert!(matches!(svc.delete(page.id).await, Err(Error::NotFound(_))));
  }
}
