use std::sync::Arc;

use crate::{
  Error, Result,
  category::{Category, CategoryUpdate, NewCategory, render_options},
  pagination::{PageRequest, Paginated},
  store::{CategoryStore, StoreError},
};

const NAME_REQUIRED: &str = "Category name is required";
const NAME_EMPTY: &str = "Category name cannot be empty";
const NAME_TAKEN: &str = "Category name already exists";

/// Validated CRUD over categories.
pub struct CategoryService<S> {
  store: Arc<S>,
}

impl<S> Clone for CategoryService<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: CategoryStore> CategoryService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub fn store(&self) -> &Arc<S> { &self.store }

  pub async fn create(&self, input: NewCategory) -> Result<Category> {
    let name = input.name.trim().to_owned();
    if name.is_empty() {
      return Err(Error::validation(NAME_REQUIRED));
    }
    if self.store.category_name_exists(&name).await.map_err(Error::store)? {
      return Err(Error::validation(NAME_TAKEN));
    }

    let category = self
      .store
      .create_category(NewCategory {
        name,
        description: input.description.trim().to_owned(),
      })
      .await
      .map_err(name_conflict)?;

    tracing::info!(id = category.id, name = %category.name, "category created");
    Ok(category)
  }

  pub async fn get(&self, id: i64) -> Result<Category> {
    self
      .store
      .get_category(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| not_found(id))
  }

  pub async fn list(&self, request: PageRequest) -> Result<Paginated<Category>> {
    let items = self
      .store
      .list_categories(request.offset(), request.limit())
      .await
      .map_err(Error::store)?;
    let total = self.store.count_categories().await.map_err(Error::store)?;
    Ok(Paginated::new(items, request, total))
  }

  /// Every live category in name order, for dropdowns.
  pub async fn all(&self) -> Result<Vec<Category>> {
    self.store.all_categories().await.map_err(Error::store)
  }

  /// The `<option>` fragment for the category select control.
  pub async fn options_html(&self) -> Result<String> {
    Ok(render_options(&self.all().await?))
  }

  /// Rename and/or redescribe. Keeping the current name is not a collision.
  pub async fn update(&self, id: i64, update: CategoryUpdate) -> Result<Category> {
    let name = update.name.as_deref().map(str::trim).map(str::to_owned);
    if name.as_deref().is_some_and(str::is_empty) {
      return Err(Error::validation(NAME_EMPTY));
    }

    let current = self.get(id).await?;
    if let Some(name) = &name
      && *name != current.name
      && let Some(other) =
        self.store.get_category_by_name(name).await.map_err(Error::store)?
      && other.id != id
    {
      return Err(Error::validation(NAME_TAKEN));
    }

    let update = CategoryUpdate {
      name,
      description: update.description.map(|d| d.trim().to_owned()),
    };
    if update.is_empty() {
      return Ok(current);
    }

    self
      .store
      .update_category(id, update)
      .await
      .map_err(name_conflict)?
      .ok_or_else(|| not_found(id))
  }

  /// Soft-delete; pages filed under the category become uncategorised.
  pub async fn delete(&self, id: i64) -> Result<()> {
    if !self.store.delete_category(id).await.map_err(Error::store)? {
      return Err(not_found(id));
    }
    tracing::info!(id, "category deleted");
    Ok(())
  }
}

/// A write rejected by the name index lost a race with a concurrent request
/// that passed the same existence check.
fn name_conflict<E: StoreError>(err: E) -> Error {
  if err.is_duplicate() { Error::validation(NAME_TAKEN) } else { Error::store(err) }
}

fn not_found(id: i64) -> Error { Error::NotFound(format!("category {id} not found")) }
