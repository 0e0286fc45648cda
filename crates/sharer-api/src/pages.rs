//! Handlers for `/pages` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/pages` | `?page&page_size&category` |
//! | `GET`    | `/pages/{slug}` | 404 if not found |
//! | `PATCH`  | `/pages/{slug}` | Body: `{"html_content"?, "title"?}` |
//! | `DELETE` | `/pages/{slug}` | 204 on success |

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
};
use sharer_core::{
  page::{Page, PageSummary, PageUpdate},
  pagination::Paginated,
  store::{CategoryStore, PageStore},
};

use crate::{ApiState, error::ApiError, query::ListQuery};

/// `GET /pages`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(query): Query<ListQuery>,
) -> Result<Json<Paginated<PageSummary>>, ApiError>
where
  S: PageStore + CategoryStore + 'static,
{
  let category_id = query.category_id()?;
  let pages = state.pages.list(query.page_request(), category_id).await?;
  Ok(Json(pages))
}

/// `GET /pages/{slug}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(slug): Path<String>,
) -> Result<Json<Page>, ApiError>
where
  S: PageStore + CategoryStore + 'static,
{
  Ok(Json(state.pages.get_by_slug(&slug).await?))
}

/// `PATCH /pages/{slug}`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(slug): Path<String>,
  body: Result<Json<PageUpdate>, JsonRejection>,
) -> Result<Json<Page>, ApiError>
where
  S: PageStore + CategoryStore + 'static,
{
  let Json(update) = body.map_err(|_| ApiError::BadRequest("Invalid JSON".into()))?;
  let page = state.pages.get_by_slug(&slug).await?;
  Ok(Json(state.pages.update(page.id, update).await?))
}

/// `DELETE /pages/{slug}`
pub async fn delete<S>(
  State(state): State<ApiState<S>>,
  Path(slug): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: PageStore + CategoryStore + 'static,
{
  let page = state.pages.get_by_slug(&slug).await?;
  state.pages.delete(page.id).await?;
  Ok(StatusCode::NO_CONTENT)
}
