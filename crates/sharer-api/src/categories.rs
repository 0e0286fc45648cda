//! Handlers for `/categories` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/categories` | Paginated, `?page&page_size` |
//! | `POST`   | `/categories` | Body: `{"name", "description"?}`; 201 |
//! | `GET`    | `/categories/all` | Every category, name order |
//! | `GET`    | `/categories/options` | `<option>` fragment |
//! | `GET`    | `/categories/{id}` | 404 if not found |
//! | `PATCH`  | `/categories/{id}` | Body: `{"name"?, "description"?}` |
//! | `DELETE` | `/categories/{id}` | 204; pages are detached |

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
  response::{Html, IntoResponse},
};
use sharer_core::{
  category::{Category, CategoryUpdate, NewCategory},
  pagination::Paginated,
  store::{CategoryStore, PageStore},
};

use crate::{
  ApiState,
  error::ApiError,
  query::{INVALID_CATEGORY_ID, ListQuery},
};

fn category_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
  path
    .map(|Path(id)| id)
    .map_err(|_| ApiError::BadRequest(INVALID_CATEGORY_ID.into()))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
  body
    .map(|Json(t)| t)
    .map_err(|_| ApiError::BadRequest("Invalid JSON".into()))
}

// ─── Collection ──────────────────────────────────────────────────────────────

/// `GET /categories`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(query): Query<ListQuery>,
) -> Result<Json<Paginated<Category>>, ApiError>
where
  S: PageStore + CategoryStore + 'static,
{
  Ok(Json(state.categories.list(query.page_request()).await?))
}

/// `POST /categories`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  body: Result<Json<NewCategory>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PageStore + CategoryStore + 'static,
{
  let category = state
    .categories
    .create(json_body(body)?)
    .await
    .map_err(|err| ApiError::from(err).on_store_failure("Error creating category"))?;
  Ok((StatusCode::CREATED, Json(category)))
}

/// `GET /categories/all`
pub async fn all<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Category>>, ApiError>
where
  S: PageStore + CategoryStore + 'static,
{
  Ok(Json(state.categories.all().await?))
}

/// `GET /categories/options`
pub async fn options<S>(State(state): State<ApiState<S>>) -> Result<Html<String>, ApiError>
where
  S: PageStore + CategoryStore + 'static,
{
  Ok(Html(state.categories.options_html().await?))
}

// ─── Single category ─────────────────────────────────────────────────────────

/// `GET /categories/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Category>, ApiError>
where
  S: PageStore + CategoryStore + 'static,
{
  let id = category_id(path)?;
  Ok(Json(state.categories.get(id).await?))
}

/// `PATCH /categories/{id}`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  path: Result<Path<i64>, PathRejection>,
  body: Result<Json<CategoryUpdate>, JsonRejection>,
) -> Result<Json<Category>, ApiError>
where
  S: PageStore + CategoryStore + 'static,
{
  let id = category_id(path)?;
  let update = json_body(body)?;
  Ok(Json(state.categories.update(id, update).await?))
}

/// `DELETE /categories/{id}`
pub async fn delete<S>(
  State(state): State<ApiState<S>>,
  path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError>
where
  S: PageStore + CategoryStore + 'static,
{
  let id = category_id(path)?;
  state.categories.delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
