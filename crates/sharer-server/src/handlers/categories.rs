//! Category pages and form handlers.
//!
//! Failures are answered as JSON `{"error": ...}`. htmx callers get a script
//! that closes the open modal (plus `HX-Trigger: closeModal`); plain form
//! posts are redirected to `/categories`.

use axum::{
  Form, Json,
  extract::{
    Path, Query, State,
    rejection::{FormRejection, PathRejection},
  },
  http::{HeaderMap, HeaderName},
  response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;
use sharer_api::{ApiError, ListQuery, query::INVALID_CATEGORY_ID};
use sharer_core::{
  category::{CategoryUpdate, NewCategory},
  store::{CategoryStore, PageStore},
};

use crate::{AppState, handlers::is_htmx, views};

type Result<T, E = ApiError> = std::result::Result<T, E>;

const HX_TRIGGER: HeaderName = HeaderName::from_static("hx-trigger");

/// Urlencoded body of the create and edit forms.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryForm {
  #[serde(default)]
  pub name:        String,
  #[serde(default)]
  pub description: String,
}

fn category_id(path: Result<Path<i64>, PathRejection>) -> Result<i64> {
  path
    .map(|Path(id)| id)
    .map_err(|_| ApiError::BadRequest(INVALID_CATEGORY_ID.into()))
}

fn form_body(form: Result<Form<CategoryForm>, FormRejection>) -> Result<CategoryForm> {
  form
    .map(|Form(f)| f)
    .map_err(|_| ApiError::BadRequest("Invalid form data".into()))
}

fn modal_closed(modal_id: &str) -> Response {
  ([(HX_TRIGGER, "closeModal")], Html(views::close_modal_script(modal_id))).into_response()
}

fn back_to_list() -> Response { Redirect::to("/categories").into_response() }

// ─── Pages ───────────────────────────────────────────────────────────────────

/// `GET /categories`
pub async fn index<S>(
  State(state): State<AppState<S>>,
  Query(query): Query<ListQuery>,
) -> Result<Html<String>>
where
  S: PageStore + CategoryStore + 'static,
{
  let categories = state.categories.list(query.page_request()).await?;
  Ok(views::render(views::categories_index(&categories)))
}

/// `GET /categories/new`
pub async fn new_form() -> Html<String> { views::render(views::category_create_page()) }

/// `GET /categories/{id}`: there is no detail page, so an existing category
/// redirects to the list.
pub async fn show<S>(
  State(state): State<AppState<S>>,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Response>
where
  S: PageStore + CategoryStore + 'static,
{
  state.categories.get(category_id(path)?).await?;
  Ok(back_to_list())
}

/// `GET /categories/{id}/edit`
pub async fn edit<S>(
  State(state): State<AppState<S>>,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Html<String>>
where
  S: PageStore + CategoryStore + 'static,
{
  let category = state.categories.get(category_id(path)?).await?;
  Ok(views::render(views::category_edit_page(&category)))
}

/// `GET /categories/{id}/edit-modal`
pub async fn edit_modal<S>(
  State(state): State<AppState<S>>,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Html<String>>
where
  S: PageStore + CategoryStore + 'static,
{
  let category = state.categories.get(category_id(path)?).await?;
  Ok(views::render(views::category_edit_modal(&category)))
}

/// `GET /categories/options`
pub async fn options<S>(State(state): State<AppState<S>>) -> Result<Html<String>>
where
  S: PageStore + CategoryStore + 'static,
{
  Ok(Html(state.categories.options_html().await?))
}

// ─── Mutations ───────────────────────────────────────────────────────────────

/// `POST /categories`
pub async fn store<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  form: Result<Form<CategoryForm>, FormRejection>,
) -> Result<Response>
where
  S: PageStore + CategoryStore + 'static,
{
  let form = form_body(form)?;
  state
    .categories
    .create(NewCategory { name: form.name, description: form.description })
    .await
    .map_err(|err| ApiError::from(err).on_store_failure("Error creating category"))?;

  Ok(if is_htmx(&headers) { modal_closed("create_category_modal") } else { back_to_list() })
}

/// `POST /categories/{id}` and `PUT /categories/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  path: Result<Path<i64>, PathRejection>,
  form: Result<Form<CategoryForm>, FormRejection>,
) -> Result<Response>
where
  S: PageStore + CategoryStore + 'static,
{
  let id = category_id(path)?;
  let form = form_body(form)?;
  state
    .categories
    .update(id, CategoryUpdate {
      name:        Some(form.name),
      description: Some(form.description),
    })
    .await?;

  Ok(if is_htmx(&headers) { modal_closed("edit_category_modal") } else { back_to_list() })
}

/// `POST /categories/{id}/delete` and `DELETE /categories/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Response>
where
  S: PageStore + CategoryStore + 'static,
{
  let id = category_id(path)?;
  state.categories.delete(id).await.map_err(|err| match err {
    sharer_core::Error::NotFound(_) => ApiError::NotFound("Category not found".into()),
    other => other.into(),
  })?;

  Ok(if is_htmx(&headers) {
    Json(json!({ "message": "Category deleted successfully" })).into_response()
  } else {
    back_to_list()
  })
}
