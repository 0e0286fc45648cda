//! `GET /pages`: paginated listing of shared pages.

use axum::{
  extract::{Query, State},
  response::Html,
};
use sharer_api::ListQuery;
use sharer_core::store::{CategoryStore, PageStore};

use crate::{AppState, error::Result, views};

pub async fn index<S>(
  State(state): State<AppState<S>>,
  Query(query): Query<ListQuery>,
) -> Result<Html<String>>
where
  S: PageStore + CategoryStore + 'static,
{
  let category = query.category_id()?;
  let pages = state.pages.list(query.page_request(), category).await?;
  Ok(views::render(views::pages_index(&pages, category)))
}
