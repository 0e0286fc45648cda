//! `POST /share`: create a page from a JSON body.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use serde::Serialize;
use sharer_core::{
  page::CreatePage,
  store::{CategoryStore, PageStore},
};

use crate::{ApiState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct ShareResponse {
  pub url: String,
}

/// `POST /share`, body `{"html_content": "...", "title"?: "...", "category_id"?: 1}`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  body: Result<Json<CreatePage>, JsonRejection>,
) -> Result<Json<ShareResponse>, ApiError>
where
  S: PageStore + CategoryStore + 'static,
{
  let Json(input) = body.map_err(|_| ApiError::BadRequest("Invalid JSON".into()))?;

  let page = state
    .pages
    .create_page(input, &state.shutdown.child_token())
    .await
    .map_err(|err| ApiError::from(err).on_store_failure("Error saving content"))?;

  Ok(Json(ShareResponse { url: page.url() }))
}
