//! `GET /shared/{slug}`: serve stored HTML verbatim.

use axum::{
  extract::{Path, State},
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use sharer_core::store::{CategoryStore, PageStore};

use crate::{
  AppState,
  error::Result,
  etag::{compute_etag, if_none_match},
};

pub async fn show<S>(
  State(state): State<AppState<S>>,
  Path(slug): Path<String>,
  headers: HeaderMap,
) -> Result<Response>
where
  S: PageStore + CategoryStore + 'static,
{
  let page = state.pages.get_by_slug(&slug).await?;
  let etag = compute_etag(&page.html_content);

  if if_none_match(&headers, &etag) {
    return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
  }

  Ok(
    (
      [
        (header::CONTENT_TYPE, "text/html; charset=utf-8".to_owned()),
        (header::ETAG, etag),
      ],
      page.html_content,
    )
      .into_response(),
  )
}
