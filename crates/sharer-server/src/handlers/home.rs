//! `GET /` and `POST /`: the submission form and its multipart handler.

use std::path::Path;

use axum::{
  Json,
  extract::{Multipart, Query, State},
  http::HeaderMap,
  response::{Html, IntoResponse, Redirect, Response},
};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;
use sharer_api::query::parse_category_id;
use sharer_core::{
  page::{CreatePage, share_path},
  slug::is_valid_slug,
  store::{CategoryStore, PageStore},
};

use crate::{
  AppState,
  error::{Error, Result},
  handlers::{is_htmx, wants_json},
  views,
};

const NOT_HTML: &str = "Please upload an HTML file";

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
  pub success: Option<String>,
}

/// `GET /[?success=<slug>]`
pub async fn show<S>(
  State(state): State<AppState<S>>,
  Query(query): Query<HomeQuery>,
) -> Html<String>
where
  S: PageStore + CategoryStore + 'static,
{
  let url = query
    .success
    .filter(|slug| is_valid_slug(slug))
    .map(|slug| state.full_url(&share_path(&slug)));
  views::render(views::home(url.as_deref()))
}

// ─── Submission ──────────────────────────────────────────────────────────────

struct Upload {
  file_name: String,
  data:      Bytes,
}

/// The raw multipart fields we care about; anything else is ignored.
#[derive(Default)]
struct Submission {
  text:        Option<String>,
  file:        Option<Upload>,
  category_id: Option<String>,
}

impl Submission {
  async fn read(mut multipart: Multipart) -> Result<Self> {
    let mut sub = Self::default();
    while let Some(field) = multipart.next_field().await? {
      let name = field.name().unwrap_or_default().to_owned();
      match name.as_str() {
        "htmlContent" => sub.text = Some(field.text().await?),
        "htmlFile" => {
          let file_name = field.file_name().unwrap_or_default().to_owned();
          let data = field.bytes().await?;
          // Browsers send an empty part when no file was chosen.
          if !file_name.is_empty() {
            sub.file = Some(Upload { file_name, data });
          }
        }
        "category_id" => sub.category_id = Some(field.text().await?),
        _ => {}
      }
    }
    Ok(sub)
  }

  /// Textarea content wins when non-blank; otherwise the uploaded file is
  /// used. An unparsable category id is ignored.
  fn into_input(self) -> Result<CreatePage> {
    let category_id = parse_category_id(self.category_id.as_deref()).unwrap_or(None);

    let html_content = match (self.text, self.file) {
      (Some(text), _) if !text.trim().is_empty() => text,
      (_, Some(upload)) => {
        if !is_html_file(&upload.file_name) {
          return Err(Error::BadRequest(NOT_HTML.into()));
        }
        String::from_utf8(upload.data.to_vec())
          .map_err(|_| Error::BadRequest("Uploaded file is not valid UTF-8".into()))?
      }
      (text, None) => text.unwrap_or_default(),
    };

    Ok(CreatePage { html_content, title: None, category_id })
  }
}

fn is_html_file(name: &str) -> bool {
  Path::new(name)
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}

/// `POST /` (multipart: `htmlContent`, `htmlFile`, `category_id`)
///
/// htmx gets the success fragment, `Accept: application/json` gets
/// `{"url": ...}`, and plain form posts are redirected back to the form.
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  multipart: Multipart,
) -> Result<Response>
where
  S: PageStore + CategoryStore + 'static,
{
  let input = Submission::read(multipart).await?.into_input()?;

  let page = state
    .pages
    .create_page(input, &state.shutdown.child_token())
    .await
    .map_err(|err| Error::from(err).on_store_failure("Error saving content"))?;

  let response = if is_htmx(&headers) {
    views::render(views::success(&state.full_url(&page.url()))).into_response()
  } else if wants_json(&headers) {
    Json(json!({ "url": page.url() })).into_response()
  } else {
    Redirect::to(&format!("/?success={}", page.slug)).into_response()
  };
  Ok(response)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn upload(name: &str, body: &str) -> Option<Upload> {
    Some(Upload { file_name: name.into(), data: Bytes::from(body.to_owned()) })
  }

  #[test]
  fn html_extensions_are_case_insensitive() {
    assert!(is_html_file("page.html"));
    assert!(is_html_file("PAGE.HTM"));
    assert!(is_html_file("archive.tar.Html"));
    assert!(!is_html_file("notes.txt"));
    assert!(!is_html_file("html"));
  }

  #[test]
  fn textarea_wins_over_file() {
    let sub = Submission {
      text:        Some("<p>typed</p>".into()),
      file:        upload("a.html", "<p>file</p>"),
      category_id: Some("4".into()),
    };
    let input = sub.into_input().unwrap();
    assert_eq!(input.html_content, "<p>typed</p>");
    assert_eq!(input.category_id, Some(4));
  }

  #[test]
  fn blank_textarea_falls_back_to_file() {
    let sub = Submission {
      text:        Some("   ".into()),
      file:        upload("a.htm", "<p>file</p>"),
      category_id: Some("nope".into()),
    };
    let input = sub.into_input().unwrap();
    assert_eq!(input.html_content, "<p>file</p>");
    assert_eq!(input.category_id, None);
  }

  #[test]
  fn non_html_upload_is_rejected() {
    let sub = Submission { text: None, file: upload("a.txt", "hi"), category_id: None };
    assert!(matches!(sub.into_input(), Err(Error::BadRequest(ref m)) if m == NOT_HTML));
  }
}
