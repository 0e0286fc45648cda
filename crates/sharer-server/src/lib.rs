//! HTML and form surface for the sharer service.
//!
//! Serves the submission form, the page and category listings, and the
//! shared pages themselves, and nests the JSON API from [`sharer_api`] under
//! `/api`. Generic over any store implementing both [`PageStore`] and
//! [`CategoryStore`].

pub mod error;
pub mod etag;
pub mod handlers;
pub mod views;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  http::StatusCode,
  response::{Html, IntoResponse},
  routing::{get, post},
};
use serde::Deserialize;
use sharer_api::ApiState;
use sharer_core::{
  service::{CategoryService, PageService},
  store::{CategoryStore, PageStore},
};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use handlers::{categories, home, pages, shared};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SHARER_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  /// Public origin used to build absolute share links.
  pub base_url:         String,
  pub store_path:       PathBuf,
  pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "127.0.0.1".to_owned(),
      port:             8080,
      base_url:         "http://localhost:8080".to_owned(),
      store_path:       PathBuf::from("sharer.db"),
      max_upload_bytes: 10 * 1024 * 1024,
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub pages:      PageService<S>,
  pub categories: CategoryService<S>,
  pub config:     Arc<ServerConfig>,
  /// Cancelled on shutdown; page creation checks it between slug attempts.
  pub shutdown:   CancellationToken,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      pages:      self.pages.clone(),
      categories: self.categories.clone(),
      config:     self.config.clone(),
      shutdown:   self.shutdown.clone(),
    }
  }
}

impl<S: PageStore + CategoryStore> AppState<S> {
  pub fn new(store: Arc<S>, config: ServerConfig) -> Self {
    Self {
      pages:      PageService::new(store.clone()),
      categories: CategoryService::new(store),
      config:     Arc::new(config),
      shutdown:   CancellationToken::new(),
    }
  }

  pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
    self.shutdown = shutdown;
    self
  }

  /// Absolute URL for a server-relative `path`.
  pub fn full_url(&self, path: &str) -> String {
    format!("{}{path}", self.config.base_url.trim_end_matches('/'))
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router, JSON API included.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: PageStore + CategoryStore + 'static,
{
  let api = sharer_api::api_router(
    ApiState::from_services(state.pages.clone(), state.categories.clone())
      .with_shutdown(state.shutdown.clone()),
  );
  let body_limit = state.config.max_upload_bytes;

  Router::new()
    .route("/",                           get(home::show::<S>).post(home::submit::<S>))
    .route("/pages",                      get(pages::index::<S>))
    .route("/shared/{slug}",              get(shared::show::<S>))
    .route("/categories",                 get(categories::index::<S>).post(categories::store::<S>))
    .route("/categories/new",             get(categories::new_form))
    .route("/categories/options",         get(categories::options::<S>))
    .route(
      "/categories/{id}",
      get(categories::show::<S>)
        .post(categories::update::<S>)
        .put(categories::update::<S>)
        .delete(categories::delete::<S>),
    )
    .route("/categories/{id}/edit",       get(categories::edit::<S>))
    .route("/categories/{id}/edit-modal", get(categories::edit_modal::<S>))
    .route("/categories/{id}/delete",     post(categories::delete::<S>))
    .fallback(not_found)
    .with_state(state)
    .nest("/api", api)
    .layer(DefaultBodyLimit::max(body_limit))
    .layer(TraceLayer::new_for_http())
}

async fn not_found() -> impl IntoResponse {
  (StatusCode::NOT_FOUND, Html(views::not_found().into_string()))
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, Response, header},
  };
  use serde_json::Value;
  use sharer_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  const BOUNDARY: &str = "sharer-test-boundary";

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState::new(Arc::new(store), ServerConfig {
      base_url: "https://share.example".to_owned(),
      max_upload_bytes: 64 * 1024,
      ..ServerConfig::default()
    })
  }

  enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a str),
  }

  fn multipart(parts: &[Part<'_>]) -> String {
    let mut body = String::new();
    for part in parts {
      body.push_str(&format!("--{BOUNDARY}\r\n"));
      match part {
        Part::Text(name, value) => {
          body.push_str(&format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"));
          body.push_str(value);
        }
        Part::File(name, file_name, value) => {
          body.push_str(&format!(
            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
             Content-Type: text/html\r\n\r\n"
          ));
          body.push_str(value);
        }
      }
      body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
  }

  async fn submit(
    state: &AppState<SqliteStore>,
    extra: &[(&str, &str)],
    parts: &[Part<'_>],
  ) -> Response<Body> {
    let mut req = Request::post("/").header(
      header::CONTENT_TYPE,
      format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    for (k, v) in extra {
      req = req.header(*k, *v);
    }
    let req = req.body(Body::from(multipart(parts))).unwrap();
    router(state.clone()).oneshot(req).await.unwrap()
  }

  async fn send(
    state: &AppState<SqliteStore>,
    method: &str,
    uri: &str,
    headers: &[(&str, &str)],
    body: &str,
  ) -> Response<Body> {
    let mut req = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      req = req.header(*k, *v);
    }
    let req = req.body(Body::from(body.to_owned())).unwrap();
    router(state.clone()).oneshot(req).await.unwrap()
  }

  async fn text(resp: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  fn location(resp: &Response<Body>) -> &str {
    resp.headers().get(header::LOCATION).unwrap().to_str().unwrap()
  }

  const FORM: (&str, &str) = ("content-type", "application/x-www-form-urlencoded");
  const HTMX: (&str, &str) = ("hx-request", "true");

  // ── Home and sharing ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn home_serves_the_form() {
    let state = make_state().await;
    let resp = send(&state, "GET", "/", &[], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = text(resp).await;
    assert!(html.contains(r#"name="htmlContent""#));
    assert!(html.contains(r#"hx-get="/categories/options""#));
  }

  #[tokio::test]
  async fn form_post_redirects_and_page_is_served_verbatim() {
    let state = make_state().await;
    let html = "<html><head><title>Hi</title></head><body>&amp; raw</body></html>";

    let resp = submit(&state, &[], &[Part::Text("htmlContent", html)]).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let slug = location(&resp).strip_prefix("/?success=").unwrap().to_owned();
    assert_eq!(slug.len(), 8);

    let banner = text(send(&state, "GET", &format!("/?success={slug}"), &[], "").await).await;
    assert!(banner.contains(&format!("https://share.example/shared/{slug}")));

    let resp = send(&state, "GET", &format!("/shared/{slug}"), &[], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
      resp.headers().get(header::CONTENT_TYPE).unwrap(),
      "text/html; charset=utf-8"
    );
    let etag = resp.headers().get(header::ETAG).unwrap().to_str().unwrap().to_owned();
    assert_eq!(etag, etag::compute_etag(html));
    assert_eq!(text(resp).await, html);

    let resp = send(&state, "GET", &format!("/shared/{slug}"), &[("if-none-match", etag.as_str())], "")
      .await;
    assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
  }

  #[tokio::test]
  async fn htmx_upload_gets_the_success_fragment() {
    let state = make_state().await;
    let resp = submit(&state, &[HTMX], &[
      Part::Text("htmlContent", ""),
      Part::File("htmlFile", "page.HTML", "<h1>From a file</h1>"),
    ])
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fragment = text(resp).await;
    assert!(fragment.contains("https://share.example/shared/"));
    assert!(!fragment.contains("<!DOCTYPE"));

    let listing = text(send(&state, "GET", "/pages", &[], "").await).await;
    assert!(listing.contains("From a file"));
  }

  #[tokio::test]
  async fn json_accept_gets_the_url() {
    let state = make_state().await;
    let resp = submit(&state, &[("accept", "application/json")], &[Part::Text(
      "htmlContent",
      "<p>json</p>",
    )])
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&text(resp).await).unwrap();
    assert!(body["url"].as_str().unwrap().starts_with("/shared/"));
  }

  #[tokio::test]
  async fn submissions_after_shutdown_are_refused() {
    let shutdown = CancellationToken::new();
    let state = make_state().await.with_shutdown(shutdown.clone());
    shutdown.cancel();

    let resp = submit(&state, &[], &[Part::Text("htmlContent", "<p>late</p>")]).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let resp = send(
      &state,
      "POST",
      "/api/share",
      &[("content-type", "application/json")],
      r#"{"html_content":"<p>late</p>"}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let listing = state.pages.list(Default::default(), None).await.unwrap();
    assert_eq!(listing.total, 0);
  }

  #[tokio::test]
  async fn non_html_upload_is_rejected() {
    let state = make_state().await;
    let resp = submit(&state, &[], &[Part::File("htmlFile", "notes.txt", "<p>x</p>")]).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(text(resp).await, "Please upload an HTML file");
  }

  #[tokio::test]
  async fn blank_submission_is_rejected() {
    let state = make_state().await;
    let resp = submit(&state, &[], &[Part::Text("htmlContent", "  \n ")]).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(text(resp).await, "No HTML content provided");
  }

  #[tokio::test]
  async fn oversized_upload_is_rejected() {
    let state = make_state().await;
    let big = "x".repeat(128 * 1024);
    let resp = submit(&state, &[], &[Part::Text("htmlContent", &big)]).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
  }

  #[tokio::test]
  async fn unknown_share_is_a_404_page() {
    let state = make_state().await;
    let resp = send(&state, "GET", "/shared/Missing1", &[], "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(text(resp).await.contains("404"));

    let resp = send(&state, "GET", "/no/such/route", &[], "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Listing ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn listing_rejects_a_bad_category_filter() {
    let state = make_state().await;
    let resp = send(&state, "GET", "/pages?category=abc", &[], "").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(&state, "GET", "/pages?page=-3&page_size=9999", &[], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn listing_filters_by_category() {
    let state = make_state().await;
    send(&state, "POST", "/categories", &[FORM], "name=Docs&description=").await;
    let docs = state.categories.all().await.unwrap()[0].id;

    submit(&state, &[], &[
      Part::Text("htmlContent", "<title>Filed</title>"),
      Part::Text("category_id", &docs.to_string()),
    ])
    .await;
    submit(&state, &[], &[Part::Text("htmlContent", "<title>Loose</title>")]).await;

    let html = text(send(&state, "GET", &format!("/pages?category={docs}"), &[], "").await).await;
    assert!(html.contains("Filed"));
    assert!(!html.contains("Loose"));
  }

  // ── Categories ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn category_form_lifecycle() {
    let state = make_state().await;

    let resp = send(&state, "POST", "/categories", &[FORM], "name=Docs&description=Ref").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/categories");
    let id = state.categories.all().await.unwrap()[0].id;

    let index = text(send(&state, "GET", "/categories", &[], "").await).await;
    assert!(index.contains("Docs"));

    let resp = send(&state, "GET", &format!("/categories/{id}"), &[], "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let edit = text(send(&state, "GET", &format!("/categories/{id}/edit"), &[], "").await).await;
    assert!(edit.contains(r#"value="Docs""#));

    let resp = send(
      &state,
      "PUT",
      &format!("/categories/{id}"),
      &[FORM, HTMX],
      "name=Manuals&description=Ref",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("hx-trigger").unwrap(), "closeModal");
    assert!(text(resp).await.contains("edit_category_modal"));
    assert_eq!(state.categories.get(id).await.unwrap().name, "Manuals");

    let options = text(send(&state, "GET", "/categories/options", &[], "").await).await;
    assert!(options.contains(&format!(r#"<option value="{id}">Manuals</option>"#)));

    let resp = send(&state, "DELETE", &format!("/categories/{id}"), &[HTMX], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&text(resp).await).unwrap();
    assert_eq!(body["message"], "Category deleted successfully");

    let resp = send(&state, "POST", &format!("/categories/{id}/delete"), &[], "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_str(&text(resp).await).unwrap();
    assert_eq!(body["error"], "Category not found");
  }

  #[tokio::test]
  async fn category_form_errors() {
    let state = make_state().await;

    let resp = send(&state, "POST", "/categories", &[FORM, HTMX], "name=+&description=").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&text(resp).await).unwrap();
    assert_eq!(body["error"], "Category name is required");

    let resp = send(&state, "POST", "/categories", &[FORM, HTMX], "name=Docs").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(text(resp).await.contains("create_category_modal"));

    let resp = send(&state, "POST", "/categories", &[FORM], "name=Docs").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(&state, "GET", "/categories/abc/edit", &[], "").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(&state, "GET", "/categories/999", &[], "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── JSON API ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn api_is_nested_under_api() {
    let state = make_state().await;
    let resp = send(
      &state,
      "POST",
      "/api/share",
      &[("content-type", "application/json")],
      r#"{"html_content":"<title>Api</title>"}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&text(resp).await).unwrap();
    let url = body["url"].as_str().unwrap().to_owned();

    let resp = send(&state, "GET", &url, &[], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(text(resp).await, "<title>Api</title>");
  }
}
