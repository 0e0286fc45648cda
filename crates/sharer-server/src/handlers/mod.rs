//! Route handlers for the HTML and form surface.

pub mod categories;
pub mod home;
pub mod pages;
pub mod shared;

use axum::http::{HeaderMap, header};

/// `true` when the request was issued by htmx (`HX-Request: true`).
pub fn is_htmx(headers: &HeaderMap) -> bool {
  headers.get("hx-request").is_some_and(|v| v.as_bytes() == b"true")
}

/// `true` when the client asked for JSON instead of a redirect.
pub fn wants_json(headers: &HeaderMap) -> bool {
  headers
    .get(header::ACCEPT)
    .is_some_and(|v| v.as_bytes() == b"application/json")
}
