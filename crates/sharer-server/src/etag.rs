//! Strong ETags for shared pages.
//!
//! The tag is the hex SHA-256 of the stored bytes, so it changes exactly when
//! the content does.

use axum::http::{HeaderMap, header};
use sha2::{Digest, Sha256};

/// Compute the quoted ETag for `content`.
pub fn compute_etag(content: &str) -> String {
  let hash = Sha256::digest(content.as_bytes());
  format!("\"{}\"", hex::encode(hash))
}

/// `true` if the request's `If-None-Match` header matches `etag`.
///
/// Accepts `*`, comma-separated lists, and weak validators (`W/"..."`), which
/// compare equal to their strong form for GET.
pub fn if_none_match(headers: &HeaderMap, etag: &str) -> bool {
  headers
    .get_all(header::IF_NONE_MATCH)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(','))
    .map(str::trim)
    .any(|candidate| {
      candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
    })
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::IF_NONE_MATCH, HeaderValue::from_str(value).unwrap());
    h
  }

  #[test]
  fn etag_is_quoted_sha256() {
    assert_eq!(
      compute_etag(""),
      "\"e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855\""
    );
  }

  #[test]
  fn any_content_change_changes_the_tag() {
    assert_ne!(compute_etag("<p>a</p>"), compute_etag("<p>a</p> "));
    assert_eq!(compute_etag("<p>a</p>"), compute_etag("<p>a</p>"));
  }

  #[test]
  fn if_none_match_forms() {
    let tag = compute_etag("x");
    assert!(if_none_match(&headers(&tag), &tag));
    assert!(if_none_match(&headers(&format!("W/{tag}")), &tag));
    assert!(if_none_match(&headers(&format!("\"other\", {tag}")), &tag));
    assert!(if_none_match(&headers("*"), &tag));
    assert!(!if_none_match(&headers("\"other\""), &tag));
    assert!(!if_none_match(&HeaderMap::new(), &tag));
  }
}
