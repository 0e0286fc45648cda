//! Display-title extraction from raw HTML.
//!
//! This is a textual match, not an HTML parse: the first `<title>` wins, then
//! the first `<h1>`, and the tag's inner text may not contain `<`.

use std::sync::LazyLock;

use regex::Regex;

pub const DEFAULT_TITLE: &str = "Shared HTML Page";

static TITLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"<title[^>]*>([^<]+)</title>").expect("title regex should compile")
});

static H1_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"<h1[^>]*>([^<]+)</h1>").expect("h1 regex should compile")
});

/// Pick a title for `html`: `<title>` text, else `<h1>` text, else
/// [`DEFAULT_TITLE`]. Blank matches are skipped.
pub fn extract_title(html: &str) -> String {
  [&*TITLE_REGEX, &*H1_REGEX]
    .into_iter()
    .find_map(|re| first_text(re, html))
    .unwrap_or_else(|| DEFAULT_TITLE.to_owned())
}

fn first_text(re: &Regex, html: &str) -> Option<String> {
  let text = re.captures(html)?.get(1)?.as_str().trim();
  (!text.is_empty()).then(|| text.to_owned())
}

/// The title to store: a non-blank explicit title (trimmed), or one extracted
/// from `html`.
pub fn resolve_title(explicit: Option<&str>, html: &str) -> String {
  match explicit.map(str::trim) {
    Some(t) if !t.is_empty() => t.to_owned(),
    _ => extract_title(html),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn title_tag_wins_over_h1() {
    assert_eq!(extract_title("<title>Foo</title><h1>Bar</h1>"), "Foo");
  }

  #[test]
  fn h1_is_the_fallback() {
    assert_eq!(extract_title("<h1>Bar</h1>"), "Bar");
  }

  #[test]
  fn default_when_neither_tag_is_present() {
    assert_eq!(extract_title("<p>hello</p>"), DEFAULT_TITLE);
    assert_eq!(extract_title(""), "Shared HTML Page");
  }

  #[test]
  fn text_is_trimmed_and_attributes_are_allowed() {
    let html = r#"<html><head><title lang="en">  Spaced Out  </title></head></html>"#;
    assert_eq!(extract_title(html), "Spaced Out");
    assert_eq!(extract_title(r#"<h1 class="hero">Hi</h1>"#), "Hi");
  }

  #[test]
  fn blank_title_falls_through_to_h1() {
    assert_eq!(extract_title("<title>   </title><h1>Bar</h1>"), "Bar");
  }

  #[test]
  fn nested_markup_is_not_matched() {
    assert_eq!(extract_title("<h1><em>Bar</em></h1>"), DEFAULT_TITLE);
  }

  #[test]
  fn explicit_title_wins_unless_blank() {
    assert_eq!(resolve_title(Some(" Mine "), "<title>Foo</title>"), "Mine");
    assert_eq!(resolve_title(Some("  "), "<title>Foo</title>"), "Foo");
    assert_eq!(resolve_title(None, "<h1>Bar</h1>"), "Bar");
  }
}
