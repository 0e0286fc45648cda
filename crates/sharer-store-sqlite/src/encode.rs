//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings with microsecond
//! precision and a `Z` suffix, so lexical order in SQL is time order.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use sharer_core::{
  category::Category,
  page::{Page, PageSummary},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

/// The current time at the precision the store keeps.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

// ─── Row types ───────────────────────────────────────────────────────────────

pub const PAGE_COLUMNS: &str =
  "id, slug, html_content, title, category_id, created_at, updated_at";

/// Raw values read directly from a `pages` row.
pub struct RawPage {
  pub id:           i64,
  pub slug:         String,
  pub html_content: String,
  pub title:        String,
  pub category_id:  Option<i64>,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawPage {
  /// Read a row selected with [`PAGE_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      slug:         row.get(1)?,
      html_content: row.get(2)?,
      title:        row.get(3)?,
      category_id:  row.get(4)?,
      created_at:   row.get(5)?,
      updated_at:   row.get(6)?,
    })
  }

  pub fn into_page(self) -> Result<Page> {
    Ok(Page {
      id:           self.id,
      slug:         self.slug,
      html_content: self.html_content,
      title:        self.title,
      category_id:  self.category_id,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}

/// A `pages` row joined with its live category's name.
pub struct RawSummary {
  pub id:            i64,
  pub slug:          String,
  pub title:         String,
  pub category_id:   Option<i64>,
  pub category_name: Option<String>,
  pub created_at:    String,
}

impl RawSummary {
  pub fn into_summary(self) -> Result<PageSummary> {
    Ok(PageSummary {
      id:            self.id,
      slug:          self.slug,
      title:         self.title,
      category_id:   self.category_id,
      category_name: self.category_name,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub const CATEGORY_COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Raw values read directly from a `categories` row.
pub struct RawCategory {
  pub id:          i64,
  pub name:        String,
  pub description: String,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawCategory {
  /// Read a row selected with [`CATEGORY_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      name:        row.get(1)?,
      description: row.get(2)?,
      created_at:  row.get(3)?,
      updated_at:  row.get(4)?,
    })
  }

  pub fn into_category(self) -> Result<Category> {
    Ok(Category {
      id:          self.id,
      name:        self.name,
      description: self.description,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  #[test]
  fn timestamps_are_fixed_width_and_sort_lexically() {
    let early = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let late = early + chrono::Duration::microseconds(1);

    let (a, b) = (encode_dt(early), encode_dt(late));
    assert_eq!(a, "2024-01-02T03:04:05.000000Z");
    assert_eq!(a.len(), b.len());
    assert!(a < b);
  }

  #[test]
  fn now_survives_a_round_trip() {
    let t = now();
    assert_eq!(decode_dt(&encode_dt(t)).unwrap(), t);
  }

  #[test]
  fn garbage_timestamp_is_a_parse_error() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }
}
