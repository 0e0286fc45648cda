//! SQL schema for the sharer SQLite store.
//!
//! Applied at every open; `PRAGMA user_version` records which version is on
//! disk and future migrations will be gated on it.

pub const SCHEMA_VERSION: i64 = 1;

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
///
/// `pages.category_id` deliberately has no foreign key: a page may point at a
/// category id that was never created, and deleting a category detaches its
/// pages explicitly.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS categories (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL,   -- RFC 3339 UTC, microsecond precision
    updated_at  TEXT NOT NULL,
    deleted_at  TEXT             -- NULL while live
);

CREATE TABLE IF NOT EXISTS pages (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    slug         TEXT NOT NULL,
    html_content TEXT NOT NULL,
    title        TEXT NOT NULL,
    category_id  INTEGER,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL,
    deleted_at   TEXT
);

CREATE UNIQUE INDEX IF NOT EXISTS pages_slug_live_idx
    ON pages(slug) WHERE deleted_at IS NULL;
CREATE UNIQUE INDEX IF NOT EXISTS categories_name_live_idx
    ON categories(name) WHERE deleted_at IS NULL;

CREATE INDEX IF NOT EXISTS pages_category_idx ON pages(category_id);
CREATE INDEX IF NOT EXISTS pages_created_idx  ON pages(created_at);

PRAGMA user_version = 1;
";
