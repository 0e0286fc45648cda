//! [`SqliteStore`], the SQLite implementation of [`PageStore`] and
//! [`CategoryStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use sharer_core::{
  category::{Category, CategoryUpdate, NewCategory},
  page::{NewPage, Page, PageSummary, PageUpdate},
  store::{CategoryStore, PageStore},
};

use crate::{
  encode::{
    CATEGORY_COLUMNS, PAGE_COLUMNS, RawCategory, RawPage, RawSummary, encode_dt, now,
  },
  schema::{SCHEMA, SCHEMA_VERSION},
  Error, Result,
};

fn to_sql_offset(offset: u64) -> i64 { i64::try_from(offset).unwrap_or(i64::MAX) }

fn to_count(n: i64) -> u64 { u64::try_from(n).unwrap_or_default() }

// ─── Store ───────────────────────────────────────────────────────────────────

/// Page and category storage backed by a single SQLite file.
///
/// Clones share the inner connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    let found: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("PRAGMA user_version", [], |r| r.get(0))?))
      .await?;
    if found > SCHEMA_VERSION {
      return Err(Error::SchemaTooNew { found, supported: SCHEMA_VERSION });
    }

    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!(version = SCHEMA_VERSION, "sqlite schema ready");
    Ok(())
  }

  /// The schema version stamped on the open database.
  pub async fn schema_version(&self) -> Result<i64> {
    Ok(
      self
        .conn
        .call(|conn| Ok(conn.query_row("PRAGMA user_version", [], |r| r.get(0))?))
        .await?,
    )
  }
}

// ─── PageStore impl ──────────────────────────────────────────────────────────

impl PageStore for SqliteStore {
  type Error = Error;

  async fn create_page(&self, input: NewPage) -> Result<Page> {
    let ts = now();
    let ts_str = encode_dt(ts);
    let slug = input.slug.clone();
    let html = input.html_content.clone();
    let title = input.title.clone();

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO pages (slug, html_content, title, category_id, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
          rusqlite::params![slug, html, title, input.category_id, ts_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(|e| Error::unique(e, || format!("slug {:?}", input.slug)))?;

    Ok(Page {
      id,
      slug: input.slug,
      html_content: input.html_content,
      title: input.title,
      category_id: input.category_id,
      created_at: ts,
      updated_at: ts,
    })
  }

  async fn get_page(&self, id: i64) -> Result<Option<Page>> {
    let raw: Option<RawPage> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PAGE_COLUMNS} FROM pages WHERE id = ?1 AND deleted_at IS NULL"),
              rusqlite::params![id],
              RawPage::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPage::into_page).transpose()
  }

  async fn get_page_by_slug(&self, slug: &str) -> Result<Option<Page>> {
    let slug = slug.to_owned();

    let raw: Option<RawPage> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PAGE_COLUMNS} FROM pages WHERE slug = ?1 AND deleted_at IS NULL"
              ),
              rusqlite::params![slug],
              RawPage::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPage::into_page).transpose()
  }

  async fn list_pages(
    &self,
    offset:      u64,
    limit:       u32,
    category_id: Option<i64>,
  ) -> Result<Vec<PageSummary>> {
    let offset = to_sql_offset(offset);

    let raws: Vec<RawSummary> = self
      .conn
      .call(move |conn| {
        // Deleted categories drop out of the join, so their name is never
        // shown even for pages that still reference them.
        let mut stmt = conn.prepare(
          "SELECT p.id, p.slug, p.title, p.category_id, c.name, p.created_at
           FROM pages p
           LEFT JOIN categories c
             ON c.id = p.category_id AND c.deleted_at IS NULL
           WHERE p.deleted_at IS NULL
             AND (?1 IS NULL OR p.category_id = ?1)
           ORDER BY p.created_at DESC, p.id DESC
           LIMIT ?2 OFFSET ?3",
        )?;

        let rows = stmt
          .query_map(rusqlite::params![category_id, limit, offset], |row| {
            Ok(RawSummary {
              id:            row.get(0)?,
              slug:          row.get(1)?,
              title:         row.get(2)?,
              category_id:   row.get(3)?,
              category_name: row.get(4)?,
              created_at:    row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSummary::into_summary).collect()
  }

  async fn count_pages(&self, category_id: Option<i64>) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM pages
           WHERE deleted_at IS NULL AND (?1 IS NULL OR category_id = ?1)",
          rusqlite::params![category_id],
          |r| r.get(0),
        )?)
      })
      .await?;
    Ok(to_count(n))
  }

  async fn update_page(&self, id: i64, update: PageUpdate) -> Result<Option<Page>> {
    let ts_str = encode_dt(now());

    let raw: Option<RawPage> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE pages
           SET html_content = COALESCE(?2, html_content),
               title        = COALESCE(?3, title),
               updated_at   = ?4
           WHERE id = ?1 AND deleted_at IS NULL",
          rusqlite::params![id, update.html_content, update.title, ts_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(Some(conn.query_row(
          &format!("SELECT {PAGE_COLUMNS} FROM pages WHERE id = ?1"),
          rusqlite::params![id],
          RawPage::from_row,
        )?))
      })
      .await?;

    raw.map(RawPage::into_page).transpose()
  }

  async fn delete_page(&self, id: i64) -> Result<bool> {
    let ts_str = encode_dt(now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE pages SET deleted_at = ?2, updated_at = ?2
           WHERE id = ?1 AND deleted_at IS NULL",
          rusqlite::params![id, ts_str],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  async fn slug_exists(&self, slug: &str) -> Result<bool> {
    let slug = slug.to_owned();

    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT 1 FROM pages WHERE slug = ?1 AND deleted_at IS NULL",
                rusqlite::params![slug],
                |_| Ok(true),
              )
              .optional()?
              .unwrap_or(false),
          )
        })
        .await?,
    )
  }
}

// ─── CategoryStore impl ──────────────────────────────────────────────────────

impl CategoryStore for SqliteStore {
  type Error = Error;

  async fn create_category(&self, input: NewCategory) -> Result<Category> {
    let ts = now();
    let ts_str = encode_dt(ts);
    let name = input.name.clone();
    let description = input.description.clone();

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO categories (name, description, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?3)",
          rusqlite::params![name, description, ts_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(|e| Error::unique(e, || format!("category name {:?}", input.name)))?;

    Ok(Category {
      id,
      name: input.name,
      description: input.description,
      created_at: ts,
      updated_at: ts,
    })
  }

  async fn get_category(&self, id: i64) -> Result<Option<Category>> {
    let raw: Option<RawCategory> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {CATEGORY_COLUMNS} FROM categories
                 WHERE id = ?1 AND deleted_at IS NULL"
              ),
              rusqlite::params![id],
              RawCategory::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCategory::into_category).transpose()
  }

  async fn get_category_by_name(&self, name: &str) -> Result<Option<Category>> {
    let name = name.to_owned();

    let raw: Option<RawCategory> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {CATEGORY_COLUMNS} FROM categories
                 WHERE name = ?1 AND deleted_at IS NULL"
              ),
              rusqlite::params![name],
              RawCategory::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCategory::into_category).transpose()
  }

  async fn list_categories(&self, offset: u64, limit: u32) -> Result<Vec<Category>> {
    let offset = to_sql_offset(offset);

    let raws: Vec<RawCategory> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CATEGORY_COLUMNS} FROM categories
           WHERE deleted_at IS NULL
           ORDER BY name ASC, id ASC
           LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit, offset], RawCategory::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCategory::into_category).collect()
  }

  async fn all_categories(&self) -> Result<Vec<Category>> {
    let raws: Vec<RawCategory> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CATEGORY_COLUMNS} FROM categories
           WHERE deleted_at IS NULL
           ORDER BY name ASC, id ASC"
        ))?;
        let rows = stmt
          .query_map([], RawCategory::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCategory::into_category).collect()
  }

  async fn count_categories(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM categories WHERE deleted_at IS NULL",
          [],
          |r| r.get(0),
        )?)
      })
      .await?;
    Ok(to_count(n))
  }

  async fn update_category(
    &self,
    id:     i64,
    update: CategoryUpdate,
  ) -> Result<Option<Category>> {
    let ts_str = encode_dt(now());
    let name = update.name.clone();

    let raw: Option<RawCategory> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE categories
           SET name        = COALESCE(?2, name),
               description = COALESCE(?3, description),
               updated_at  = ?4
           WHERE id = ?1 AND deleted_at IS NULL",
          rusqlite::params![id, update.name, update.description, ts_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(Some(conn.query_row(
          &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?1"),
          rusqlite::params![id],
          RawCategory::from_row,
        )?))
      })
      .await
      .map_err(|e| {
        Error::unique(e, || format!("category name {:?}", name.unwrap_or_default()))
      })?;

    raw.map(RawCategory::into_category).transpose()
  }

  async fn delete_category(&self, id: i64) -> Result<bool> {
    let ts_str = encode_dt(now());

    let (deleted, detached) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let deleted = tx.execute(
          "UPDATE categories SET deleted_at = ?2, updated_at = ?2
           WHERE id = ?1 AND deleted_at IS NULL",
          rusqlite::params![id, ts_str],
        )?;
        if deleted == 0 {
          return Ok((false, 0));
        }
        let detached = tx.execute(
          "UPDATE pages SET category_id = NULL, updated_at = ?2
           WHERE category_id = ?1",
          rusqlite::params![id, ts_str],
        )?;
        tx.commit()?;
        Ok((true, detached))
      })
      .await?;

    if deleted {
      tracing::debug!(id, detached, "category soft-deleted");
    }
    Ok(deleted)
  }

  async fn category_name_exists(&self, name: &str) -> Result<bool> {
    let name = name.to_owned();

    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT 1 FROM categories WHERE name = ?1 AND deleted_at IS NULL",
                rusqlite::params![name],
                |_| Ok(true),
              )
              .optional()?
              .unwrap_or(false),
          )
        })
        .await?,
    )
  }
}
