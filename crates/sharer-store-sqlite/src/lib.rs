//! SQLite backend for the sharer page and category stores.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Rows are soft-deleted; uniqueness of
//! slugs and category names is enforced by partial indexes over live rows.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
