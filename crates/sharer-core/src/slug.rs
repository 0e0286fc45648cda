//! Slug generation with bounded collision retries.
//!
//! A slug is 8 characters drawn uniformly, with replacement, from
//! `[a-zA-Z0-9]`. Each candidate is checked against the store; a collision
//! triggers a fresh draw, up to [`MAX_SLUG_ATTEMPTS`] times.
//!
//! The existence check and the later insert are not atomic. Two concurrent
//! creations that draw the same candidate can both pass the check; the
//! store's unique index rejects the second insert, which surfaces as a
//! storage error.

use rand::{Rng as _, distr::Alphanumeric};
use tokio_util::sync::CancellationToken;

use crate::{Error, Result, store::PageStore};

pub const SLUG_LEN: usize = 8;
pub const MAX_SLUG_ATTEMPTS: u32 = 10;

/// `true` if `s` has the shape of a generated slug.
pub fn is_valid_slug(s: &str) -> bool {
  s.len() == SLUG_LEN && s.bytes().all(|b| b.is_ascii_alphanumeric())
}

// ─── Sources ─────────────────────────────────────────────────────────────────

/// Produces slug candidates. Swappable so tests can force collisions.
pub trait SlugSource: Send + Sync {
  fn draw(&self) -> String;
}

/// Draws from the thread-local CSPRNG, which is seeded once from the OS and
/// never reseeded per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSlugs;

impl SlugSource for RandomSlugs {
  fn draw(&self) -> String {
    rand::rng()
      .sample_iter(&Alphanumeric)
      .take(SLUG_LEN)
      .map(char::from)
      .collect()
  }
}

// ─── Generator ───────────────────────────────────────────────────────────────

/// Draw candidates from `source` until one is unused in `store`.
///
/// `cancel` is checked before every attempt. Store errors abort the loop
/// immediately; only collisions are retried.
pub async fn generate_unique<S>(
  store: &S,
  source: &dyn SlugSource,
  cancel: &CancellationToken,
) -> Result<String>
where
  S: PageStore,
{
  for attempt in 1..=MAX_SLUG_ATTEMPTS {
    if cancel.is_cancelled() {
      return Err(Error::Cancelled);
    }

    let candidate = source.draw();
    let taken = store.slug_exists(&candidate).await.map_err(Error::store)?;
    if !taken {
      return Ok(candidate);
    }
    tracing::debug!(attempt, slug = %candidate, "slug collision, redrawing");
  }

  tracing::warn!(attempts = MAX_SLUG_ATTEMPTS, "slug space exhausted");
  Err(Error::ExhaustedRetries { attempts: MAX_SLUG_ATTEMPTS })
}
