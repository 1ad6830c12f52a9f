//! Song service: the layer between the HTTP boundary and storage.
//!
//! Normalizes caller-supplied pagination parameters, wraps search filters
//! into `LIKE` patterns, and collapses empty update fields before handing
//! off to the [`SongStore`]. Everything else is delegation.

use std::sync::Arc;

use crate::db::SongStore;
use crate::error::Result;
use crate::model::{Song, SongUpdate};

/// Page number used when the caller supplies none (or garbage).
pub const DEFAULT_PAGE: i64 = 1;
/// Rows per page used when the caller supplies none (or garbage).
pub const DEFAULT_LIMIT: i64 = 10;

pub struct SongService {
    store: Arc<dyn SongStore>,
}

impl SongService {
    pub fn new(store: Arc<dyn SongStore>) -> Self {
        Self { store }
    }

    /// List songs whose group/name contain the given substrings.
    ///
    /// `page` and `limit` are the raw query-string values; unparsable or
    /// non-positive values fall back to the defaults. Returns `limit` rows
    /// starting at `(page - 1) * limit`.
    pub async fn get_songs(
        &self,
        group: &str,
        name: &str,
        page: Option<&str>,
        limit: Option<&str>,
    ) -> Result<Vec<Song>> {
        let page = parse_or_default(page, DEFAULT_PAGE);
        let limit = parse_or_default(limit, DEFAULT_LIMIT);
        // Saturate: an absurd page must clamp to "past the end", not
        // overflow into a panic or a negative offset.
        let offset = page.saturating_sub(1).saturating_mul(limit);

        self.store
            .list_songs(&format!("%{group}%"), &format!("%{name}%"), limit, offset)
            .await
    }

    /// Fetch a single song; surfaces `NotFound`.
    pub async fn get_song_by_id(&self, id: i64) -> Result<Song> {
        self.store.get_song(id).await
    }

    /// Delete by id; surfaces `NotFound`.
    pub async fn delete_song_by_id(&self, id: i64) -> Result<()> {
        self.store.delete_song(id).await
    }

    /// Partially update a song: only supplied, non-empty fields overwrite
    /// the stored values. `NotFound` when the id does not exist.
    pub async fn update_song_by_id(&self, id: i64, update: SongUpdate) -> Result<()> {
        let update = update.normalize();
        self.store.update_song(id, &update).await
    }

    /// Persist a fully-enriched song; returns the storage-assigned id.
    pub async fn post_song(&self, song: &Song) -> Result<i64> {
        self.store.create_song(song).await
    }
}

fn parse_or_default(value: Option<&str>, default: i64) -> i64 {
    match value.and_then(|v| v.parse::<i64>().ok()) {
        Some(n) if n > 0 => n,
        _ => default,
    }
}
