//! Persistence adapter for the songs catalog.
//!
//! Uses SQLx with PostgreSQL. All statements are parameterized; substring
//! search uses `LIKE` pattern matching since the dataset and query needs
//! are simple. The adapter is reached through the [`SongStore`] trait so
//! the service layer can be tested against an in-memory double.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::error::{Error, Result};
use crate::model::{Song, SongUpdate};

/// Initialize the database connection pool and run migrations.
///
/// # Errors
///
/// Returns an error if the connection cannot be established or a
/// migration fails.
pub async fn init_db(db_url: &str) -> std::result::Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Storage operations over the `songs` table.
///
/// Implemented by [`PgSongStore`] in production; tests substitute
/// [`mocks::MockSongStore`].
#[async_trait]
pub trait SongStore: Send + Sync {
    /// List songs whose group and name match the given `LIKE` patterns,
    /// ordered by id. Returns an empty vec (not an error) when nothing
    /// matches.
    async fn list_songs(
        &self,
        group_pattern: &str,
        name_pattern: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Song>>;

    /// Fetch a single song. `NotFound` when no row has that id.
    async fn get_song(&self, id: i64) -> Result<Song>;

    /// Insert a new row; storage assigns the id, which is returned.
    async fn create_song(&self, song: &Song) -> Result<i64>;

    /// Apply a partial update as a single atomic statement.
    /// `NotFound` when no row matched.
    async fn update_song(&self, id: i64, update: &SongUpdate) -> Result<()>;

    /// Delete by id. `NotFound` when no row matched.
    async fn delete_song(&self, id: i64) -> Result<()>;
}

/// PostgreSQL-backed [`SongStore`].
pub struct PgSongStore {
    pool: PgPool,
}

impl PgSongStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SongStore for PgSongStore {
    async fn list_songs(
        &self,
        group_pattern: &str,
        name_pattern: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Song>> {
        let songs = sqlx::query_as::<_, Song>(
            r#"
            SELECT id, group_name, song_name, release_date, lyrics, link
            FROM songs
            WHERE group_name LIKE $1 AND song_name LIKE $2
            ORDER BY id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(group_pattern)
        .bind(name_pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(songs)
    }

    async fn get_song(&self, id: i64) -> Result<Song> {
        sqlx::query_as::<_, Song>(
            r#"
            SELECT id, group_name, song_name, release_date, lyrics, link
            FROM songs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(Error::NotFound(id))
    }

    async fn create_song(&self, song: &Song) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO songs (group_name, song_name, lyrics, release_date, link)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&song.group_name)
        .bind(&song.song_name)
        .bind(&song.lyrics)
        .bind(&song.release_date)
        .bind(&song.link)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    async fn update_song(&self, id: i64, update: &SongUpdate) -> Result<()> {
        // Single statement with per-field COALESCE: NULL binds leave the
        // stored value untouched, so concurrent partial updates cannot
        // lose each other's fields.
        let result = sqlx::query(
            r#"
            UPDATE songs
            SET group_name   = COALESCE($2, group_name),
                song_name    = COALESCE($3, song_name),
                lyrics       = COALESCE($4, lyrics),
                release_date = COALESCE($5, release_date),
                link         = COALESCE($6, link)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&update.group_name)
        .bind(&update.song_name)
        .bind(&update.lyrics)
        .bind(&update.release_date)
        .bind(&update.link)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(id));
        }
        Ok(())
    }

    async fn delete_song(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(id));
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::mocks::MockSongStore;
    use super::*;
    use crate::test_utils::sample_song;

    #[tokio::test]
    async fn test_list_filters_by_substring() {
        let store = MockSongStore::with_songs(vec![
            sample_song(1, "Muse", "Uprising"),
            sample_song(2, "Amused", "Something"),
            sample_song(3, "Queen", "Innuendo"),
        ]);

        let songs = store.list_songs("%Muse%", "%%", 10, 0).await.unwrap();
        assert_eq!(songs.len(), 2);
        assert!(songs.iter().all(|s| s.group_name.contains("Muse")));

        let songs = store.list_songs("%%", "%Inn%", 10, 0).await.unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].song_name, "Innuendo");
    }

    #[tokio::test]
    async fn test_list_empty_filters_return_all_paginated() {
        let store = MockSongStore::with_songs(vec![
            sample_song(1, "A", "one"),
            sample_song(2, "B", "two"),
            sample_song(3, "C", "three"),
        ]);

        let page = store.list_songs("%%", "%%", 2, 0).await.unwrap();
        assert_eq!(page.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 2]);

        let page = store.list_songs("%%", "%%", 2, 2).await.unwrap();
        assert_eq!(page.iter().map(|s| s.id).collect::<Vec<_>>(), vec![3]);

        let page = store.list_songs("%%", "%%", 2, 4).await.unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_get_song_not_found() {
        let store = MockSongStore::new();
        let err = store.get_song(99).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(99)));
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = MockSongStore::new();
        let id1 = store
            .create_song(&sample_song(0, "Muse", "Uprising"))
            .await
            .unwrap();
        let id2 = store
            .create_song(&sample_song(0, "Muse", "Starlight"))
            .await
            .unwrap();
        assert_eq!(id1, 1);
        assert_eq!(id2, 2);
        assert_eq!(store.get_song(id2).await.unwrap().song_name, "Starlight");
    }

    #[tokio::test]
    async fn test_update_missing_id_is_not_found() {
        let store = MockSongStore::new();
        let update = SongUpdate {
            song_name: Some("x".to_string()),
            ..SongUpdate::default()
        };
        let err = store.update_song(5, &update).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(5)));
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_not_found() {
        let store = MockSongStore::with_songs(vec![sample_song(1, "Muse", "Uprising")]);
        store.delete_song(1).await.unwrap();
        let err = store.delete_song(1).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(1)));
    }
}
