//! Core data model for the songs catalog.
//!
//! Defines the persisted [`Song`] entity plus the request/response payloads
//! that travel over the HTTP boundary: [`NewSong`] for creation,
//! [`SongUpdate`] for partial updates, and [`SongDetails`] for the
//! enrichment data returned by the external song info service.
//!
//! # Database Schema
//!
//! [`Song`] maps to the `songs` table:
//! `id, group_name, song_name, lyrics, release_date, link`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted catalog entry.
///
/// JSON field names follow the public API (`group`, `song`, `releaseDate`,
/// `text`, `link`), which differ from the column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Song {
    /// Database ID, assigned by storage on insert and immutable thereafter.
    #[serde(default)]
    pub id: i64,
    /// Performing group/artist name.
    #[serde(rename = "group")]
    pub group_name: String,
    /// Song title.
    #[serde(rename = "song")]
    pub song_name: String,
    /// Release date as free-form text; the format is not validated here.
    #[serde(rename = "releaseDate", default)]
    pub release_date: String,
    /// Full lyrics; verses are separated by a blank line ("\n\n").
    #[serde(rename = "text", default)]
    pub lyrics: String,
    /// External media URL.
    #[serde(default)]
    pub link: String,
}

/// Enrichment payload returned by the external song info service.
///
/// Never persisted on its own; merged into a [`Song`] before creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongDetails {
    #[serde(rename = "releaseDate", default)]
    pub release_date: String,
    #[serde(rename = "text", default)]
    pub lyrics: String,
    #[serde(default)]
    pub link: String,
}

/// Creation request body. Remaining fields come from enrichment.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSong {
    #[serde(rename = "group")]
    pub group_name: String,
    #[serde(rename = "song")]
    pub song_name: String,
}

impl NewSong {
    /// Build the full [`Song`] to persist from this request plus the
    /// enrichment details. The id is left at 0; storage assigns it.
    pub fn into_song(self, details: &SongDetails) -> Song {
        Song {
            id: 0,
            group_name: self.group_name,
            song_name: self.song_name,
            release_date: details.release_date.clone(),
            lyrics: details.lyrics.clone(),
            link: details.link.clone(),
        }
    }
}

/// Partial update payload: absent fields (and empty strings, after
/// [`SongUpdate::normalize`]) mean "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SongUpdate {
    #[serde(rename = "group")]
    pub group_name: Option<String>,
    #[serde(rename = "song")]
    pub song_name: Option<String>,
    #[serde(rename = "releaseDate")]
    pub release_date: Option<String>,
    #[serde(rename = "text")]
    pub lyrics: Option<String>,
    pub link: Option<String>,
}

impl SongUpdate {
    /// Collapse empty strings to `None` so callers sending `"group": ""`
    /// get the same "no change" semantics as omitting the field.
    pub fn normalize(mut self) -> Self {
        fn drop_empty(field: &mut Option<String>) {
            if field.as_deref() == Some("") {
                *field = None;
            }
        }
        drop_empty(&mut self.group_name);
        drop_empty(&mut self.song_name);
        drop_empty(&mut self.release_date);
        drop_empty(&mut self.lyrics);
        drop_empty(&mut self.link);
        self
    }

    /// Overlay the supplied fields onto `song`, preserving the rest.
    /// Mirrors the COALESCE semantics of the SQL update statement.
    pub fn apply(&self, song: &mut Song) {
        if let Some(group) = &self.group_name {
            song.group_name = group.clone();
        }
        if let Some(name) = &self.song_name {
            song.song_name = name.clone();
        }
        if let Some(date) = &self.release_date {
            song.release_date = date.clone();
        }
        if let Some(lyrics) = &self.lyrics {
            song.lyrics = lyrics.clone();
        }
        if let Some(link) = &self.link {
            song.link = link.clone();
        }
    }
}
