//! Test fixtures shared across module tests.

use crate::model::Song;

/// Build a song with the given id, group, and title; the remaining
/// fields get recognizable defaults. Customize with struct update syntax:
///
/// ```ignore
/// let song = Song { lyrics: "A\n\nB".to_string(), ..sample_song(1, "Muse", "Uprising") };
/// ```
pub fn sample_song(id: i64, group: &str, name: &str) -> Song {
    Song {
        id,
        group_name: group.to_string(),
        song_name: name.to_string(),
        release_date: "01.01.2000".to_string(),
        lyrics: "first verse\n\nsecond verse".to_string(),
        link: format!("https://example.com/{id}"),
    }
}
