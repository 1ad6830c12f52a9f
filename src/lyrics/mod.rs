//! Verse pagination for song lyrics.
//!
//! A verse is a contiguous block of lyrics delimited by a blank line
//! (two consecutive newline characters).

/// Return one page of verses from `lyrics`.
///
/// `verse` is the 1-based index of the page; `limit` is the number of
/// verses per page. The end of the page is clamped to the verse count,
/// and a page that starts past the last verse is empty.
///
/// Callers validate `verse >= 1` and `limit >= 1`; saturating arithmetic
/// keeps out-of-range values harmless regardless.
pub fn paginate_verses(lyrics: &str, verse: usize, limit: usize) -> Vec<String> {
    let verses: Vec<&str> = lyrics.split("\n\n").collect();

    let start = verse.saturating_sub(1).saturating_mul(limit);
    if start >= verses.len() {
        return Vec::new();
    }
    let end = start.saturating_add(limit).min(verses.len());

    verses[start..end].iter().map(|v| v.to_string()).collect()
}
