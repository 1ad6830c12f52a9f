//! Response shapes for the external song info service.
//!
//! These mirror the upstream API exactly; they are converted into our
//! domain [`SongDetails`] so upstream changes don't ripple through the
//! codebase.

use serde::Deserialize;

use crate::model::SongDetails;

/// Body of a successful `GET /info` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SongDetailsResponse {
    #[serde(rename = "releaseDate", default)]
    pub release_date: String,
    #[serde(rename = "text", default)]
    pub text: String,
    #[serde(default)]
    pub link: String,
}

impl From<SongDetailsResponse> for SongDetails {
    fn from(dto: SongDetailsResponse) -> Self {
        SongDetails {
            release_date: dto.release_date,
            lyrics: dto.text,
            link: dto.link,
        }
    }
}
