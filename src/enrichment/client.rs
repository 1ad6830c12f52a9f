//! HTTP client for the external song info service.
//!
//! Issues `GET {base}/info?group=..&song=..` and maps the response onto the
//! application error taxonomy: a 400 from the upstream stays caller-facing,
//! other non-2xx statuses are carried through, and transport failures
//! become "unavailable".

use crate::error::{Error, Result};
use crate::model::SongDetails;

use super::dto;

/// Song info API client.
pub struct SongInfoClient {
    http_client: reqwest::Client,
    base_url: String,
}

const USER_AGENT: &str = concat!("SongLibrary/", env!("CARGO_PKG_VERSION"));

impl SongInfoClient {
    /// Create a new client for the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Fetch release date, lyrics, and link for a (group, song) pair.
    pub async fn fetch_details(&self, group: &str, song: &str) -> Result<SongDetails> {
        let url = format!(
            "{}/info?group={}&song={}",
            self.base_url,
            urlencoding::encode(group),
            urlencoding::encode(song)
        );

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::BAD_REQUEST {
            return Err(Error::UpstreamInvalidRequest(format!("HTTP {status}")));
        }

        if !status.is_success() {
            return Err(Error::UpstreamStatus(status.as_u16()));
        }

        let dto: dto::SongDetailsResponse = response
            .json()
            .await
            .map_err(|e| Error::UpstreamDecode(e.to_string()))?;

        Ok(dto.into())
    }
}
