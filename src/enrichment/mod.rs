//! Enrichment of new songs from the external song info service.
//!
//! Follows a separation between:
//! - **API DTOs** (`dto.rs`) - exact response shapes of the upstream API
//! - **Client** (`client.rs`) - the reqwest HTTP client with error mapping
//! - **Trait** ([`SongInfoApi`]) - the seam that lets tests substitute a
//!   mock for the real client
//!
//! The handler flow is: decode the creation request, fetch details from
//! the upstream, merge them into the song, persist. An upstream failure
//! aborts before any database write.

pub mod client;
pub mod dto;

pub use client::SongInfoClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::SongDetails;

/// Lookup of song details from the external metadata provider.
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait SongInfoApi: Send + Sync {
    /// Fetch release date, lyrics, and link for a (group, song) pair.
    async fn fetch_details(&self, group: &str, song: &str) -> Result<SongDetails>;
}

#[async_trait]
impl SongInfoApi for SongInfoClient {
    async fn fetch_details(&self, group: &str, song: &str) -> Result<SongDetails> {
        self.fetch_details(group, song).await
    }
}

/// Mock song info client for testing.
#[cfg(test)]
pub mod mocks {
    use super::*;
    use crate::error::Error;

    /// Canned upstream outcome.
    pub enum MockOutcome {
        Details(SongDetails),
        InvalidRequest,
        Status(u16),
        Unavailable,
    }

    /// Mock client that returns a predefined outcome on every call.
    pub struct MockSongInfo {
        pub outcome: MockOutcome,
    }

    impl MockSongInfo {
        pub fn with_details(details: SongDetails) -> Self {
            Self {
                outcome: MockOutcome::Details(details),
            }
        }

        pub fn invalid_request() -> Self {
            Self {
                outcome: MockOutcome::InvalidRequest,
            }
        }

        pub fn with_status(status: u16) -> Self {
            Self {
                outcome: MockOutcome::Status(status),
            }
        }

        pub fn unavailable() -> Self {
            Self {
                outcome: MockOutcome::Unavailable,
            }
        }
    }

    #[async_trait]
    impl SongInfoApi for MockSongInfo {
        async fn fetch_details(&self, _group: &str, _song: &str) -> Result<SongDetails> {
            match &self.outcome {
                MockOutcome::Details(details) => Ok(details.clone()),
                MockOutcome::InvalidRequest => {
                    Err(Error::UpstreamInvalidRequest("HTTP 400".to_string()))
                }
                MockOutcome::Status(code) => Err(Error::UpstreamStatus(*code)),
                MockOutcome::Unavailable => {
                    Err(Error::UpstreamUnavailable("connection refused".to_string()))
                }
            }
        }
    }
}
