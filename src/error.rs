//! Application-wide error types.
//!
//! A single error enum covers the whole request path: parameter validation,
//! storage failures, and the external song info service. Each variant knows
//! the HTTP status it maps to at the boundary, so the HTTP adapter stays a
//! dumb translation layer.
//!
//! # Design
//!
//! - [`Error::NotFound`] is a distinct variant (mapped to 404), never folded
//!   into generic storage failures.
//! - Upstream failures keep their shape: a 400 from the info service stays a
//!   400 for the caller, other upstream statuses surface as-is when they are
//!   valid response codes, and transport-level failures become 502.

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad or missing path/query parameter.
    #[error("invalid {0} parameter")]
    InvalidArgument(String),

    /// Malformed request body.
    #[error("invalid request body: {0}")]
    BadBody(String),

    /// No row matched the requested id.
    #[error("no song found with id {0}")]
    NotFound(i64),

    /// Storage/driver error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The song info service rejected our request (HTTP 400).
    #[error("incorrect request to song info service: {0}")]
    UpstreamInvalidRequest(String),

    /// The song info service answered with an unexpected status code.
    #[error("unexpected response code from song info service: {0}")]
    UpstreamStatus(u16),

    /// Could not reach the song info service at all.
    #[error("song info service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The song info service answered 200 with a body we cannot decode.
    #[error("failed to decode song info response: {0}")]
    UpstreamDecode(String),
}

impl Error {
    /// Create an invalid-argument error for the named parameter.
    pub fn invalid_argument(name: impl Into<String>) -> Self {
        Self::InvalidArgument(name.into())
    }

    /// Create a bad-body error.
    pub fn bad_body(message: impl Into<String>) -> Self {
        Self::BadBody(message.into())
    }

    /// HTTP status code this error surfaces as.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidArgument(_) | Self::BadBody(_) => 400,
            Self::NotFound(_) => 404,
            Self::Database(_) => 500,
            Self::UpstreamInvalidRequest(_) => 400,
            // Pass the upstream status through when it is a real response
            // code; anything out of range degrades to a bad gateway.
            Self::UpstreamStatus(code) if (100..=599).contains(code) => *code,
            Self::UpstreamStatus(_) => 502,
            Self::UpstreamUnavailable(_) => 502,
            Self::UpstreamDecode(_) => 500,
        }
    }
}
