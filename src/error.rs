use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the WeatherKit client.
#[derive(Debug, Error)]
pub enum Error {
    /// A required configuration value is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The private key file could not be read.
    #[error("failed to read private key {}: {source}", path.display())]
    Credential {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The private key could not be used to produce an ES256 signature.
    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// The token held by the client is past its expiry time.
    #[error("token has expired (expiry time {expired_at})")]
    TokenExpired { expired_at: i64 },

    /// Request parameters were rejected before any network call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The API answered successfully but the payload is not what we expect.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The API answered with a non-success status.
    #[error("API request failed: HTTP {status} for url ({url})\n{body}")]
    Http { status: u16, url: String, body: String },

    /// The request never produced an HTTP status (connect, DNS, timeout).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(Box::new(err))
    }
}
