//! Error taxonomy shared by the engine, the Spotify client and the stores.
//!
//! There is no rate-limit variant: a `429` is an [`Attempt::RetryAfter`]
//! outcome that the retry driver consumes, it never reaches a caller. An empty
//! candidate list is likewise not an error.
//!
//! [`Attempt::RetryAfter`]: crate::spotify::Attempt::RetryAfter

use thiserror::Error;

/// Failure to obtain a bearer token for an identity. Fatal to the request.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no stored user for identity {0}")]
    UnknownIdentity(String),

    #[error("identity {0} has no refresh token")]
    MissingRefreshToken(String),

    #[error("token exchange failed: {0}")]
    Exchange(String),

    #[error("token endpoint rejected the request with status {status}")]
    Rejected { status: u16 },

    #[error("cannot read user store: {0}")]
    Store(String),
}

/// Failure of a single outbound Web API call.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("malformed response from {url}: {message}")]
    Parse { url: String, message: String },

    #[error("access token rejected by {url}")]
    Unauthorized { url: String },

    #[error("giving up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Network(_) | FetchError::Parse { .. } => true,
            FetchError::Status { status, .. } => *status >= 500 || *status == 408,
            FetchError::Unauthorized { .. } | FetchError::Exhausted { .. } => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        if err.is_decode() {
            FetchError::Parse {
                url,
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            FetchError::Status {
                status: status.as_u16(),
                url,
            }
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("server error: {0}")]
    Server(String),
}
