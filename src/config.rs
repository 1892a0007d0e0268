//! Configuration management for getunes.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. They are read exactly once, in `main`,
//! into a [`Config`] that is handed to every component that needs it; nothing
//! below this module looks at the environment.
//!
//! Precedence:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Defaults (where applicable)

use std::{env, fmt, path::PathBuf, str::FromStr, time::Duration};

use crate::{error::Error, spotify::RetryPolicy};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SCOPE: &str = "user-library-read user-library-modify playlist-read-private \
     playlist-modify-private user-read-recently-played user-top-read";

/// Returns the platform data directory used for `.env` and persisted data.
///
/// - Linux: `~/.local/share/getunes`
/// - macOS: `~/Library/Application Support/getunes`
/// - Windows: `%LOCALAPPDATA%/getunes`
pub fn default_data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("getunes");
    path
}

/// Loads environment variables from `<data dir>/.env` if the file exists.
///
/// A missing file is fine: every variable can also be set directly. A file
/// that exists but cannot be parsed is an error.
pub async fn load_env() -> Result<(), Error> {
    let path = default_data_dir().join(".env");
    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path)
        .map_err(|e| Error::Config(format!("cannot load {}: {}", path.display(), e)))
}

#[derive(Clone)]
pub struct Config {
    /// Base URL of the Web API (`SPOTIFY_API_URL`).
    pub api_url: String,
    /// Authorization endpoint users are redirected to (`SPOTIFY_API_AUTH_URL`).
    pub auth_url: String,
    /// Token exchange endpoint (`SPOTIFY_API_TOKEN_URL`).
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Must match the redirect URI registered for the client (`SPOTIFY_REDIRECT_URI`).
    pub redirect_uri: String,
    pub scope: String,
    /// Bind address of the local HTTP server (`SERVER_ADDRESS`).
    pub server_addr: String,
    /// Root of persisted users and libraries (`GETUNES_DATA_DIR`).
    pub data_dir: PathBuf,
    /// Identity used when a command does not name one (`GETUNES_IDENTITY`).
    pub default_identity: Option<String>,
    pub fetch_max_retries: u32,
    pub fetch_backoff: Duration,
    /// Upper bound on playlist-search rounds for the related strategy.
    pub max_search_iterations: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| Error::Config(format!("{} must be set", key)))
        };

        Ok(Self {
            api_url: get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            auth_url: get("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: get("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: get("SPOTIFY_REDIRECT_URI")
                .unwrap_or_else(|| "http://127.0.0.1:8888/callback".to_string()),
            scope: get("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            server_addr: get("SERVER_ADDRESS").unwrap_or_else(|| "127.0.0.1:8888".to_string()),
            data_dir: get("GETUNES_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_data_dir),
            default_identity: get("GETUNES_IDENTITY"),
            fetch_max_retries: parse_or(
                get("GETUNES_FETCH_MAX_RETRIES"),
                "GETUNES_FETCH_MAX_RETRIES",
                5,
            )?,
            fetch_backoff: Duration::from_millis(parse_or(
                get("GETUNES_FETCH_BACKOFF_MS"),
                "GETUNES_FETCH_BACKOFF_MS",
                500,
            )?),
            max_search_iterations: parse_or(
                get("GETUNES_MAX_SEARCH_ITERATIONS"),
                "GETUNES_MAX_SEARCH_ITERATIONS",
                20,
            )?,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.fetch_max_retries,
            base_delay: self.fetch_backoff,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &REDACTED)
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .field("server_addr", &self.server_addr)
            .field("data_dir", &self.data_dir)
            .field("default_identity", &self.default_identity)
            .field("fetch_max_retries", &self.fetch_max_retries)
            .field("fetch_backoff", &self.fetch_backoff)
            .field("max_search_iterations", &self.max_search_iterations)
            .finish()
    }
}

/// Stand-in printed for secrets in `Debug` output.
pub(crate) const REDACTED: &str = "<redacted>";

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T, Error> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{} has an invalid value: {}", key, v))),
        None => Ok(default),
    }
}
