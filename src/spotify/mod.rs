//! # Spotify Integration Module
//!
//! HTTP client for the parts of the Spotify Web API the recommendation engine
//! and its surrounding workflows consume.
//!
//! ## Architecture
//!
//! ```text
//! Recommendation Engine / CLI / HTTP handlers
//!          ↓
//! Catalog trait (search, albums, playlists, tracks, recommendations)
//!          ↓
//! SpotifyClient ── RetryPolicy ── fetch_all (cursor pagination)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Modules
//!
//! - [`auth`] - authorization-code exchange, refresh and the per-identity
//!   [`auth::TokenProvider`]
//! - [`catalog`] - the read-only [`catalog::Catalog`] seam used by the engine
//! - [`pagination`] - the paginated fetcher and the retry policy every call
//!   goes through
//! - [`playlist`] - playlist creation and track insertion
//! - [`saved`] - checking, saving and removing tracks in the user's library
//! - [`user`] - the current user's profile, playlists, saved tracks,
//!   listening history and top items
//!
//! ## Rate limiting
//!
//! Every request, paginated or not, is issued through [`RetryPolicy::run`]:
//! a `429` sleeps for exactly the advertised `retry-after` seconds and
//! reissues the same request, transient failures back off exponentially and
//! eventually surface as [`FetchError::Exhausted`](crate::error::FetchError).

pub mod auth;
pub mod catalog;
pub mod models;
pub mod pagination;
pub mod playlist;
pub mod saved;
pub mod user;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url, header::ACCEPT};
use serde::{
    Serialize,
    de::{DeserializeOwned, IgnoredAny},
};

pub use pagination::{Attempt, Page, PageSource, RetryPolicy, fetch_all};

use crate::error::FetchError;
use models::Paging;

/// Authenticated access to the Web API rooted at `api_url`.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    policy: RetryPolicy,
}

impl SpotifyClient {
    pub fn new(api_url: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Builds an absolute endpoint URL with url-encoded query parameters.
    pub fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<String, FetchError> {
        let base = format!("{}{}", self.api_url, path);
        let parsed = if params.is_empty() {
            Url::parse(&base)
        } else {
            Url::parse_with_params(&base, params)
        };

        parsed
            .map(|u| u.to_string())
            .map_err(|e| FetchError::Parse {
                url: base,
                message: e.to_string(),
            })
    }

    /// Issues exactly one request and classifies the response.
    async fn attempt<T, B>(
        &self,
        method: Method,
        url: &str,
        token: &str,
        body: Option<&B>,
    ) -> Result<Attempt<T>, FetchError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(token)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let wait =
                pagination::retry_after(response.headers()).unwrap_or(self.policy.base_delay);
            return Ok(Attempt::RetryAfter(wait));
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(FetchError::Unauthorized {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            "null"
        } else {
            text.as_str()
        };
        serde_json::from_str(body)
            .map(Attempt::Done)
            .map_err(|e| FetchError::Parse {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    pub async fn get<T: DeserializeOwned>(&self, url: &str, token: &str) -> Result<T, FetchError> {
        self.policy
            .run(|| self.attempt::<T, ()>(Method::GET, url, token, None))
            .await
    }

    pub async fn send<T, B>(
        &self,
        method: Method,
        url: &str,
        token: &str,
        body: &B,
    ) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.policy
            .run(|| self.attempt::<T, B>(method.clone(), url, token, Some(body)))
            .await
    }

    /// Issues a request whose response body, if any, is of no interest.
    pub async fn execute(&self, method: Method, url: &str, token: &str) -> Result<(), FetchError> {
        self.policy
            .run(|| self.attempt::<IgnoredAny, ()>(method.clone(), url, token, None))
            .await
            .map(|_| ())
    }

    /// Drains every page of a list endpoint whose items are `W` on the wire.
    pub async fn get_all<W>(&self, url: &str, token: &str) -> Result<Vec<W>, FetchError>
    where
        W: DeserializeOwned + Send + 'static,
    {
        let pages = AuthorizedPages {
            client: self,
            token,
        };
        fetch_all(&pages, url, &self.policy).await
    }
}

/// Page source bound to one bearer token.
struct AuthorizedPages<'a> {
    client: &'a SpotifyClient,
    token: &'a str,
}

#[async_trait]
impl<'a, W> PageSource<W> for AuthorizedPages<'a>
where
    W: DeserializeOwned + Send + 'static,
{
    async fn fetch_page(&self, url: &str) -> Result<Attempt<Page<W>>, FetchError> {
        let attempt = self
            .client
            .attempt::<Paging<W>, ()>(Method::GET, url, self.token, None)
            .await?;

        Ok(match attempt {
            Attempt::Done(paging) => Attempt::Done(Page {
                received: paging.items.len(),
                next: paging.next.clone(),
                total: paging.total,
                items: paging.into_items(),
            }),
            Attempt::RetryAfter(wait) => Attempt::RetryAfter(wait),
        })
    }
}
