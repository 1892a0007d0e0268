use std::{collections::HashMap, fmt, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Url};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    config::{Config, REDACTED},
    error::AuthError,
    management::UserStore,
    spotify::models::TokenResponse,
    types::Token,
};

/// Seconds before expiry at which a cached access token is considered stale.
const EXPIRY_BUFFER_SECS: u64 = 240;

/// Supplies a valid bearer token for an identity.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self, identity: &str) -> Result<String, AuthError>;
}

/// Client for the Spotify accounts service (authorization-code grant).
#[derive(Clone)]
pub struct SpotifyAuth {
    http: Client,
    auth_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scope: String,
}

impl SpotifyAuth {
    pub fn from_config(config: &Config) -> Self {
        Self {
            http: Client::new(),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            scope: config.scope.clone(),
        }
    }

    /// URL the user is sent to in order to grant access.
    pub fn authorize_url(&self, state: &str) -> Result<String, AuthError> {
        Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", self.scope.as_str()),
                ("state", state),
            ],
        )
        .map(|u| u.to_string())
        .map_err(|e| AuthError::Exchange(e.to_string()))
    }

    pub async fn exchange_code(&self, code: &str) -> Result<Token, AuthError> {
        self.request_token(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ])
        .await
    }

    /// Exchanges a refresh token for a fresh access token. When the accounts
    /// service does not rotate the refresh token the old one is kept.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Token, AuthError> {
        let mut token = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        if token.refresh_token.is_empty() {
            token.refresh_token = refresh_token.to_string();
        }
        Ok(token)
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<Token, AuthError> {
        let res = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(form)
            .send()
            .await
            .map_err(|e| AuthError::Exchange(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
            });
        }

        let json: TokenResponse = res
            .json()
            .await
            .map_err(|e| AuthError::Exchange(e.to_string()))?;

        Ok(Token {
            access_token: json.access_token,
            refresh_token: json.refresh_token.unwrap_or_default(),
            scope: json.scope.unwrap_or_default(),
            expires_in: json.expires_in.unwrap_or(3600),
            obtained_at: Utc::now().timestamp() as u64,
        })
    }
}

impl fmt::Debug for SpotifyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyAuth")
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &REDACTED)
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

pub fn is_expired(token: &Token, now: u64) -> bool {
    now + EXPIRY_BUFFER_SECS >= token.obtained_at + token.expires_in
}

/// Resolves identities to access tokens through the stored refresh token,
/// caching access tokens in memory until shortly before they expire.
pub struct SpotifyTokenProvider {
    auth: Arc<SpotifyAuth>,
    users: Arc<dyn UserStore>,
    cache: Mutex<HashMap<String, Token>>,
}

impl SpotifyTokenProvider {
    pub fn new(auth: Arc<SpotifyAuth>, users: Arc<dyn UserStore>) -> Self {
        Self {
            auth,
            users,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Seeds the cache with a token obtained elsewhere, e.g. right after login.
    pub async fn remember(&self, identity: &str, token: Token) {
        self.cache.lock().await.insert(identity.to_string(), token);
    }
}

#[async_trait]
impl TokenProvider for SpotifyTokenProvider {
    async fn access_token(&self, identity: &str) -> Result<String, AuthError> {
        let now = Utc::now().timestamp() as u64;
        {
            let cache = self.cache.lock().await;
            if let Some(token) = cache.get(identity) {
                if !is_expired(token, now) {
                    debug!(identity, "using cached access token");
                    return Ok(token.access_token.clone());
                }
            }
        }

        let mut user = self
            .users
            .get_user(identity)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?
            .ok_or_else(|| AuthError::UnknownIdentity(identity.to_string()))?;

        let refresh_token = user
            .refresh_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::MissingRefreshToken(identity.to_string()))?;

        let token = self.auth.refresh(&refresh_token).await?;
        info!(identity, "access token refreshed");

        if token.refresh_token != refresh_token {
            user.refresh_token = Some(token.refresh_token.clone());
            if let Err(e) = self.users.put_user(&user).await {
                warn!(identity, error = %e, "cannot persist rotated refresh token");
            }
        }

        let access_token = token.access_token.clone();
        self.cache.lock().await.insert(identity.to_string(), token);
        Ok(access_token)
    }
}
