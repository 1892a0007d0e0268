use std::{collections::HashMap, net::SocketAddr, str::FromStr, sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::{
    net::TcpListener,
    sync::{Mutex, oneshot},
};
use tracing::{debug, info};

use crate::{
    Res, api,
    app::App,
    error::{AuthError, Error},
    types::{LoginOutcome, PendingAuth},
    utils,
};

/// Logins whose callback has not arrived within this window are forgotten.
const LOGIN_TTL: Duration = Duration::from_secs(600);

/// State shared by every handler.
#[derive(Clone)]
pub struct ServerState {
    pub app: Arc<App>,
    /// Logins started by `getunes auth` or `/login`, keyed by `state` nonce.
    pub pending: Arc<Mutex<HashMap<String, PendingAuth>>>,
    /// Import the library of first-time users in a background task.
    pub import_new_users: bool,
}

impl ServerState {
    pub fn new(app: Arc<App>, import_new_users: bool) -> Self {
        Self {
            app,
            pending: Arc::new(Mutex::new(HashMap::new())),
            import_new_users,
        }
    }

    /// Registers a new login and returns the consent URL to send the user to.
    pub async fn begin_login(
        &self,
        notify: Option<oneshot::Sender<LoginOutcome>>,
    ) -> Result<String, AuthError> {
        let nonce = utils::generate_state();
        let url = self.app.auth.authorize_url(&nonce)?;

        let mut pending = self.pending.lock().await;
        pending.retain(|_, login| login.started.elapsed() < LOGIN_TTL);
        pending.insert(nonce, PendingAuth::new(notify));
        debug!(pending = pending.len(), "login started");

        Ok(url)
    }

    /// Removes and returns the login started with `nonce`.
    pub async fn take_login(&self, nonce: &str) -> Option<PendingAuth> {
        self.pending.lock().await.remove(nonce)
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/access-token", get(api::access_token))
        .route("/search", get(api::search))
        .route("/playlist", post(api::playlist))
        .route("/user/recent", get(api::recent_tracks))
        .route("/user/favorites", get(api::favorites))
        .route("/user/playlists/getunes", get(api::getunes_playlists))
        .route("/track/is-saved", post(api::tracks_saved))
        .route("/track/save", post(api::save_tracks))
        .route("/track/remove", post(api::remove_tracks))
        .with_state(state)
}

pub async fn start_api_server(state: ServerState) -> Res<()> {
    let addr = SocketAddr::from_str(&state.app.config.server_addr).map_err(|e| {
        Error::Config(format!(
            "invalid server address {}: {}",
            state.app.config.server_addr, e
        ))
    })?;

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Server(format!("cannot bind {}: {}", addr, e)))?;
    info!(%addr, "listening");

    serve(listener, state).await
}

/// Serves the router on an already bound listener.
pub async fn serve(listener: TcpListener, state: ServerState) -> Res<()> {
    axum::serve(listener, router(state))
        .await
        .map_err(|e| Error::Server(format!("server stopped: {}", e)))
}
