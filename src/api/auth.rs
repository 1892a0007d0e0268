use axum::{
    Json,
    extract::{Query, State},
    response::{Html, Redirect},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{api::ApiError, server::ServerState, types::LoginOutcome};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Redirects the browser to the Spotify consent page.
pub async fn login(State(state): State<ServerState>) -> Result<Redirect, ApiError> {
    let url = state.begin_login(None).await?;
    Ok(Redirect::temporary(&url))
}

/// Completes the login started with the returned `state`. When the server
/// imports new users, a user seen for the first time gets the library
/// imported in the background.
pub async fn callback(
    Query(params): Query<CallbackParams>,
    State(state): State<ServerState>,
) -> Html<&'static str> {
    let Some(nonce) = params.state else {
        return Html("<h4>Missing state.</h4>");
    };
    let Some(login) = state.take_login(&nonce).await else {
        warn!("callback state does not match any pending login");
        return Html("<h4>No login in progress.</h4>");
    };

    if let Some(reason) = params.error {
        warn!(reason = %reason, "authorization denied");
        return Html("<h4>Login failed.</h4>");
    }
    let Some(code) = params.code else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    match state.app.complete_login(&code).await {
        Ok((user, is_new)) => {
            if is_new && state.import_new_users {
                let app = state.app.clone();
                let identity = user.identity_id.clone();
                tokio::spawn(async move {
                    info!(identity = %identity, "importing library of new user");
                    if let Err(e) = app.import_library(&identity).await {
                        warn!(identity = %identity, error = %e, "library import failed");
                    }
                });
            }

            if let Some(notify) = login.notify {
                let _ = notify.send(LoginOutcome {
                    identity: user.identity_id,
                    new_user: is_new,
                });
            }
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        Err(e) => {
            warn!(error = %e, "token exchange failed");
            Html("<h4>Login failed.</h4>")
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityParams {
    pub identity_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

/// A fresh access token for the identity, used by the web player.
pub async fn access_token(
    State(state): State<ServerState>,
    Query(params): Query<IdentityParams>,
) -> Result<Json<AccessTokenResponse>, ApiError> {
    let identity = state.app.identity(params.identity_id)?;
    let access_token = state.app.access_token(&identity).await?;
    Ok(Json(AccessTokenResponse { access_token }))
}
