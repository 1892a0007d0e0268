use std::{sync::Arc, time::Duration};

use tokio::{sync::oneshot, time::timeout};

use crate::{
    app::App,
    cli, error,
    server::{ServerState, start_api_server},
    success, warning,
};

const MAX_WAIT: Duration = Duration::from_secs(60);

pub async fn auth(app: Arc<App>) {
    let state = ServerState::new(app.clone(), false);

    let (tx, rx) = oneshot::channel();
    let auth_url = match state.begin_login(Some(tx)).await {
        Ok(url) => url,
        Err(e) => error!("Cannot build authorization URL: {}", e),
    };

    let server_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_state).await {
            warning!("{}", e);
        }
    });

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    match timeout(MAX_WAIT, rx).await {
        Ok(Ok(outcome)) => {
            success!("Authenticated as {}", outcome.identity);
            if app.config.default_identity.as_deref() != Some(outcome.identity.as_str()) {
                warning!(
                    "Set GETUNES_IDENTITY={} to use it by default",
                    outcome.identity
                );
            }
            if outcome.new_user {
                cli::import_library(&app, Some(outcome.identity)).await;
            }
        }
        Ok(Err(_)) => error!("Authentication failed."),
        Err(_) => error!("Authentication timed out."),
    }
}

/// Prints a fresh access token, e.g. to try the Web API by hand.
pub async fn access_token(app: &App, identity: Option<String>) {
    let identity = match app.identity(identity) {
        Ok(identity) => identity,
        Err(e) => error!("{}", e),
    };

    match app.access_token(&identity).await {
        Ok(token) => println!("{}", token),
        Err(e) => error!("Cannot get an access token: {}", e),
    }
}
