use std::sync::Arc;

use crate::{
    app::App,
    error, info,
    server::{ServerState, start_api_server},
};

pub async fn serve(app: Arc<App>) {
    info!("Serving on http://{}", app.config.server_addr);

    if let Err(e) = start_api_server(ServerState::new(app, true)).await {
        error!("{}", e);
    }
}
