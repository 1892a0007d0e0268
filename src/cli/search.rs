use tabled::Table;

use crate::{app::App, error, info, types::SearchType, utils};

pub async fn search(
    app: &App,
    identity: Option<String>,
    query: &str,
    kind: SearchType,
    limit: u32,
) {
    let identity = match app.identity(identity) {
        Ok(identity) => identity,
        Err(e) => error!("{}", e),
    };

    let hits = match app.search(&identity, query, kind, limit).await {
        Ok(hits) => hits,
        Err(e) => error!("Search failed: {}", e),
    };

    if hits.is_empty() {
        info!("No {} found for \"{}\"", kind.as_str(), query);
        return;
    }

    println!("{}", Table::new(utils::search_rows(&hits)));
}
