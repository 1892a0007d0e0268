//! # Recommendation Engine
//!
//! Turns a [`Seed`] and a ranking [`Method`] into a list of tracks the user
//! has not heard yet.
//!
//! ```text
//! TokenProvider ─┐
//! LibraryStore ──┼─> RecommendationEngine::recommend
//! Catalog ───────┘        │
//!                         ├─ related  -> widener::related_songs
//!                         ├─ other    -> rankers::discography
//!                         └─ spotify  -> rankers::external
//!                         ↓
//!               rank by popularity, truncate to `num`
//! ```
//!
//! Candidates are compared with the library through
//! [`oracle::are_equivalent`], never by id alone. The returned list never
//! contains a library track, is non-increasing in popularity, and keeps
//! discovery order among equally popular tracks.
//!
//! The engine only reads: persisting the result as recommendation history is
//! up to the caller.

pub mod filter;
pub mod oracle;
pub mod rankers;
pub mod widener;

use std::sync::Arc;

use tracing::info;

use crate::{
    Res,
    error::FetchError,
    management::LibraryStore,
    spotify::{auth::TokenProvider, catalog::Catalog},
    types::{Method, Seed, Track},
};

#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    /// Cap on playlist-search rounds for [`Method::Related`].
    pub max_search_rounds: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_search_rounds: 20,
        }
    }
}

pub struct RecommendationEngine {
    catalog: Arc<dyn Catalog>,
    tokens: Arc<dyn TokenProvider>,
    library: Arc<dyn LibraryStore>,
    settings: EngineSettings,
}

impl RecommendationEngine {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        tokens: Arc<dyn TokenProvider>,
        library: Arc<dyn LibraryStore>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            catalog,
            tokens,
            library,
            settings,
        }
    }

    /// Recommends up to `num` tracks for `identity` around `seed`.
    pub async fn recommend(
        &self,
        identity: &str,
        method: Method,
        seed: &Seed,
        num: usize,
    ) -> Res<Vec<Track>> {
        if num == 0 {
            return Ok(Vec::new());
        }

        let token = self.tokens.access_token(identity).await?;
        let library = self.library.read_library(identity).await?;
        info!(
            identity,
            method = ?method,
            library = library.len(),
            num,
            "ranking candidates"
        );

        let tracks = self.rank(&token, method, seed, &library, num).await?;
        info!(identity, tracks = tracks.len(), "candidates ranked");
        Ok(tracks)
    }

    /// Runs one strategy against an already loaded library.
    pub async fn rank(
        &self,
        token: &str,
        method: Method,
        seed: &Seed,
        library: &[Track],
        num: usize,
    ) -> Result<Vec<Track>, FetchError> {
        let catalog = self.catalog.as_ref();

        let mut tracks = match method {
            Method::Related => {
                widener::related_songs(
                    catalog,
                    token,
                    seed,
                    library,
                    num,
                    self.settings.max_search_rounds,
                )
                .await?
            }
            Method::Other => rankers::discography(catalog, token, seed, library).await?,
            Method::Spotify => rankers::external(catalog, token, seed, library).await?,
        };

        filter::rank_by_popularity(&mut tracks);
        tracks.truncate(num);
        Ok(tracks)
    }
}
