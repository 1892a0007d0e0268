//! Wiring of the configured components and the workflows built on top of them:
//! login, search, playlist creation, library import and the listening-history
//! and saved-track operations.

use std::{collections::HashSet, sync::Arc};

use tracing::{info, warn};

use crate::{
    Res,
    config::Config,
    error::Error,
    management::{FileLibraryStore, FileUserStore, LibraryStore, UserStore},
    recommend::{EngineSettings, RecommendationEngine},
    spotify::{
        SpotifyClient,
        auth::{SpotifyAuth, SpotifyTokenProvider, TokenProvider},
        catalog::Catalog,
    },
    types::{
        ArtistCount, CreatedPlaylist, Favorites, GetunesPlaylist, LibraryImport, Method,
        PlayedTrack, SearchHit, SearchType, Seed, TimeRange, User,
    },
    utils,
};

pub struct App {
    pub config: Config,
    pub client: Arc<SpotifyClient>,
    pub auth: Arc<SpotifyAuth>,
    pub users: Arc<dyn UserStore>,
    pub library: Arc<dyn LibraryStore>,
    pub tokens: Arc<SpotifyTokenProvider>,
    pub engine: RecommendationEngine,
}

impl App {
    pub fn from_config(config: Config) -> Self {
        let client = Arc::new(SpotifyClient::new(
            config.api_url.clone(),
            config.retry_policy(),
        ));
        let auth = Arc::new(SpotifyAuth::from_config(&config));
        let users: Arc<dyn UserStore> = Arc::new(FileUserStore::new(config.data_dir.clone()));
        let library: Arc<dyn LibraryStore> =
            Arc::new(FileLibraryStore::new(config.data_dir.clone()));
        let tokens = Arc::new(SpotifyTokenProvider::new(auth.clone(), users.clone()));

        let engine = RecommendationEngine::new(
            client.clone(),
            tokens.clone(),
            library.clone(),
            EngineSettings {
                max_search_rounds: config.max_search_iterations,
            },
        );

        Self {
            config,
            client,
            auth,
            users,
            library,
            tokens,
            engine,
        }
    }

    /// The identity named on the command line, else the configured default.
    pub fn identity(&self, explicit: Option<String>) -> Res<String> {
        explicit
            .or_else(|| self.config.default_identity.clone())
            .ok_or_else(|| {
                Error::Config("no identity given; pass --identity or set GETUNES_IDENTITY".into())
            })
    }

    /// Completes an authorization-code login and stores the user.
    ///
    /// Returns the user and whether it was seen for the first time.
    pub async fn complete_login(&self, code: &str) -> Res<(User, bool)> {
        let token = self.auth.exchange_code(code).await?;
        let profile = self.client.current_user(&token.access_token).await?;
        let identity = profile.id.clone();

        let existing = self.users.get_user(&identity).await?;
        let is_new = existing.is_none();
        let refresh_token = if token.refresh_token.is_empty() {
            existing.and_then(|u| u.refresh_token)
        } else {
            Some(token.refresh_token.clone())
        };

        let user = User {
            identity_id: identity.clone(),
            spotify_id: profile.id,
            refresh_token,
        };
        self.users.put_user(&user).await?;
        self.tokens.remember(&identity, token).await;

        info!(identity = %identity, is_new, "user logged in");
        Ok((user, is_new))
    }

    pub async fn search(
        &self,
        identity: &str,
        query: &str,
        kind: SearchType,
        limit: u32,
    ) -> Res<Vec<SearchHit>> {
        let token = self.tokens.access_token(identity).await?;
        Ok(self.client.search(&token, query, kind, limit).await?)
    }

    /// Recommends tracks, saves them as a new private playlist and records
    /// the playlist and its tracks in the identity's history.
    pub async fn create_playlist(
        &self,
        identity: &str,
        method: Method,
        seed: &Seed,
        num: usize,
    ) -> Res<CreatedPlaylist> {
        let tracks = self.engine.recommend(identity, method, seed, num).await?;

        let token = self.tokens.access_token(identity).await?;
        let profile = self.client.current_user(&token).await?;
        let display_name = profile.display_name.as_deref().unwrap_or(&profile.id);

        let playlist = self
            .client
            .create_playlist(
                &token,
                &profile.id,
                &format!("Getunes: {}", seed.artist_name()),
                &format!("A custom playlist made for {}", display_name),
            )
            .await?;

        let uris: Vec<String> = tracks.iter().map(|t| t.uri.clone()).collect();
        self.client.add_tracks(&token, &playlist.id, &uris).await?;

        self.library.add_playlist_id(identity, &playlist.id).await?;
        self.library.append_recommended(identity, &tracks).await?;

        info!(
            identity,
            playlist = %playlist.id,
            tracks = tracks.len(),
            "playlist created"
        );
        Ok(CreatedPlaylist { playlist, tracks })
    }

    /// Rebuilds the saved-track and playlist-track files from the user's
    /// Spotify library. Playlists created by getunes are left out, their
    /// tracks are already part of the recommendation history.
    ///
    /// Everything is fetched before anything is written: a failed fetch
    /// leaves the stored library as it was.
    pub async fn import_library(&self, identity: &str) -> Res<LibraryImport> {
        let token = self.tokens.access_token(identity).await?;
        let profile = self.client.current_user(&token).await?;

        let saved = self.client.saved_tracks(&token).await?;

        let known: HashSet<String> = self
            .library
            .read_known_playlist_ids(identity)
            .await?
            .into_iter()
            .collect();
        let playlists: Vec<_> = self
            .client
            .my_playlists(&token, &profile.id)
            .await?
            .into_iter()
            .filter(|p| !known.contains(&p.id))
            .collect();

        let mut playlist_tracks = Vec::new();
        for playlist in &playlists {
            let tracks = self
                .client
                .playlist_tracks(&token, &playlist.id)
                .await
                .inspect_err(|e| warn!(playlist = %playlist.id, error = %e, "import aborted"))?;
            playlist_tracks.extend(tracks);
        }

        self.library.write_saved_tracks(identity, &saved).await?;
        self.library
            .write_playlist_tracks(identity, &playlist_tracks)
            .await?;

        let summary = LibraryImport {
            saved_tracks: saved.len(),
            playlists: playlists.len(),
            playlist_tracks: playlist_tracks.len(),
        };
        info!(identity, ?summary, "library imported");
        Ok(summary)
    }

    pub async fn top_artists(&self, identity: &str) -> Res<Vec<ArtistCount>> {
        let library = self.library.read_library(identity).await?;
        Ok(utils::top_artists(&library))
    }

    /// A valid access token for the identity, e.g. for a web player.
    pub async fn access_token(&self, identity: &str) -> Res<String> {
        Ok(self.tokens.access_token(identity).await?)
    }

    pub async fn recent_tracks(&self, identity: &str) -> Res<Vec<PlayedTrack>> {
        let token = self.tokens.access_token(identity).await?;
        Ok(self.client.recently_played(&token).await?)
    }

    /// The user's top tracks and top artists over `range`, as computed by Spotify.
    pub async fn favorites(&self, identity: &str, range: TimeRange) -> Res<Favorites> {
        let token = self.tokens.access_token(identity).await?;
        let top_tracks = self.client.my_top_tracks(&token, range).await?;
        let top_artists = self.client.my_top_artists(&token, range).await?;

        Ok(Favorites {
            top_tracks,
            top_artists,
        })
    }

    /// Playlists created for the identity that still exist in its Spotify
    /// library, each with its current tracks.
    pub async fn getunes_playlists(&self, identity: &str) -> Res<Vec<GetunesPlaylist>> {
        let known: HashSet<String> = self
            .library
            .read_known_playlist_ids(identity)
            .await?
            .into_iter()
            .collect();
        if known.is_empty() {
            return Ok(Vec::new());
        }

        let token = self.tokens.access_token(identity).await?;
        let profile = self.client.current_user(&token).await?;
        let playlists = self.client.my_playlists(&token, &profile.id).await?;

        let mut result = Vec::new();
        for playlist in playlists.into_iter().filter(|p| known.contains(&p.id)) {
            let tracks = self.client.playlist_tracks(&token, &playlist.id).await?;
            result.push(GetunesPlaylist { playlist, tracks });
        }
        Ok(result)
    }

    /// Whether each of `ids` is saved in the identity's library.
    pub async fn tracks_saved(&self, identity: &str, ids: &[String]) -> Res<Vec<bool>> {
        let token = self.tokens.access_token(identity).await?;
        Ok(self.client.contains_saved_tracks(&token, ids).await?)
    }

    pub async fn save_tracks(&self, identity: &str, ids: &[String]) -> Res<()> {
        let token = self.tokens.access_token(identity).await?;
        self.client.save_tracks(&token, ids).await?;
        info!(identity, tracks = ids.len(), "tracks saved");
        Ok(())
    }

    pub async fn remove_tracks(&self, identity: &str, ids: &[String]) -> Res<()> {
        let token = self.tokens.access_token(identity).await?;
        self.client.remove_tracks(&token, ids).await?;
        info!(identity, tracks = ids.len(), "tracks removed");
        Ok(())
    }
}
