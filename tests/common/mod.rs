#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    path::Path,
    sync::{Arc, Mutex},
};

use axum::{
    Form, Json, Router,
    extract::{Path as UrlPath, Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use getunes::{app::App, config::Config, types::User};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const IDENTITY: &str = "alice";
pub const SPOTIFY_ID: &str = "alice-spotify";

/// Canned Spotify accounts service and Web API, recording what it is asked.
#[derive(Default)]
pub struct MockSpotify {
    pub expires_in: u64,
    /// Refresh token handed out on refresh; none means no rotation.
    pub rotated_refresh_token: Option<String>,
    pub saved: Vec<Value>,
    pub saved_ids: HashSet<String>,
    pub playlists: Vec<Value>,
    pub playlist_tracks: HashMap<String, Vec<Value>>,
    pub failing_playlists: HashSet<String>,
    pub recommended: Vec<Value>,
    pub recommendations_fail: bool,
    pub recent: Vec<Value>,
    pub top_tracks: Vec<Value>,
    pub top_artists: Vec<Value>,

    pub hits: Mutex<HashMap<String, usize>>,
    pub created_playlists: Mutex<Vec<String>>,
    pub added_uris: Mutex<Vec<String>>,
    pub saved_changes: Mutex<Vec<(String, String)>>,
    pub time_ranges: Mutex<Vec<String>>,
}

impl MockSpotify {
    pub fn new() -> Self {
        Self {
            expires_in: 3600,
            ..Default::default()
        }
    }

    pub fn hits(&self, key: &str) -> usize {
        self.hits.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    fn hit(&self, key: impl Into<String>) -> usize {
        let mut hits = self.hits.lock().unwrap();
        let count = hits.entry(key.into()).or_insert(0);
        *count += 1;
        *count
    }
}

pub fn wire_track(id: &str, popularity: u8, artists: &[&str]) -> Value {
    json!({
        "id": id,
        "name": format!("Track {}", id),
        "uri": format!("spotify:track:{}", id),
        "popularity": popularity,
        "artists": artists.iter().map(|a| json!({ "id": a, "name": a.to_uppercase() })).collect::<Vec<_>>(),
    })
}

pub fn wire_playlist(id: &str, owner: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Playlist {}", id),
        "uri": format!("spotify:playlist:{}", id),
        "owner": { "id": owner },
    })
}

fn paging(items: Vec<Value>) -> Json<Value> {
    Json(json!({ "total": items.len(), "items": items, "next": null }))
}

type Mock = State<Arc<MockSpotify>>;

async fn token(State(mock): Mock, Form(form): Form<HashMap<String, String>>) -> Response {
    let n = mock.hit("token");
    let grant = form.get("grant_type").map(String::as_str);

    if grant == Some("refresh_token") && form.get("refresh_token").map(String::as_str) == Some("revoked")
    {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid_grant" }))).into_response();
    }

    let refresh_token = match grant {
        Some("authorization_code") => Some("refresh-from-code".to_string()),
        _ => mock.rotated_refresh_token.clone(),
    };
    Json(json!({
        "access_token": format!("access-{}", n),
        "refresh_token": refresh_token,
        "scope": "user-library-read",
        "expires_in": mock.expires_in,
    }))
    .into_response()
}

async fn me(State(mock): Mock) -> Json<Value> {
    mock.hit("me");
    Json(json!({ "id": SPOTIFY_ID, "display_name": "Alice" }))
}

async fn saved_tracks(State(mock): Mock) -> Json<Value> {
    mock.hit("saved");
    paging(mock.saved.iter().map(|t| json!({ "track": t })).collect())
}

async fn change_saved(
    method: Method,
    State(mock): Mock,
    Query(query): Query<HashMap<String, String>>,
) -> StatusCode {
    mock.saved_changes.lock().unwrap().push((
        method.to_string(),
        query.get("ids").cloned().unwrap_or_default(),
    ));
    StatusCode::OK
}

async fn contains(State(mock): Mock, Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    mock.hit("contains");
    let ids = query.get("ids").cloned().unwrap_or_default();
    Json(json!(
        ids.split(',')
            .map(|id| mock.saved_ids.contains(id))
            .collect::<Vec<_>>()
    ))
}

async fn my_playlists(State(mock): Mock) -> Json<Value> {
    mock.hit("playlists");
    paging(mock.playlists.clone())
}

async fn playlist_tracks(State(mock): Mock, UrlPath(id): UrlPath<String>) -> Response {
    mock.hit(format!("tracks:{}", id));
    if mock.failing_playlists.contains(&id) {
        return StatusCode::FORBIDDEN.into_response();
    }
    let tracks = mock.playlist_tracks.get(&id).cloned().unwrap_or_default();
    paging(tracks.into_iter().map(|t| json!({ "track": t })).collect()).into_response()
}

async fn add_tracks(
    State(mock): Mock,
    UrlPath(_id): UrlPath<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let uris = body["uris"].as_array().cloned().unwrap_or_default();
    mock.added_uris
        .lock()
        .unwrap()
        .extend(uris.iter().filter_map(|u| u.as_str().map(str::to_string)));
    Json(json!({ "snapshot_id": "snap" }))
}

async fn create_playlist(
    State(mock): Mock,
    UrlPath(user): UrlPath<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let name = body["name"].as_str().unwrap_or_default().to_string();
    mock.created_playlists.lock().unwrap().push(name.clone());
    Json(json!({
        "id": "created-pl",
        "name": name,
        "uri": "spotify:playlist:created-pl",
        "owner": { "id": user },
    }))
}

async fn recommendations(State(mock): Mock) -> Response {
    mock.hit("recommendations");
    if mock.recommendations_fail {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!({ "tracks": mock.recommended })).into_response()
}

async fn recently_played(State(mock): Mock) -> Json<Value> {
    paging(mock.recent.clone())
}

async fn top(
    State(mock): Mock,
    UrlPath(kind): UrlPath<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    if let Some(range) = query.get("time_range") {
        mock.time_ranges.lock().unwrap().push(range.clone());
    }
    match kind.as_str() {
        "tracks" => paging(mock.top_tracks.clone()),
        _ => paging(mock.top_artists.clone()),
    }
}

/// Answers with the requested status. A `429` is sent once, with a
/// one-second `retry-after`, and the retry succeeds.
async fn status(State(mock): Mock, UrlPath(code): UrlPath<u16>) -> Response {
    let n = mock.hit(format!("status:{}", code));
    if code == 429 && n > 1 {
        return Json(json!({ "ok": true })).into_response();
    }

    let mut headers = HeaderMap::new();
    if code == 429 {
        headers.insert("retry-after", "1".parse().unwrap());
    }
    let status = StatusCode::from_u16(code).unwrap();
    (status, headers, Json(json!({ "error": { "status": code } }))).into_response()
}

/// Serves the mock on an ephemeral port and returns its base URL.
pub async fn start(mock: MockSpotify) -> (String, Arc<MockSpotify>) {
    let mock = Arc::new(mock);
    let app = Router::new()
        .route("/api/token", post(token))
        .route("/v1/me", get(me))
        .route(
            "/v1/me/tracks",
            get(saved_tracks).put(change_saved).delete(change_saved),
        )
        .route("/v1/me/tracks/contains", get(contains))
        .route("/v1/me/playlists", get(my_playlists))
        .route("/v1/me/player/recently-played", get(recently_played))
        .route("/v1/me/top/{kind}", get(top))
        .route(
            "/v1/playlists/{id}/tracks",
            get(playlist_tracks).post(add_tracks),
        )
        .route("/v1/users/{user}/playlists", post(create_playlist))
        .route("/v1/recommendations", get(recommendations))
        .route("/v1/status/{code}", get(status))
        .with_state(mock.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), mock)
}

pub fn create_test_config(base_url: &str, data_dir: &Path) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("SPOTIFY_CLIENT_ID", "client".to_string()),
        ("SPOTIFY_CLIENT_SECRET", "secret".to_string()),
        ("SPOTIFY_API_URL", format!("{}/v1", base_url)),
        ("SPOTIFY_API_TOKEN_URL", format!("{}/api/token", base_url)),
        ("GETUNES_DATA_DIR", data_dir.display().to_string()),
        ("GETUNES_FETCH_MAX_RETRIES", "1".to_string()),
        ("GETUNES_FETCH_BACKOFF_MS", "1".to_string()),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

/// An app talking to the mock, with `alice` already logged in.
pub async fn create_test_app(base_url: &str, data_dir: &Path) -> App {
    let app = App::from_config(create_test_config(base_url, data_dir));
    app.users
        .put_user(&User {
            identity_id: IDENTITY.to_string(),
            spotify_id: SPOTIFY_ID.to_string(),
            refresh_token: Some("refresh-1".to_string()),
        })
        .await
        .unwrap();
    app
}
