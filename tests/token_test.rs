mod common;

use common::{IDENTITY, MockSpotify, create_test_app, start};
use getunes::error::AuthError;
use getunes::spotify::auth::TokenProvider;
use getunes::types::User;
use tempfile::TempDir;

async fn store_user(app: &getunes::app::App, refresh_token: Option<&str>) {
    app.users
        .put_user(&User {
            identity_id: IDENTITY.to_string(),
            spotify_id: "alice-spotify".to_string(),
            refresh_token: refresh_token.map(str::to_string),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_cached_token_is_reused_until_close_to_expiry() {
    let (base, mock) = start(MockSpotify::new()).await;
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&base, dir.path()).await;

    let first = app.tokens.access_token(IDENTITY).await.unwrap();
    let second = app.tokens.access_token(IDENTITY).await.unwrap();

    assert_eq!(first, "access-1");
    assert_eq!(second, first);
    assert_eq!(mock.hits("token"), 1);
}

#[tokio::test]
async fn test_token_within_expiry_buffer_is_refreshed() {
    let (base, mock) = start(MockSpotify {
        expires_in: 200,
        ..MockSpotify::new()
    })
    .await;
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&base, dir.path()).await;

    let first = app.tokens.access_token(IDENTITY).await.unwrap();
    let second = app.tokens.access_token(IDENTITY).await.unwrap();

    assert_eq!(first, "access-1");
    assert_eq!(second, "access-2");
    assert_eq!(mock.hits("token"), 2);
}

#[tokio::test]
async fn test_unknown_identity() {
    let (base, mock) = start(MockSpotify::new()).await;
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&base, dir.path()).await;

    let result = app.tokens.access_token("nobody").await;

    assert!(matches!(result, Err(AuthError::UnknownIdentity(id)) if id == "nobody"));
    assert_eq!(mock.hits("token"), 0);
}

#[tokio::test]
async fn test_missing_refresh_token() {
    let (base, mock) = start(MockSpotify::new()).await;
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&base, dir.path()).await;

    store_user(&app, None).await;
    assert!(matches!(
        app.tokens.access_token(IDENTITY).await,
        Err(AuthError::MissingRefreshToken(_))
    ));

    store_user(&app, Some("")).await;
    assert!(matches!(
        app.tokens.access_token(IDENTITY).await,
        Err(AuthError::MissingRefreshToken(_))
    ));
    assert_eq!(mock.hits("token"), 0);
}

#[tokio::test]
async fn test_rejected_refresh_token() {
    let (base, _mock) = start(MockSpotify::new()).await;
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&base, dir.path()).await;
    store_user(&app, Some("revoked")).await;

    let result = app.tokens.access_token(IDENTITY).await;

    assert!(matches!(result, Err(AuthError::Rejected { status: 400 })));
}

#[tokio::test]
async fn test_rotated_refresh_token_is_persisted() {
    let (base, _mock) = start(MockSpotify {
        rotated_refresh_token: Some("refresh-2".to_string()),
        ..MockSpotify::new()
    })
    .await;
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&base, dir.path()).await;

    app.tokens.access_token(IDENTITY).await.unwrap();

    let stored = app.users.get_user(IDENTITY).await.unwrap().unwrap();
    assert_eq!(stored.refresh_token.as_deref(), Some("refresh-2"));
}

#[tokio::test]
async fn test_refresh_token_kept_when_not_rotated() {
    let (base, _mock) = start(MockSpotify::new()).await;
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&base, dir.path()).await;

    app.tokens.access_token(IDENTITY).await.unwrap();

    let stored = app.users.get_user(IDENTITY).await.unwrap().unwrap();
    assert_eq!(stored.refresh_token.as_deref(), Some("refresh-1"));
}
