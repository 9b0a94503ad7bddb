//! Tests for the local listener's routes.

mod common;

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use common::*;
use playrank::{api::CatalogSource, management::Cache, server::router};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tower::ServiceExt; // for `oneshot`
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app(server: &MockServer) -> Router {
    let catalog = CatalogSource::Fixed(Arc::new(client(server, Cache::memory())));
    router(Arc::new(Mutex::new(None)), catalog)
}

fn post_playlist(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/playlist")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let response = app(&server).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_ranking_request_returns_created() {
    let server = MockServer::start().await;
    mount_chill(&server).await;
    let body = json!({
        "playlistName": "Chill",
        "features": ["energy", "valence"],
        "combinator": "average"
    });

    let response = app(&server)
        .oneshot(post_playlist(body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        read_json(response).await,
        json!({
            "trackIds": ["track2", "track1", "track3"],
            "report": "memory://playlist-Chill/energy+valence-average.json",
            "playlist": null
        })
    );
}

#[tokio::test]
async fn test_ranking_request_can_create_playlist() {
    let server = MockServer::start().await;
    mount_chill(&server).await;
    Mock::given(method("POST"))
        .and(path("/users/user1/playlists"))
        .respond_with(ResponseTemplate::new(201).set_body_json(playlist_json("new1", "Chill by energy")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/playlists/new1/tracks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "snapshot_id": "s1" })))
        .expect(1)
        .mount(&server)
        .await;
    let body = json!({
        "playlistName": "Chill",
        "features": ["energy"],
        "createPlaylist": true
    });

    let response = app(&server)
        .oneshot(post_playlist(body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = read_json(response).await;
    assert_eq!(json["playlist"], "new1");
    assert_eq!(json["trackIds"], json!(["track2", "track3", "track1"]));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let server = MockServer::start().await;

    let response = app(&server)
        .oneshot(post_playlist("{\"playlistName\": "))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_json(response).await["error"].is_string());
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_missing_field_is_bad_request() {
    let server = MockServer::start().await;

    let response = app(&server)
        .oneshot(post_playlist(json!({ "features": ["energy"] }).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_feature_is_bad_request() {
    let server = MockServer::start().await;
    let body = json!({
        "playlistName": "Chill",
        "features": ["energy", "loudnesss"],
        "combinator": "average"
    });

    let response = app(&server)
        .oneshot(post_playlist(body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = read_json(response).await["error"].as_str().unwrap().to_string();
    assert!(error.contains("loudnesss"), "{}", error);
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_unknown_playlist_is_not_found() {
    let server = MockServer::start().await;
    mount_chill(&server).await;
    let body = json!({
        "playlistName": "Focus",
        "features": ["energy"]
    });

    let response = app(&server)
        .oneshot(post_playlist(body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
