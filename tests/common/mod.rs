#![allow(dead_code)]

use std::sync::Arc;

use playrank::{
    management::{Cache, StaticCredential},
    spotify::CatalogClient,
    types::{AudioFeatures, Playlist, Song},
};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "test-token";
pub const USER: &str = "user1";

// Helper function to create a client against the mock server
pub fn client(server: &MockServer, cache: Cache) -> CatalogClient {
    CatalogClient::new(server.uri(), Arc::new(StaticCredential::new(TOKEN)), cache).with_user_id(USER)
}

pub fn playlist(id: &str, name: &str) -> Playlist {
    Playlist {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        public: Some(true),
        collaborative: false,
        snapshot_id: None,
    }
}

pub fn playlist_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "",
        "public": true,
        "collaborative": false,
        "snapshot_id": "snap"
    })
}

pub fn track_item(id: &str) -> Value {
    json!({
        "track": {
            "id": id,
            "name": format!("Song {}", id),
            "uri": format!("spotify:track:{}", id),
            "artists": [{ "name": "Artist A" }, { "name": "Artist B" }]
        }
    })
}

pub fn features_json(id: &str, energy: f64, valence: f64) -> Value {
    json!({
        "id": id,
        "acousticness": 0.1,
        "danceability": 0.5,
        "duration_ms": 210000,
        "energy": energy,
        "instrumentalness": 0.0,
        "key": 5,
        "liveness": 0.12,
        "loudness": -6.5,
        "mode": 1,
        "speechiness": 0.04,
        "tempo": 120.0,
        "time_signature": 4,
        "type": "audio_features",
        "uri": format!("spotify:track:{}", id),
        "valence": valence
    })
}

pub fn song(id: &str, energy: f64, valence: f64) -> Song {
    Song {
        features: AudioFeatures {
            id: id.to_string(),
            acousticness: 0.1,
            danceability: 0.5,
            duration_ms: 210000.0,
            energy,
            instrumentalness: 0.0,
            liveness: 0.12,
            loudness: -6.5,
            speechiness: 0.04,
            tempo: 120.0,
            valence,
        },
        name: format!("Song {}", id),
        artists: vec!["Artist A".to_string()],
    }
}

/// Requests the mock server received for `path`, in arrival order.
pub async fn requests_to(server: &MockServer, path: &str) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == path)
        .collect()
}

pub fn query_value(request: &wiremock::Request, key: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

// Chill holds three tracks with (energy, valence) of
// track1 (0.2, 0.8), track2 (0.9, 0.9) and track3 (0.5, 0.5).
pub async fn mount_chill(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/users/user1/playlists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [playlist_json("p0", "Workout"), playlist_json("p1", "Chill")],
            "next": null
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/playlists/p1/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [track_item("track1"), track_item("track2"), track_item("track3")],
            "next": null
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/audio-features"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "audio_features": [
                features_json("track1", 0.2, 0.8),
                features_json("track2", 0.9, 0.9),
                features_json("track3", 0.5, 0.5)
            ]
        })))
        .mount(server)
        .await;
}
