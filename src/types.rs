use std::{collections::HashMap, fmt, str::FromStr};

use clap::ValueEnum;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};
use tabled::Tabled;

use crate::error::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub uri: String,
}

/// All tracks of one playlist keyed by track id.
///
/// Serialized as a JSON object `{id: track}`. Tracks keep the order in which
/// they were first inserted, which is the playlist order when built from
/// paginated fetches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tracklist {
    tracks: Vec<Track>,
    index: HashMap<String, usize>,
}

impl Tracklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a track unless its id is already present. Returns whether the
    /// track was added.
    pub fn insert(&mut self, track: Track) -> bool {
        if self.index.contains_key(&track.id) {
            return false;
        }
        self.index.insert(track.id.clone(), self.tracks.len());
        self.tracks.push(track);
        true
    }

    pub fn extend(&mut self, tracks: impl IntoIterator<Item = Track>) {
        for track in tracks {
            self.insert(track);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Track> {
        self.index.get(id).map(|&i| &self.tracks[i])
    }

    pub fn ids(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Looks up the playable URI of every id, failing on the first unknown one.
    pub fn uris_for(&self, ids: &[String]) -> Result<Vec<String>, Error> {
        ids.iter()
            .map(|id| {
                self.get(id)
                    .map(|t| t.uri.clone())
                    .ok_or_else(|| Error::NotFound(format!("track {} is not in the tracklist", id)))
            })
            .collect()
    }
}

impl FromIterator<Track> for Tracklist {
    fn from_iter<I: IntoIterator<Item = Track>>(iter: I) -> Self {
        let mut tracklist = Tracklist::new();
        tracklist.extend(iter);
        tracklist
    }
}

impl Serialize for Tracklist {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tracks.len()))?;
        for track in &self.tracks {
            map.serialize_entry(&track.id, track)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Tracklist {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TracklistVisitor;

        impl<'de> Visitor<'de> for TracklistVisitor {
            type Value = Tracklist;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of track id to track")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Tracklist, A::Error> {
                let mut tracklist = Tracklist::new();
                while let Some((_, track)) = access.next_entry::<String, Track>()? {
                    tracklist.insert(track);
                }
                Ok(tracklist)
            }
        }

        deserializer.deserialize_map(TracklistVisitor)
    }
}

/// The numeric audio features a track can be ranked by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Feature {
    Acousticness,
    Danceability,
    DurationMs,
    Energy,
    Instrumentalness,
    Liveness,
    Loudness,
    Speechiness,
    Tempo,
    Valence,
}

impl Feature {
    pub const ALL: [Feature; 10] = [
        Feature::Acousticness,
        Feature::Danceability,
        Feature::DurationMs,
        Feature::Energy,
        Feature::Instrumentalness,
        Feature::Liveness,
        Feature::Loudness,
        Feature::Speechiness,
        Feature::Tempo,
        Feature::Valence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Acousticness => "acousticness",
            Feature::Danceability => "danceability",
            Feature::DurationMs => "duration_ms",
            Feature::Energy => "energy",
            Feature::Instrumentalness => "instrumentalness",
            Feature::Liveness => "liveness",
            Feature::Loudness => "loudness",
            Feature::Speechiness => "speechiness",
            Feature::Tempo => "tempo",
            Feature::Valence => "valence",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| Error::InvalidRequest(format!("unknown feature '{}'", s)))
    }
}

/// Audio features of a single track as returned by `/audio-features`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub id: String,
    pub acousticness: f64,
    pub danceability: f64,
    pub duration_ms: f64,
    pub energy: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub loudness: f64,
    pub speechiness: f64,
    pub tempo: f64,
    pub valence: f64,
}

impl AudioFeatures {
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Acousticness => self.acousticness,
            Feature::Danceability => self.danceability,
            Feature::DurationMs => self.duration_ms,
            Feature::Energy => self.energy,
            Feature::Instrumentalness => self.instrumentalness,
            Feature::Liveness => self.liveness,
            Feature::Loudness => self.loudness,
            Feature::Speechiness => self.speechiness,
            Feature::Tempo => self.tempo,
            Feature::Valence => self.valence,
        }
    }
}

/// Audio features joined with the display data of their track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    #[serde(flatten)]
    pub features: AudioFeatures,
    pub name: String,
    pub artists: Vec<String>,
}

impl Song {
    pub fn id(&self) -> &str {
        &self.features.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub collaborative: bool,
    #[serde(default)]
    pub snapshot_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserPlaylistsResponse {
    pub items: Vec<Playlist>,
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItemsResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub track: Option<PlaylistItemTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItemTrack {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<ArtistName>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistName {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeaturesResponse {
    pub audio_features: Vec<Option<AudioFeaturesRecord>>,
}

/// One entry of `/audio-features` as sent on the wire. Values may be null or
/// absent and are checked in [`AudioFeaturesRecord::into_features`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioFeaturesRecord {
    pub id: String,
    pub acousticness: Option<f64>,
    pub danceability: Option<f64>,
    pub duration_ms: Option<f64>,
    pub energy: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub liveness: Option<f64>,
    pub loudness: Option<f64>,
    pub speechiness: Option<f64>,
    pub tempo: Option<f64>,
    pub valence: Option<f64>,
}

impl AudioFeaturesRecord {
    fn value(&self, feature: Feature) -> Result<f64, Error> {
        let value = match feature {
            Feature::Acousticness => self.acousticness,
            Feature::Danceability => self.danceability,
            Feature::DurationMs => self.duration_ms,
            Feature::Energy => self.energy,
            Feature::Instrumentalness => self.instrumentalness,
            Feature::Liveness => self.liveness,
            Feature::Loudness => self.loudness,
            Feature::Speechiness => self.speechiness,
            Feature::Tempo => self.tempo,
            Feature::Valence => self.valence,
        };
        value.ok_or_else(|| Error::MissingFeature {
            id: self.id.clone(),
            feature: feature.to_string(),
        })
    }

    /// Fails with [`Error::MissingFeature`] on the first value left out.
    pub fn into_features(self) -> Result<AudioFeatures, Error> {
        Ok(AudioFeatures {
            acousticness: self.value(Feature::Acousticness)?,
            danceability: self.value(Feature::Danceability)?,
            duration_ms: self.value(Feature::DurationMs)?,
            energy: self.value(Feature::Energy)?,
            instrumentalness: self.value(Feature::Instrumentalness)?,
            liveness: self.value(Feature::Liveness)?,
            loudness: self.value(Feature::Loudness)?,
            speechiness: self.value(Feature::Speechiness)?,
            tempo: self.value(Feature::Tempo)?,
            valence: self.value(Feature::Valence)?,
            id: self.id,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

#[derive(Tabled)]
pub struct RankedTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub name: String,
    pub artists: String,
    pub value: String,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub id: String,
    pub public: String,
}
