use std::collections::HashMap;

use tracing::{debug, info};

use super::CatalogClient;
use crate::{
    error::{Error, Result},
    management::CacheKey,
    types::{AudioFeaturesRecord, AudioFeaturesResponse, Playlist, Song, Tracklist},
};

/// Most ids one `GET /audio-features` call accepts.
pub const FEATURES_BATCH_SIZE: usize = 10;

impl CatalogClient {
    /// Fetches the audio features of every track, [`FEATURES_BATCH_SIZE`] ids
    /// per call, joined with each track's name and artists. The result follows
    /// the tracklist order. Cached as `playlist-{name}/features.json`.
    ///
    /// Fails with [`Error::IncompleteFeatures`] if the service has no features
    /// for some track, and with [`Error::MissingFeature`] if a feature set
    /// lacks a value. Nothing is cached in either case.
    pub async fn fetch_all_features(
        &self,
        playlist: &Playlist,
        tracklist: &Tracklist,
    ) -> Result<Vec<Song>> {
        let key = CacheKey::features(&playlist.name);
        if let Some(songs) = self.cache.get::<Vec<Song>>(&key).await? {
            info!(location = %self.cache.location(&key), "Cached playlist features found");
            return Ok(songs);
        }

        info!(playlist = %playlist.name, id = %playlist.id, "Retrieving audio features");
        let ids = tracklist.ids();
        let mut songs = Vec::with_capacity(ids.len());

        for (batch, chunk) in ids.chunks(FEATURES_BATCH_SIZE).enumerate() {
            debug!(batch = batch + 1, size = chunk.len(), "Getting batch of audio features");
            let response: AudioFeaturesResponse = self
                .get_json("/audio-features", &[("ids", chunk.join(","))])
                .await?;

            let mut by_id: HashMap<String, AudioFeaturesRecord> = response
                .audio_features
                .into_iter()
                .flatten()
                .map(|f| (f.id.clone(), f))
                .collect();

            for id in chunk {
                let features = by_id
                    .remove(id)
                    .ok_or_else(|| Error::IncompleteFeatures(id.clone()))?
                    .into_features()?;
                // ids come from the tracklist itself
                let Some(track) = tracklist.get(id) else {
                    continue;
                };
                songs.push(Song {
                    features,
                    name: track.name.clone(),
                    artists: track.artists.clone(),
                });
            }
        }

        self.cache.store(&key, &songs).await?;
        Ok(songs)
    }
}
