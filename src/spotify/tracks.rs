use tracing::{debug, info, warn};

use super::CatalogClient;
use crate::{
    error::Result,
    management::CacheKey,
    types::{Playlist, PlaylistItem, PlaylistItemsResponse, Track, Tracklist},
};

/// Items requested per `GET /playlists/{id}/tracks` page.
pub const TRACKS_PAGE_SIZE: usize = 50;
/// Field filter keeping only what a [`Track`] needs.
pub const TRACK_FIELDS: &str = "total,limit,next,offset,items(track(id,name,uri,artists(name)))";

impl CatalogClient {
    /// Fetches every track of `playlist`, following the `next` cursor page by
    /// page. Cached as `playlist-{name}/tracks.json`.
    pub async fn fetch_all_tracks(&self, playlist: &Playlist) -> Result<Tracklist> {
        let key = CacheKey::tracks(&playlist.name);
        if let Some(tracklist) = self.cache.get::<Tracklist>(&key).await? {
            info!(location = %self.cache.location(&key), "Cached playlist tracks found");
            return Ok(tracklist);
        }

        info!(playlist = %playlist.name, id = %playlist.id, "Retrieving tracks from playlist");
        let path = format!("/playlists/{}/tracks", playlist.id);
        let mut tracklist = Tracklist::new();
        let mut offset = 0;

        loop {
            debug!(offset, "Getting page of playlist tracks");
            let page: PlaylistItemsResponse = self
                .get_json(
                    &path,
                    &[
                        ("fields", TRACK_FIELDS.to_string()),
                        ("limit", TRACKS_PAGE_SIZE.to_string()),
                        ("offset", offset.to_string()),
                    ],
                )
                .await?;

            tracklist.extend(page.items.into_iter().filter_map(into_track));
            if page.next.is_none() {
                break;
            }
            offset += TRACKS_PAGE_SIZE;
        }

        self.cache.store(&key, &tracklist).await?;
        Ok(tracklist)
    }
}

// Local files and removed tracks come back without a track or an id.
fn into_track(item: PlaylistItem) -> Option<Track> {
    let Some(track) = item.track else {
        warn!("Skipping playlist item without a track");
        return None;
    };
    let Some(id) = track.id.filter(|id| !id.is_empty()) else {
        warn!(name = %track.name, "Skipping playlist item without a track id");
        return None;
    };

    Some(Track {
        id,
        name: track.name,
        artists: track.artists.into_iter().map(|a| a.name).collect(),
        uri: track.uri,
    })
}
