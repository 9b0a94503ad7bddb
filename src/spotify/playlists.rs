use tracing::{debug, info};

use super::CatalogClient;
use crate::{
    error::{Error, Result},
    management::CacheKey,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        GetUserPlaylistsResponse, Playlist,
    },
    utils::Pacer,
};

/// Largest page `GET /users/{id}/playlists` serves.
pub const PLAYLISTS_PAGE_SIZE: usize = 50;
/// Largest URI list accepted by one add-items call.
pub const ADD_ITEMS_BATCH_SIZE: usize = 75;
pub const GENERATED_DESCRIPTION: &str = "Generated Automatically";

impl CatalogClient {
    /// Lists the user's playlists, cached as `{userId}.playlists.json`.
    pub async fn list_playlists(&self) -> Result<Vec<Playlist>> {
        let user_id = self.user_id().await?.to_string();
        let key = CacheKey::playlists(&user_id);

        if let Some(playlists) = self.cache.get::<Vec<Playlist>>(&key).await? {
            info!(location = %self.cache.location(&key), "Cached playlists found");
            return Ok(playlists);
        }

        info!(user = %user_id, "Retrieving playlists");
        let path = format!("/users/{}/playlists", user_id);
        let mut playlists = Vec::new();
        let mut offset = 0;

        loop {
            debug!(offset, "Getting page of playlists");
            let page: GetUserPlaylistsResponse = self
                .get_json(
                    &path,
                    &[
                        ("limit", PLAYLISTS_PAGE_SIZE.to_string()),
                        ("offset", offset.to_string()),
                    ],
                )
                .await?;

            playlists.extend(page.items);
            if page.next.is_none() {
                break;
            }
            offset += PLAYLISTS_PAGE_SIZE;
        }

        self.cache.store_pretty(&key, &playlists).await?;
        Ok(playlists)
    }

    /// Finds a playlist by exact name. The first match wins when several
    /// playlists share the name.
    pub async fn resolve_playlist_by_name(&self, name: &str) -> Result<Playlist> {
        let playlists = self.list_playlists().await?;
        let mut matches = playlists.into_iter().filter(|p| p.name == name);

        let playlist = match matches.next() {
            Some(p) => p,
            None => {
                let user_id = self.user_id().await?;
                return Err(Error::NotFound(format!(
                    "playlist {} for user {}",
                    name, user_id
                )));
            }
        };

        let others = matches.count();
        if others > 0 {
            tracing::warn!(
                name,
                id = %playlist.id,
                others,
                "Playlist name is ambiguous, using the first match"
            );
        }

        Ok(playlist)
    }

    /// Creates a public, non-collaborative playlist for the user.
    pub async fn create_playlist(&self, name: &str) -> Result<Playlist> {
        let user_id = self.user_id().await?.to_string();
        info!(name, "Creating playlist");

        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: GENERATED_DESCRIPTION.to_string(),
            public: true,
            collaborative: false,
        };
        let playlist: Playlist = self
            .post_json(&format!("/users/{}/playlists", user_id), &body)
            .await?;

        info!(name, id = %playlist.id, "Created playlist");
        Ok(playlist)
    }

    /// Appends `uris` in batches of [`ADD_ITEMS_BATCH_SIZE`], in order, pausing
    /// the batch delay after each batch completes. The first failing batch aborts the whole operation;
    /// batches already sent stay in the playlist.
    pub async fn add_tracks_to_playlist(&self, playlist_id: &str, uris: &[String]) -> Result<()> {
        info!(count = uris.len(), playlist = playlist_id, "Adding tracks to playlist");
        let path = format!("/playlists/{}/tracks", playlist_id);
        let mut pacer = Pacer::new(self.batch_delay);

        for (page, chunk) in uris.chunks(ADD_ITEMS_BATCH_SIZE).enumerate() {
            pacer.wait().await;
            debug!(page = page + 1, size = chunk.len(), "Adding page of tracks to playlist");

            let body = AddTrackToPlaylistRequest {
                uris: chunk.to_vec(),
            };
            let _: AddTrackToPlaylistResponse = self.post_json(&path, &body).await?;
            pacer.finish();
        }

        Ok(())
    }
}
