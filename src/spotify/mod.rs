//! # Spotify Integration Module
//!
//! [`CatalogClient`] wraps the handful of Spotify Web API endpoints playrank
//! consumes and owns the on-disk cache for each of them.
//!
//! ## API Coverage
//!
//! - `GET /me` - current user, when no user id is configured
//! - `GET /users/{user_id}/playlists` - playlist lookup by name
//! - `GET /playlists/{playlist_id}/tracks` - paginated playlist items
//! - `GET /audio-features` - batched audio features
//! - `POST /users/{user_id}/playlists` - create the ranked playlist
//! - `POST /playlists/{playlist_id}/tracks` - add items in batches
//!
//! ## Request discipline
//!
//! Requests are issued strictly one after another. Nothing is retried: a
//! failed call aborts the operation it belongs to. Writing back a playlist
//! waits a configurable interval between batches to stay below the service's
//! rate limits.
//!
//! ## Caching
//!
//! Every fetch first consults the [`Cache`]. A present artifact is returned
//! verbatim and no request is made. Artifacts are written once, after the
//! complete result has been assembled, so a failed fetch never leaves a
//! partial artifact behind.

pub mod auth;
mod features;
mod playlists;
mod tracks;

use std::{sync::Arc, time::Duration};

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::OnceCell;

use crate::{
    config::Settings,
    error::{Error, Result},
    management::{Cache, CredentialProvider},
    types::UserProfile,
};

pub use features::FEATURES_BATCH_SIZE;
pub use playlists::{ADD_ITEMS_BATCH_SIZE, GENERATED_DESCRIPTION, PLAYLISTS_PAGE_SIZE};
pub use tracks::{TRACKS_PAGE_SIZE, TRACK_FIELDS};

pub struct CatalogClient {
    http: Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
    cache: Cache,
    user_id: OnceCell<String>,
    batch_delay: Duration,
}

impl CatalogClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
        cache: Cache,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            cache,
            user_id: OnceCell::new(),
            batch_delay: Duration::ZERO,
        }
    }

    pub fn from_settings(settings: &Settings, credentials: Arc<dyn CredentialProvider>) -> Self {
        let client = Self::new(
            settings.api_url.clone(),
            credentials,
            Cache::fs(settings.cache_dir.clone()),
        )
        .with_batch_delay(settings.batch_delay);

        match &settings.user_id {
            Some(user_id) => client.with_user_id(user_id.clone()),
            None => client,
        }
    }

    /// Skips the `GET /me` lookup for the given user.
    pub fn with_user_id(self, user_id: impl Into<String>) -> Self {
        let _ = self.user_id.set(user_id.into());
        self
    }

    /// Pause between the end of one add-items batch and the start of the
    /// next.
    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Id of the user whose playlists are read and written.
    pub async fn user_id(&self) -> Result<&str> {
        let id = self
            .user_id
            .get_or_try_init(|| async {
                let profile: UserProfile = self.get_json("/me", &[]).await?;
                profile
                    .id
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| Error::NotFound("current Spotify user".to_string()))
            })
            .await?;
        Ok(id.as_str())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self
            .credentials
            .credential()
            .await
            .ok_or(Error::MissingCredential)?;
        Ok(request.bearer_auth(token))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let request = self.authorize(self.http.get(self.url(path)).query(query)).await?;
        self.send(request).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.authorize(self.http.post(self.url(path)).json(body)).await?;
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                self.credentials.invalidate().await;
            }
            let message = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::NOT_FOUND => Error::NotFound(message),
                _ => Error::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        Ok(response.json::<T>().await?)
    }
}
