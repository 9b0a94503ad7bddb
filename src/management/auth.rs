use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    config,
    error::{Error, Result},
    spotify,
    types::Token,
};

// refresh this long before the token actually expires
const EXPIRY_MARGIN_SECS: u64 = 240;

/// Supplies the access token for catalog calls.
///
/// `None` means no credential is available, which callers treat as fatal.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn credential(&self) -> Option<String>;

    async fn invalidate(&self);
}

/// A fixed access token, e.g. from `SPOTIFY_ACCESS_TOKEN`.
pub struct StaticCredential {
    token: Mutex<Option<String>>,
}

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredential {
    async fn credential(&self) -> Option<String> {
        self.token.lock().await.clone()
    }

    async fn invalidate(&self) {
        *self.token.lock().await = None;
    }
}

/// OAuth token persisted in the local data directory, refreshed on demand.
pub struct TokenManager {
    token: Mutex<Option<Token>>,
    path: PathBuf,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        Self {
            token: Mutex::new(Some(token)),
            path: Self::token_path(),
        }
    }

    pub async fn load() -> Result<Self> {
        Self::load_from(Self::token_path()).await
    }

    pub async fn load_from(path: PathBuf) -> Result<Self> {
        let content = async_fs::read_to_string(&path).await?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self {
            token: Mutex::new(Some(token)),
            path,
        })
    }

    pub async fn persist(&self) -> Result<()> {
        let guard = self.token.lock().await;
        let Some(token) = guard.as_ref() else {
            return Ok(());
        };
        Self::write(&self.path, token).await
    }

    async fn write(path: &PathBuf, token: &Token) -> Result<()> {
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(token)?;
        Ok(async_fs::write(path, json).await?)
    }

    fn is_expired(token: &Token) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + EXPIRY_MARGIN_SECS >= token.obtained_at + token.expires_in
    }

    fn token_path() -> PathBuf {
        config::data_dir().join("token.json")
    }
}

#[async_trait]
impl CredentialProvider for TokenManager {
    async fn credential(&self) -> Option<String> {
        let mut guard = self.token.lock().await;
        let token = guard.as_mut()?;

        if Self::is_expired(token) && !token.refresh_token.is_empty() {
            match spotify::auth::refresh_token(&token.refresh_token).await {
                Ok(mut fresh) => {
                    // the token endpoint may omit a rotated refresh token
                    if fresh.refresh_token.is_empty() {
                        fresh.refresh_token = token.refresh_token.clone();
                    }
                    *token = fresh;
                    if let Err(e) = Self::write(&self.path, token).await {
                        tracing::warn!(error = %e, "Failed to persist refreshed token");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Token refresh failed"),
            }
        }

        Some(token.access_token.clone())
    }

    async fn invalidate(&self) {
        *self.token.lock().await = None;
        if let Err(e) = async_fs::remove_file(&self.path).await {
            tracing::debug!(error = %e, "No token file to remove");
        }
    }
}

/// Picks the credential source for this process: `SPOTIFY_ACCESS_TOKEN` when
/// set, otherwise the token stored by `playrank auth`.
pub async fn default_credentials() -> Result<Arc<dyn CredentialProvider>> {
    if let Some(token) = config::spotify_access_token() {
        return Ok(Arc::new(StaticCredential::new(token)));
    }

    match TokenManager::load().await {
        Ok(manager) => Ok(Arc::new(manager)),
        Err(e) => {
            tracing::debug!(error = %e, "No stored token");
            Err(Error::MissingCredential)
        }
    }
}
