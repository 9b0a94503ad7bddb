//! JSON cache artifacts standing in for remote fetches.
//!
//! A present artifact is trusted without revalidation and never refreshed
//! automatically. The only way to invalidate one is to delete it.

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::{Error, Result},
    ranking::Combinator,
    types::Feature,
};

/// Relative location of a cache artifact, e.g. `playlist-Chill/tracks.json`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn playlists(user_id: &str) -> Self {
        Self(format!("{}.playlists.json", sanitize(user_id)))
    }

    pub fn tracks(playlist_name: &str) -> Self {
        Self(format!("{}/tracks.json", playlist_dir(playlist_name)))
    }

    pub fn features(playlist_name: &str) -> Self {
        Self(format!("{}/features.json", playlist_dir(playlist_name)))
    }

    /// Ranked report, named `feature1+feature2[-combinator].json`.
    /// `playlist-{name}/{f1+f2}.json`, with `-{combinator}` before the
    /// extension whenever a combinator was requested.
    pub fn report(playlist_name: &str, features: &[Feature], combinator: Option<Combinator>) -> Self {
        let joined = features
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join("+");
        let file = match combinator {
            Some(c) => format!("{}-{}.json", joined, c),
            None => format!("{}.json", joined),
        };
        Self(format!("{}/{}", playlist_dir(playlist_name), file))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn playlist_dir(playlist_name: &str) -> String {
    format!("playlist-{}", sanitize(playlist_name))
}

// Names come from the remote service and must not escape the cache root.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();
    match cleaned.as_str() {
        "." | ".." => cleaned.replace('.', "_"),
        _ => cleaned,
    }
}

/// Raw storage behind the cache. Writes replace the whole artifact.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn exists(&self, key: &CacheKey) -> bool;

    async fn read(&self, key: &CacheKey) -> Result<String>;

    async fn write(&self, key: &CacheKey, contents: String) -> Result<()>;

    /// Human readable location of an artifact, used in log output.
    fn location(&self, key: &CacheKey) -> String;
}

/// Stores artifacts as files below a root directory.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.as_str())
    }
}

#[async_trait]
impl CacheStore for FsStore {
    async fn exists(&self, key: &CacheKey) -> bool {
        async_fs::metadata(self.path(key))
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    async fn read(&self, key: &CacheKey) -> Result<String> {
        Ok(async_fs::read_to_string(self.path(key)).await?)
    }

    async fn write(&self, key: &CacheKey, contents: String) -> Result<()> {
        let path = self.path(key);
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }
        Ok(async_fs::write(path, contents).await?)
    }

    fn location(&self, key: &CacheKey) -> String {
        self.path(key).display().to_string()
    }
}

/// In-process store, handy for tests and dry runs.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<CacheKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, String>> {
        // a poisoned map still holds whole artifacts
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn exists(&self, key: &CacheKey) -> bool {
        self.entries().contains_key(key)
    }

    async fn read(&self, key: &CacheKey) -> Result<String> {
        self.entries()
            .get(key)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("cache artifact {}", key)))
    }

    async fn write(&self, key: &CacheKey, contents: String) -> Result<()> {
        self.entries().insert(key.clone(), contents);
        Ok(())
    }

    fn location(&self, key: &CacheKey) -> String {
        format!("memory://{}", key)
    }
}

/// Typed JSON view over a [`CacheStore`].
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn CacheStore>,
}

impl Cache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    pub fn fs(root: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FsStore::new(root)))
    }

    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub async fn exists(&self, key: &CacheKey) -> bool {
        self.store.exists(key).await
    }

    pub async fn load<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<T> {
        let content = self.store.read(key).await?;
        serde_json::from_str(&content).map_err(|source| Error::CacheCorrupt {
            key: key.to_string(),
            source,
        })
    }

    /// Loads the artifact if present. A corrupt artifact is an error, not a
    /// miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<T>> {
        if !self.exists(key).await {
            return Ok(None);
        }
        self.load(key).await.map(Some)
    }

    pub async fn store<T: Serialize + ?Sized>(&self, key: &CacheKey, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.store.write(key, json).await
    }

    pub async fn store_pretty<T: Serialize + ?Sized>(
        &self,
        key: &CacheKey,
        value: &T,
    ) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.store.write(key, json).await
    }

    pub fn location(&self, key: &CacheKey) -> String {
        self.store.location(key)
    }
}
