//! Configuration management for playrank.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Every setting except the OAuth client id
//! has a usable default, so ranking against a cached playlist works without
//! any configuration at all.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf, time::Duration};

use crate::error::{Error, Result};

pub const APP_DIR: &str = "playrank";

const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
const DEFAULT_BATCH_DELAY_MS: u64 = 800;

/// Scopes needed to read private playlists and write generated ones.
pub const DEFAULT_SCOPES: [&str; 6] = [
    "playlist-read-private",
    "playlist-modify-public",
    "playlist-modify-private",
    "user-library-read",
    "user-library-modify",
    "user-read-private",
];

/// Returns the platform local data directory for playrank.
///
/// - Linux: `~/.local/share/playrank`
/// - macOS: `~/Library/Application Support/playrank`
/// - Windows: `%LOCALAPPDATA%/playrank`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Loads environment variables from `<data_dir>/.env`.
///
/// Creates the data directory if needed. A missing `.env` file is not an
/// error since every value can also come from the process environment.
pub async fn load_env() -> Result<()> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir).await?;

    let path = dir.join(".env");
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "No .env file found");
        return Ok(());
    }

    dotenv::from_path(&path)
        .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Address the local listener binds to (`SERVER_ADDRESS`).
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Explicit Spotify user id (`SPOTIFY_USER_ID`). When unset the current
/// user is resolved through the API.
pub fn spotify_user() -> Option<String> {
    optional_var("SPOTIFY_USER_ID")
}

/// Static access token override (`SPOTIFY_ACCESS_TOKEN`).
pub fn spotify_access_token() -> Option<String> {
    optional_var("SPOTIFY_ACCESS_TOKEN")
}

/// OAuth client id (`SPOTIFY_API_AUTH_CLIENT_ID`), required for login and
/// token refresh.
pub fn spotify_client_id() -> Result<String> {
    optional_var("SPOTIFY_API_AUTH_CLIENT_ID")
        .ok_or_else(|| Error::Config("SPOTIFY_API_AUTH_CLIENT_ID must be set".to_string()))
}

pub fn spotify_redirect_uri() -> String {
    var_or("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI)
}

pub fn spotify_scope() -> String {
    optional_var("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPES.join(" "))
}

pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_API_URL)
}

pub fn spotify_apitoken_url() -> String {
    var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

/// Root directory of the cache artifacts (`PLAYRANK_CACHE_DIR`).
pub fn cache_dir() -> PathBuf {
    optional_var("PLAYRANK_CACHE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir().join("cache"))
}

/// Pause between add-items batches (`PLAYRANK_BATCH_DELAY_MS`).
pub fn batch_delay() -> Result<Duration> {
    match optional_var("PLAYRANK_BATCH_DELAY_MS") {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| Error::Config(format!("PLAYRANK_BATCH_DELAY_MS '{}': {}", raw, e))),
        None => Ok(Duration::from_millis(DEFAULT_BATCH_DELAY_MS)),
    }
}

/// Everything needed to build a catalog client, resolved once per run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub user_id: Option<String>,
    pub cache_dir: PathBuf,
    pub batch_delay: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_url: spotify_apiurl(),
            user_id: spotify_user(),
            cache_dir: cache_dir(),
            batch_delay: batch_delay()?,
        })
    }
}
