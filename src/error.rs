//! Error types shared by the catalog client, the ranking engine and the
//! pipeline.
//!
//! Nothing in the crate retries or recovers locally: every variant aborts the
//! current run and surfaces to the caller as is.

use thiserror::Error;

/// Errors that can occur while fetching, ranking or writing back a playlist.
#[derive(Error, Debug)]
pub enum Error {
    /// A playlist or user could not be resolved
    #[error("Not found: {0}")]
    NotFound(String),

    /// The ranking request itself is malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network or HTTP client failure
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The catalog API answered with a non-success status
    #[error("Spotify API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A cached artifact exists but cannot be parsed
    #[error("Cache artifact {key} is corrupt: {source}")]
    CacheCorrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded for the cache or a request body
    #[error("Failed to encode JSON: {0}")]
    Encode(#[from] serde_json::Error),

    /// Filesystem error while reading or writing the cache
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No access token is available. Run `playrank auth` first.
    #[error("No Spotify credential available. Please run playrank auth")]
    MissingCredential,

    /// A track has no audio feature set
    #[error("Track {0} has no audio features")]
    IncompleteFeatures(String),

    /// The service returned a feature set with a value left out
    #[error("Track {id} has no {feature} value")]
    MissingFeature { id: String, feature: String },

    /// A feature value is NaN or infinite
    #[error("Track {id} has a non-finite {feature} value")]
    NonFiniteFeature { id: String, feature: String },

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for playrank operations.
pub type Result<T> = std::result::Result<T, Error>;
