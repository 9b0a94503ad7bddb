//! playrank library
//!
//! Fetches a Spotify playlist's tracks and their audio features, ranks the
//! tracks by one or more features and can write the ranking back as a new
//! playlist.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the local listener
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration from environment variables and `.env`
//! - `error` - Error taxonomy shared by all layers
//! - `management` - Cache artifacts and credential storage
//! - `pipeline` - End-to-end ranking of one playlist
//! - `ranking` - Scoring and ordering of tracks
//! - `server` - Local HTTP listener
//! - `spotify` - Spotify Web API client
//! - `types` - Data structures and wire types
//! - `utils` - PKCE, pacing and rounding helpers
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use playrank::{
//!     management::{Cache, StaticCredential},
//!     pipeline::{Pipeline, RankRequest},
//!     spotify::CatalogClient,
//! };
//!
//! let client = CatalogClient::new(
//!     "https://api.spotify.com/v1",
//!     Arc::new(StaticCredential::new("BQC...")),
//!     Cache::fs("/tmp/playrank"),
//! );
//! let request = RankRequest {
//!     playlist_name: "Chill".into(),
//!     features: vec!["energy".into(), "valence".into()],
//!     combinator: Some("average".into()),
//!     create_playlist: false,
//! };
//! let outcome = Pipeline::new(&client).handle(&request).await?;
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod pipeline;
pub mod ranking;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::{Error, Result};

/// Prints an informational message with a blue bullet point.
///
/// ```ignore
/// info!("Found {} playlists", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program
/// with status 1.
///
/// Only for the command layer: library code returns [`Error`] instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
