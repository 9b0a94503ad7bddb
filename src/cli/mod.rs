//! # CLI Module
//!
//! User-facing commands. Each one builds a [`crate::spotify::CatalogClient`]
//! from the environment, delegates to the library and presents the outcome
//! with the console macros, spinners and tables.
//!
//! - [`auth`] - interactive OAuth login
//! - [`rank`] - rank a playlist and optionally write the ranking back
//! - [`playlists`] - list the user's playlists
//! - [`serve`] - run the local listener with the `POST /playlist` endpoint
//!
//! ```bash
//! playrank auth
//! playrank rank --playlist Chill --feature energy
//! playrank rank --playlist Chill --feature energy --feature valence --combinator average --create-playlist
//! ```

mod auth;
mod playlists;
mod rank;
mod serve;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub use auth::auth;
pub use playlists::playlists;
pub use rank::rank;
pub use serve::serve;

use crate::{
    config::Settings, error::Result, management::default_credentials, spotify::CatalogClient,
};

async fn catalog_client() -> Result<CatalogClient> {
    let settings = Settings::from_env()?;
    let credentials = default_credentials().await?;
    Ok(CatalogClient::from_settings(&settings, credentials))
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
