use tabled::Table;

use crate::{error, types::PlaylistTableRow, warning};

use super::{catalog_client, spinner};

pub async fn playlists(search: Option<String>) {
    let client = match catalog_client().await {
        Ok(client) => client,
        Err(e) => error!("{}", e),
    };

    let pb = spinner("Fetching playlists...");
    let result = client.list_playlists().await;
    pb.finish_and_clear();

    let mut playlists = match result {
        Ok(playlists) => playlists,
        Err(e) => error!("Cannot list playlists: {}", e),
    };

    if let Some(search) = search {
        let term = search.to_lowercase();
        playlists.retain(|p| p.name.to_lowercase().contains(&term));
    }

    if playlists.is_empty() {
        warning!("No playlists found");
        return;
    }

    let rows: Vec<PlaylistTableRow> = playlists
        .into_iter()
        .map(|p| PlaylistTableRow {
            name: p.name,
            id: p.id,
            public: p
                .public
                .map(|public| if public { "yes" } else { "no" })
                .unwrap_or("-")
                .to_string(),
        })
        .collect();

    println!("{}", Table::new(rows));
}
