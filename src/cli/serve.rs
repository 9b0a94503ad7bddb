use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{config, error, info, server};

pub async fn serve() {
    info!(
        "Listening on {} (POST /playlist to rank a playlist)",
        config::server_addr()
    );
    if let Err(e) = server::start_api_server(Arc::new(Mutex::new(None))).await {
        error!("Server stopped: {}", e);
    }
}
