use axum::{
    Extension, Router,
    routing::{get, post},
};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{
    api::{self, CatalogSource},
    config,
    error::{Error, Result},
    types::PkceToken,
};

pub fn router(state: Arc<Mutex<Option<PkceToken>>>, catalog: CatalogSource) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
        .route("/playlist", post(api::playlist).layer(Extension(catalog)))
}

/// Serves the local listener on `SERVER_ADDRESS` until the process ends.
pub async fn start_api_server(state: Arc<Mutex<Option<PkceToken>>>) -> Result<()> {
    let addr = SocketAddr::from_str(&config::server_addr())
        .map_err(|e| Error::Config(format!("invalid SERVER_ADDRESS: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Listening");
    axum::serve(listener, router(state, CatalogSource::Env)).await?;
    Ok(())
}
