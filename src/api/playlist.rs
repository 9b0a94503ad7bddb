use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::{
    config::Settings,
    error::{Error, Result},
    management::default_credentials,
    pipeline::{Pipeline, RankRequest},
    spotify::CatalogClient,
};

/// Where `POST /playlist` gets its catalog client from.
#[derive(Clone)]
pub enum CatalogSource {
    /// Built per request from the environment and the stored credential, so
    /// a login finished after startup is picked up.
    Env,
    /// A preconfigured client shared by every request.
    Fixed(Arc<CatalogClient>),
}

impl CatalogSource {
    async fn client(&self) -> Result<Arc<CatalogClient>> {
        match self {
            CatalogSource::Env => {
                let settings = Settings::from_env()?;
                let credentials = default_credentials().await?;
                Ok(Arc::new(CatalogClient::from_settings(&settings, credentials)))
            }
            CatalogSource::Fixed(client) => Ok(Arc::clone(client)),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankResponse {
    pub track_ids: Vec<String>,
    pub report: String,
    pub playlist: Option<String>,
}

/// Pipeline failure rendered as a JSON error body.
pub struct ApiError(pub Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::MissingCredential => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// `POST /playlist`: runs one ranking request end to end.
pub async fn playlist(
    Extension(source): Extension<CatalogSource>,
    payload: std::result::Result<Json<RankRequest>, JsonRejection>,
) -> std::result::Result<(StatusCode, Json<RankResponse>), ApiError> {
    // malformed bodies are client errors like any other invalid request
    let Json(request) = payload.map_err(|e| Error::InvalidRequest(e.body_text()))?;
    tracing::info!(playlist = %request.playlist_name, features = ?request.features, "Received ranking request");

    // validate before touching credentials or the network
    let plan = request.validate()?;

    let client = source.client().await?;
    let outcome = Pipeline::new(&client).run(&plan).await.map_err(|e| {
        tracing::warn!(error = %e, "Ranking request failed");
        ApiError(e)
    })?;

    Ok((
        StatusCode::CREATED,
        Json(RankResponse {
            track_ids: outcome.track_ids(),
            report: outcome.report,
            playlist: outcome.created.map(|p| p.id),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_error_taxonomy_to_status_codes() {
        let cases = [
            (Error::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
            (Error::NotFound("x".into()), StatusCode::NOT_FOUND),
            (Error::MissingCredential, StatusCode::UNAUTHORIZED),
            (
                Error::Api {
                    status: 502,
                    message: "bad gateway".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError(err).status(), expected);
        }
    }
}
