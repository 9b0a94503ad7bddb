//! End-to-end ranking of one playlist: resolve it by name, fetch tracks and
//! audio features, rank, and optionally write the ranking back as a new
//! playlist.
//!
//! Any failure aborts the run. Nothing is rolled back: batches already added
//! to a new playlist stay there, and caches written before the failure are
//! reused by the next run.

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    ranking::{self, Combinator, RankedEntry},
    spotify::CatalogClient,
    types::{Feature, Playlist},
};

/// A ranking request as it arrives from the outside, feature names unchecked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankRequest {
    pub playlist_name: String,
    pub features: Vec<String>,
    #[serde(default, alias = "scoringFunction")]
    pub combinator: Option<String>,
    #[serde(default)]
    pub create_playlist: bool,
}

/// A validated ranking request.
#[derive(Debug, Clone, PartialEq)]
pub struct RankPlan {
    pub playlist_name: String,
    pub features: Vec<Feature>,
    pub combinator: Option<Combinator>,
    pub create_playlist: bool,
}

impl RankRequest {
    pub fn validate(&self) -> Result<RankPlan> {
        let features = self
            .features
            .iter()
            .map(|f| f.parse::<Feature>())
            .collect::<Result<Vec<_>>>()?;
        let combinator = self
            .combinator
            .as_deref()
            .map(str::parse::<Combinator>)
            .transpose()?;

        RankPlan::new(
            self.playlist_name.clone(),
            features,
            combinator,
            self.create_playlist,
        )
    }
}

impl RankPlan {
    pub fn new(
        playlist_name: String,
        features: Vec<Feature>,
        combinator: Option<Combinator>,
        create_playlist: bool,
    ) -> Result<Self> {
        if playlist_name.is_empty() {
            return Err(Error::InvalidRequest("playlist name is empty".to_string()));
        }
        if features.is_empty() {
            return Err(Error::InvalidRequest(
                "at least one feature is required".to_string(),
            ));
        }
        for (i, feature) in features.iter().enumerate() {
            if features[..i].contains(feature) {
                return Err(Error::InvalidRequest(format!(
                    "feature '{}' is requested twice",
                    feature
                )));
            }
        }
        if features.len() > 1 && combinator.is_none() {
            return Err(Error::InvalidRequest(
                "a combinator is required when ranking by several features".to_string(),
            ));
        }

        Ok(Self {
            playlist_name,
            features,
            combinator,
            create_playlist,
        })
    }

    /// Name of the generated playlist, e.g. `Chill by energy+valence`.
    pub fn generated_name(&self) -> String {
        let features = self
            .features
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join("+");
        format!("{} by {}", self.playlist_name, features)
    }
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub source: Playlist,
    pub entries: Vec<RankedEntry>,
    pub report: String,
    pub created: Option<Playlist>,
}

impl PipelineOutcome {
    pub fn track_ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.id().to_string()).collect()
    }
}

pub struct Pipeline<'a> {
    client: &'a CatalogClient,
}

impl<'a> Pipeline<'a> {
    pub fn new(client: &'a CatalogClient) -> Self {
        Self { client }
    }

    /// Validates and runs a raw request.
    pub async fn handle(&self, request: &RankRequest) -> Result<PipelineOutcome> {
        let plan = request.validate()?;
        self.run(&plan).await
    }

    pub async fn run(&self, plan: &RankPlan) -> Result<PipelineOutcome> {
        let source = self
            .client
            .resolve_playlist_by_name(&plan.playlist_name)
            .await?;
        let tracklist = self.client.fetch_all_tracks(&source).await?;
        let songs = self.client.fetch_all_features(&source, &tracklist).await?;
        ranking::ensure_complete(&tracklist, &songs)?;

        let ranking = ranking::rank(&songs, &plan.features, plan.combinator)?;
        let report = ranking
            .write_report(self.client.cache(), &source.name)
            .await?;

        let created = if plan.create_playlist {
            let uris = tracklist.uris_for(&ranking.ids())?;
            let playlist = self.client.create_playlist(&plan.generated_name()).await?;
            self.client
                .add_tracks_to_playlist(&playlist.id, &uris)
                .await?;
            Some(playlist)
        } else {
            None
        };

        Ok(PipelineOutcome {
            source,
            entries: ranking.entries,
            report,
            created,
        })
    }
}
