//! Ranking of playlist tracks by their audio features.
//!
//! Rankings are descending and stable: tracks with equal values keep their
//! relative input order. Feature values are validated before any arithmetic,
//! so a NaN or infinite value from upstream fails the ranking instead of
//! silently scrambling the order.

use std::{cmp::Ordering, collections::HashSet, fmt, str::FromStr};

use clap::ValueEnum;
use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};

use crate::{
    error::{Error, Result},
    management::{Cache, CacheKey},
    types::{Feature, Song, Tracklist},
    utils,
};

const SCORE_DECIMALS: i32 = 4;

/// How several feature values are reduced to one score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    /// Arithmetic mean of the values
    Average,
    /// Product of the values
    Multiply,
}

impl Combinator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Combinator::Average => "average",
            Combinator::Multiply => "multiply",
        }
    }

    /// Combines `values`, rounding the final result (not the terms) half away
    /// from zero to four decimals.
    pub fn apply(&self, values: &[f64]) -> f64 {
        let combined = match self {
            Combinator::Average => values.iter().sum::<f64>() / values.len() as f64,
            Combinator::Multiply => values.iter().product(),
        };
        utils::round_to(combined, SCORE_DECIMALS)
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Combinator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "average" => Ok(Combinator::Average),
            "multiply" => Ok(Combinator::Multiply),
            other => Err(Error::InvalidRequest(format!("unknown combinator '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SingleFeatureEntry {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub feature: Feature,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CombinedEntry {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub values: Vec<(Feature, f64)>,
    pub combinator: Combinator,
    pub score: f64,
}

/// One ranked track. Each ranking mode produces exactly one variant.
#[derive(Debug, Clone, PartialEq)]
pub enum RankedEntry {
    Single(SingleFeatureEntry),
    Combined(CombinedEntry),
}

impl RankedEntry {
    pub fn id(&self) -> &str {
        match self {
            RankedEntry::Single(e) => &e.id,
            RankedEntry::Combined(e) => &e.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            RankedEntry::Single(e) => &e.name,
            RankedEntry::Combined(e) => &e.name,
        }
    }

    pub fn artists(&self) -> &[String] {
        match self {
            RankedEntry::Single(e) => &e.artists,
            RankedEntry::Combined(e) => &e.artists,
        }
    }

    /// The value the entry is ordered by.
    pub fn sort_value(&self) -> f64 {
        match self {
            RankedEntry::Single(e) => e.value,
            RankedEntry::Combined(e) => e.score,
        }
    }
}

// Report layout: {"id", "name", "artists", "<feature>": value..., "score"?}
impl Serialize for RankedEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", self.id())?;
        map.serialize_entry("name", self.name())?;
        map.serialize_entry("artists", self.artists())?;
        match self {
            RankedEntry::Single(e) => {
                map.serialize_entry(e.feature.as_str(), &e.value)?;
            }
            RankedEntry::Combined(e) => {
                for (feature, value) in &e.values {
                    map.serialize_entry(feature.as_str(), value)?;
                }
                map.serialize_entry("score", &e.score)?;
                map.serialize_entry("combinator", e.combinator.as_str())?;
            }
        }
        map.end()
    }
}

fn finite_value(song: &Song, feature: Feature) -> Result<f64> {
    let value = song.features.get(feature);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::NonFiniteFeature {
            id: song.id().to_string(),
            feature: feature.to_string(),
        })
    }
}

fn sort_descending(entries: &mut [RankedEntry]) {
    // sort_by is stable, ties keep their input order
    entries.sort_by(|a, b| {
        b.sort_value()
            .partial_cmp(&a.sort_value())
            .unwrap_or(Ordering::Equal)
    });
}

/// Fails if any track of the tracklist has no audio features.
pub fn ensure_complete(tracklist: &Tracklist, songs: &[Song]) -> Result<()> {
    let known: HashSet<&str> = songs.iter().map(|s| s.id()).collect();
    match tracklist.iter().find(|t| !known.contains(t.id.as_str())) {
        Some(track) => Err(Error::IncompleteFeatures(track.id.clone())),
        None => Ok(()),
    }
}

pub fn rank_by_single_feature(songs: &[Song], feature: Feature) -> Result<Vec<RankedEntry>> {
    let mut entries = songs
        .iter()
        .map(|song| {
            Ok(RankedEntry::Single(SingleFeatureEntry {
                id: song.id().to_string(),
                name: song.name.clone(),
                artists: song.artists.clone(),
                feature,
                value: finite_value(song, feature)?,
            }))
        })
        .collect::<Result<Vec<_>>>()?;

    sort_descending(&mut entries);
    Ok(entries)
}

pub fn rank_by_combination(
    songs: &[Song],
    features: &[Feature],
    combinator: Combinator,
) -> Result<Vec<RankedEntry>> {
    if features.is_empty() {
        return Err(Error::InvalidRequest("no features to combine".to_string()));
    }

    let mut entries = songs
        .iter()
        .map(|song| {
            let values = features
                .iter()
                .map(|&f| finite_value(song, f).map(|v| (f, v)))
                .collect::<Result<Vec<_>>>()?;
            let raw: Vec<f64> = values.iter().map(|(_, v)| *v).collect();

            Ok(RankedEntry::Combined(CombinedEntry {
                id: song.id().to_string(),
                name: song.name.clone(),
                artists: song.artists.clone(),
                score: combinator.apply(&raw),
                values,
                combinator,
            }))
        })
        .collect::<Result<Vec<_>>>()?;

    sort_descending(&mut entries);
    Ok(entries)
}

/// A finished ranking together with what it was ranked by.
#[derive(Debug, Clone)]
pub struct Ranking {
    pub features: Vec<Feature>,
    /// As requested, even when only one feature was ranked.
    pub combinator: Option<Combinator>,
    pub entries: Vec<RankedEntry>,
}

impl Ranking {
    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.id().to_string()).collect()
    }

    pub fn report_key(&self, playlist_name: &str) -> CacheKey {
        CacheKey::report(playlist_name, &self.features, self.combinator)
    }

    /// Writes the full ranking, pretty printed, next to the playlist's other
    /// artifacts. Returns where it went.
    pub async fn write_report(&self, cache: &Cache, playlist_name: &str) -> Result<String> {
        let key = self.report_key(playlist_name);
        cache.store_pretty(&key, &self.entries).await?;
        let location = cache.location(&key);
        tracing::info!(location = %location, "Wrote ranking report");
        Ok(location)
    }
}

/// Ranks by a single feature when exactly one is given, otherwise by the
/// combination of all of them. A combinator is required for the latter. For
/// the former it does not change the order, but still names the report.
pub fn rank(songs: &[Song], features: &[Feature], combinator: Option<Combinator>) -> Result<Ranking> {
    match features {
        [] => Err(Error::InvalidRequest("at least one feature is required".to_string())),
        [feature] => {
            if let Some(c) = combinator {
                tracing::debug!(combinator = %c, "Combinator does not affect a single feature ranking");
            }
            Ok(Ranking {
                features: vec![*feature],
                combinator,
                entries: rank_by_single_feature(songs, *feature)?,
            })
        }
        _ => {
            let combinator = combinator.ok_or_else(|| {
                Error::InvalidRequest(
                    "a combinator is required when ranking by several features".to_string(),
                )
            })?;
            Ok(Ranking {
                features: features.to_vec(),
                combinator: Some(combinator),
                entries: rank_by_combination(songs, features, combinator)?,
            })
        }
    }
}

/// Ranks, writes the report artifact and returns the ranked track ids.
pub async fn rank_and_report(
    cache: &Cache,
    playlist_name: &str,
    songs: &[Song],
    features: &[Feature],
    combinator: Option<Combinator>,
) -> Result<Vec<String>> {
    let ranking = rank(songs, features, combinator)?;
    ranking.write_report(cache, playlist_name).await?;
    Ok(ranking.ids())
}
