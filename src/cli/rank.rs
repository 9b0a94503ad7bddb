use tabled::Table;

use crate::{
    error, info,
    pipeline::{Pipeline, RankPlan},
    ranking::{Combinator, RankedEntry},
    success,
    types::{Feature, RankedTableRow},
};

use super::{catalog_client, spinner};

pub async fn rank(
    playlist_name: String,
    features: Vec<Feature>,
    combinator: Option<Combinator>,
    create_playlist: bool,
    limit: Option<usize>,
) {
    let plan = match RankPlan::new(playlist_name, features, combinator, create_playlist) {
        Ok(plan) => plan,
        Err(e) => error!("{}", e),
    };

    let client = match catalog_client().await {
        Ok(client) => client,
        Err(e) => error!("{}", e),
    };

    let pb = spinner("Ranking playlist tracks...");
    let outcome = Pipeline::new(&client).run(&plan).await;
    pb.finish_and_clear();

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => error!("Cannot rank playlist {}: {}", plan.playlist_name, e),
    };

    let rows: Vec<RankedTableRow> = outcome
        .entries
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .enumerate()
        .map(|(i, entry)| RankedTableRow {
            position: i + 1,
            name: entry.name().to_string(),
            artists: entry.artists().join(", "),
            value: describe(entry),
        })
        .collect();

    println!("{}", Table::new(rows));
    info!("Wrote ranking to {}", outcome.report);

    if let Some(created) = outcome.created {
        success!(
            "Created playlist '{}' with {} tracks",
            created.name,
            outcome.entries.len()
        );
    }
}

fn describe(entry: &RankedEntry) -> String {
    match entry {
        RankedEntry::Single(e) => format!("{}", e.value),
        RankedEntry::Combined(e) => {
            let parts = e
                .values
                .iter()
                .map(|(f, v)| format!("{}={}", f, v))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} ({} of {})", e.score, e.combinator, parts)
        }
    }
}
