use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::MapResult;

use super::input::{MapAnalysisInput, ReviewSummary};
use super::map_types::{tally_map_types, MapTypeTally};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpponentSummary {
    pub opponent: String,
    pub scrims: u32,
    pub maps_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub win_rate: f64,
    pub last_played: NaiveDate,
    /// Maps where "our" side had to be assumed rather than matched.
    pub side_assumed_maps: u32,
    pub latest_review: Option<ReviewSummary>,
    pub map_types: Vec<MapTypeTally>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpponentView {
    pub total_scrims: u32,
    pub total_maps: u32,
    pub unique_opponents: u32,
    pub opponents: Vec<OpponentSummary>,
    pub map_stats: Vec<MapTypeTally>,
}

/// Groups the window's maps by resolved-or-literal opponent name.
pub fn opponent_view(inputs: &[MapAnalysisInput]) -> OpponentView {
    let mut by_opponent: BTreeMap<&str, Vec<&MapAnalysisInput>> = BTreeMap::new();
    for input in inputs {
        by_opponent.entry(&input.opponent).or_default().push(input);
    }

    let mut opponents: Vec<OpponentSummary> = by_opponent
        .into_iter()
        .map(|(name, maps)| summarize_opponent(name, &maps))
        .collect();

    // Primary volume metric first; name keeps the order stable.
    opponents.sort_by(|a, b| {
        b.maps_played
            .cmp(&a.maps_played)
            .then_with(|| a.opponent.cmp(&b.opponent))
    });

    let scrim_ids: HashSet<i64> = inputs.iter().map(|input| input.scrim_id).collect();

    OpponentView {
        total_scrims: scrim_ids.len() as u32,
        total_maps: inputs.len() as u32,
        unique_opponents: opponents.len() as u32,
        map_stats: tally_map_types(inputs.iter()),
        opponents,
    }
}

fn summarize_opponent(name: &str, maps: &[&MapAnalysisInput]) -> OpponentSummary {
    let mut wins = 0;
    let mut losses = 0;
    let mut draws = 0;
    let mut side_assumed_maps = 0;
    let mut last_played: Option<NaiveDate> = None;
    let scrims: HashSet<i64> = maps.iter().map(|m| m.scrim_id).collect();

    for map in maps {
        match map.outcome.result() {
            Some(MapResult::Win) => wins += 1,
            Some(MapResult::Loss) => losses += 1,
            Some(MapResult::Draw) => draws += 1,
            None => {}
        }
        if map.outcome.side_attribution.is_assumed() {
            side_assumed_maps += 1;
        }
        last_played = Some(last_played.map_or(map.scrim_date, |d| d.max(map.scrim_date)));
    }

    let decided = wins + losses + draws;
    OpponentSummary {
        opponent: name.to_string(),
        scrims: scrims.len() as u32,
        maps_played: maps.len() as u32,
        wins,
        losses,
        draws,
        win_rate: if decided == 0 {
            0.0
        } else {
            wins as f64 / decided as f64
        },
        last_played: last_played.expect("an opponent group always holds at least one map"),
        side_assumed_maps,
        latest_review: latest_review(maps),
        map_types: tally_map_types(maps.iter().copied()),
    }
}

fn latest_review(maps: &[&MapAnalysisInput]) -> Option<ReviewSummary> {
    maps.iter()
        .filter_map(|map| {
            map.review
                .as_ref()
                .map(|review| ((map.scrim_date, map.scrim_id), review))
        })
        .max_by_key(|(key, _)| *key)
        .map(|(_, review)| review.clone())
}
