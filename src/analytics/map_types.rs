use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::MapResult;

use super::input::MapAnalysisInput;

/// Win/loss/draw tally for one map type. `win_rate` is over decided maps
/// and is 0 when nothing was decided, never NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapTypeTally {
    pub map_type: String,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub win_rate: f64,
}

impl MapTypeTally {
    fn new(map_type: String) -> Self {
        Self {
            map_type,
            played: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            win_rate: 0.0,
        }
    }

    fn record(&mut self, result: Option<MapResult>) {
        self.played += 1;
        match result {
            Some(MapResult::Win) => self.wins += 1,
            Some(MapResult::Loss) => self.losses += 1,
            Some(MapResult::Draw) => self.draws += 1,
            None => {}
        }
        let decided = self.wins + self.losses + self.draws;
        self.win_rate = if decided == 0 {
            0.0
        } else {
            self.wins as f64 / decided as f64
        };
    }
}

/// Pooled tally per map type across the given maps, insertion into a
/// BTreeMap keeping the intermediate grouping deterministic.
pub(crate) fn tally_map_types<'a, I>(inputs: I) -> Vec<MapTypeTally>
where
    I: IntoIterator<Item = &'a MapAnalysisInput>,
{
    let mut tallies: BTreeMap<&'static str, MapTypeTally> = BTreeMap::new();
    for input in inputs {
        let key = input.map_type.as_str();
        tallies
            .entry(key)
            .or_insert_with(|| MapTypeTally::new(key.to_string()))
            .record(input.outcome.result());
    }
    tallies.into_values().collect()
}

/// The map-type view: one tally per type, pooled across all opponents,
/// sorted by win rate descending (volume, then name, break ties).
pub fn map_type_view(inputs: &[MapAnalysisInput]) -> Vec<MapTypeTally> {
    let mut tallies = tally_map_types(inputs);
    tallies.sort_by(|a, b| {
        b.win_rate
            .total_cmp(&a.win_rate)
            .then(b.played.cmp(&a.played))
            .then(a.map_type.cmp(&b.map_type))
    });
    tallies
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use crate::domain::{Outcome, ReconciledScore, ResultTier, Side, SideAttribution};
    use crate::logparse::MapType;

    use super::*;

    fn map_input(
        map_id: i64,
        scrim_id: i64,
        map_type: MapType,
        score: Option<(u32, u32)>,
    ) -> MapAnalysisInput {
        MapAnalysisInput {
            map_id,
            scrim_id,
            scrim_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            map_name: "TestMap".into(),
            map_type,
            opponent: "Bravo".into(),
            outcome: Outcome {
                score: score.map(|(team1, team2)| ReconciledScore {
                    team1,
                    team2,
                    tier: ResultTier::Authoritative,
                }),
                our_side: Side::Team1,
                side_attribution: SideAttribution::TeamNameMatch,
            },
            review: None,
            players: Vec::new(),
        }
    }

    #[test]
    fn tallies_wins_losses_draws_per_type() {
        let inputs = vec![
            map_input(1, 1, MapType::Escort, Some((3, 1))),
            map_input(2, 1, MapType::Escort, Some((0, 2))),
            map_input(3, 2, MapType::Control, Some((2, 2))),
        ];
        let view = map_type_view(&inputs);

        assert_eq!(view.len(), 2);
        let escort = view.iter().find(|t| t.map_type == "Escort").unwrap();
        assert_eq!((escort.played, escort.wins, escort.losses), (2, 1, 1));
        assert_eq!(escort.win_rate, 0.5);
        let control = view.iter().find(|t| t.map_type == "Control").unwrap();
        assert_eq!((control.played, control.draws), (1, 1));
    }

    #[test]
    fn undecided_maps_count_as_played_with_zero_rate() {
        let inputs = vec![map_input(1, 1, MapType::Push, None)];
        let view = map_type_view(&inputs);

        assert_eq!(view[0].played, 1);
        assert_eq!(view[0].wins + view[0].losses + view[0].draws, 0);
        assert_eq!(view[0].win_rate, 0.0);
    }

    #[test]
    fn empty_window_yields_empty_view_not_an_error() {
        assert_eq!(map_type_view(&[]), Vec::new());
    }

    #[test]
    fn sorts_by_win_rate_descending() {
        let inputs = vec![
            map_input(1, 1, MapType::Escort, Some((1, 2))),
            map_input(2, 1, MapType::Control, Some((2, 0))),
            map_input(3, 2, MapType::Hybrid, Some((2, 1))),
            map_input(4, 2, MapType::Hybrid, Some((0, 3))),
        ];
        let view = map_type_view(&inputs);
        let order: Vec<&str> = view.iter().map(|t| t.map_type.as_str()).collect();
        assert_eq!(order, vec!["Control", "Hybrid", "Escort"]);
    }
}
