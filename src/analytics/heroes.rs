use std::collections::BTreeMap;

use serde::Serialize;

use super::input::{MapAnalysisInput, PlayerLine};
use super::players::{CombatTotals, PlayerSummary};

/// Rate-normalized derived metrics, per fixed time window (10 minutes by
/// default). A hero with no recorded time reports zeros, never NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroRates {
    pub eliminations_per_ten: f64,
    pub final_blows_per_ten: f64,
    pub deaths_per_ten: f64,
    pub damage_per_ten: f64,
    pub healing_per_ten: f64,
}

impl HeroRates {
    fn from_totals(totals: &CombatTotals, rate_window_secs: f64) -> Self {
        let windows = totals.time_played_secs / rate_window_secs;
        if windows <= 0.0 {
            return HeroRates::default();
        }
        HeroRates {
            eliminations_per_ten: totals.eliminations as f64 / windows,
            final_blows_per_ten: totals.final_blows as f64 / windows,
            deaths_per_ten: totals.deaths as f64 / windows,
            damage_per_ten: totals.damage_dealt / windows,
            healing_per_ten: totals.healing_dealt / windows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSummary {
    pub hero: String,
    /// Player-map combinations the hero appeared in.
    pub pick_count: u32,
    pub maps_played: u32,
    pub totals: CombatTotals,
    pub rates: HeroRates,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroDetail {
    pub hero: String,
    pub career: HeroSummary,
    pub top_players: Vec<PlayerSummary>,
}

#[derive(Debug, Default)]
struct HeroAccumulator {
    pick_count: u32,
    maps_played: u32,
    totals: CombatTotals,
}

/// Symmetric to the player view but grouped by hero, with rate-normalized
/// metrics on top of raw totals.
pub fn hero_view(inputs: &[MapAnalysisInput], rate_window_secs: f64) -> Vec<HeroSummary> {
    let mut accumulators: BTreeMap<String, HeroAccumulator> = BTreeMap::new();

    for input in inputs {
        let mut seen_this_map: BTreeMap<&str, ()> = BTreeMap::new();
        for line in &input.players {
            let acc = accumulators.entry(line.hero_name.clone()).or_default();
            acc.pick_count += 1;
            acc.totals.add_line(line);
            if seen_this_map.insert(&line.hero_name, ()).is_none() {
                acc.maps_played += 1;
            }
        }
    }

    let mut heroes: Vec<HeroSummary> = accumulators
        .into_iter()
        .map(|(hero, acc)| HeroSummary {
            hero,
            pick_count: acc.pick_count,
            maps_played: acc.maps_played,
            rates: HeroRates::from_totals(&acc.totals, rate_window_secs),
            totals: acc.totals,
        })
        .collect();

    heroes.sort_by(|a, b| {
        b.totals
            .eliminations
            .cmp(&a.totals.eliminations)
            .then_with(|| a.hero.cmp(&b.hero))
    });
    heroes
}

/// Career line for one hero plus the players who logged the most time on it.
pub fn hero_detail(
    inputs: &[MapAnalysisInput],
    hero: &str,
    rate_window_secs: f64,
) -> Option<HeroDetail> {
    let career = hero_view(inputs, rate_window_secs)
        .into_iter()
        .find(|summary| summary.hero.eq_ignore_ascii_case(hero))?;

    let mut per_player: BTreeMap<String, (u32, CombatTotals)> = BTreeMap::new();
    for input in inputs {
        let mut counted: Vec<&str> = Vec::new();
        for line in hero_lines(input, &career.hero) {
            let entry = per_player
                .entry(line.display_name.clone())
                .or_insert_with(|| (0, CombatTotals::default()));
            entry.1.add_line(line);
            if !counted.contains(&line.display_name.as_str()) {
                entry.0 += 1;
                counted.push(&line.display_name);
            }
        }
    }

    let mut top_players: Vec<PlayerSummary> = per_player
        .into_iter()
        .map(|(player, (maps_played, totals))| PlayerSummary {
            player,
            maps_played,
            top_hero: Some(career.hero.clone()),
            totals,
        })
        .collect();
    top_players.sort_by(|a, b| {
        b.totals
            .time_played_secs
            .total_cmp(&a.totals.time_played_secs)
            .then_with(|| a.player.cmp(&b.player))
    });

    Some(HeroDetail {
        hero: career.hero.clone(),
        career,
        top_players,
    })
}

fn hero_lines<'a>(
    input: &'a MapAnalysisInput,
    hero: &'a str,
) -> impl Iterator<Item = &'a PlayerLine> {
    input
        .players
        .iter()
        .filter(move |line| line.hero_name.eq_ignore_ascii_case(hero))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use crate::domain::{Outcome, Side, SideAttribution};
    use crate::logparse::MapType;

    use super::*;

    fn line(player: &str, hero: &str, elims: u32, time: f64) -> PlayerLine {
        PlayerLine {
            raw_name: player.into(),
            display_name: player.into(),
            team_name: "Alpha".into(),
            side: Some(Side::Team1),
            hero_name: hero.into(),
            eliminations: elims,
            final_blows: 0,
            deaths: 3,
            damage_dealt: 3000.0,
            healing_dealt: 600.0,
            time_played_secs: time,
        }
    }

    fn input(map_id: i64, players: Vec<PlayerLine>) -> MapAnalysisInput {
        MapAnalysisInput {
            map_id,
            scrim_id: 1,
            scrim_date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            map_name: "Oasis".into(),
            map_type: MapType::Control,
            opponent: "Bravo".into(),
            outcome: Outcome {
                score: None,
                our_side: Side::Team1,
                side_attribution: SideAttribution::TeamNameMatch,
            },
            review: None,
            players,
        }
    }

    #[test]
    fn normalizes_rates_per_window() {
        let inputs = vec![input(1, vec![line("p1", "Tracer", 12, 1200.0)])];
        let view = hero_view(&inputs, 600.0);

        assert_eq!(view.len(), 1);
        assert_eq!(view[0].pick_count, 1);
        assert_eq!(view[0].rates.eliminations_per_ten, 6.0);
        assert_eq!(view[0].rates.damage_per_ten, 1500.0);
    }

    #[test]
    fn zero_recorded_time_yields_zero_rates_not_nan() {
        let inputs = vec![input(1, vec![line("p1", "Tracer", 5, 0.0)])];
        let view = hero_view(&inputs, 600.0);
        assert_eq!(view[0].rates, HeroRates::default());
    }

    #[test]
    fn counts_picks_per_player_and_maps_once() {
        let inputs = vec![
            input(
                1,
                vec![line("p1", "Tracer", 4, 300.0), line("p2", "Tracer", 2, 200.0)],
            ),
            input(2, vec![line("p1", "Tracer", 3, 500.0)]),
        ];
        let view = hero_view(&inputs, 600.0);
        assert_eq!(view[0].pick_count, 3);
        assert_eq!(view[0].maps_played, 2);
    }

    #[test]
    fn detail_ranks_players_by_hero_time() {
        let inputs = vec![input(
            1,
            vec![
                line("casual", "Tracer", 9, 100.0),
                line("onetrick", "Tracer", 4, 900.0),
                line("someone", "Ana", 2, 500.0),
            ],
        )];
        let detail = hero_detail(&inputs, "tracer", 600.0).unwrap();

        assert_eq!(detail.hero, "Tracer");
        assert_eq!(detail.top_players.len(), 2);
        assert_eq!(detail.top_players[0].player, "onetrick");
        assert_eq!(detail.career.pick_count, 2);
    }

    #[test]
    fn detail_for_unplayed_hero_is_none() {
        let inputs = vec![input(1, vec![line("p1", "Ana", 1, 100.0)])];
        assert!(hero_detail(&inputs, "Sombra", 600.0).is_none());
    }
}
