use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::MapResult;

use super::input::{MapAnalysisInput, PlayerLine};

/// Summed combat totals. Counts are exact; damage, healing and time come
/// from the recorder as floats.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatTotals {
    pub eliminations: u64,
    pub final_blows: u64,
    pub deaths: u64,
    pub damage_dealt: f64,
    pub healing_dealt: f64,
    pub time_played_secs: f64,
}

impl CombatTotals {
    pub(crate) fn add_line(&mut self, line: &PlayerLine) {
        self.eliminations += line.eliminations as u64;
        self.final_blows += line.final_blows as u64;
        self.deaths += line.deaths as u64;
        self.damage_dealt += line.damage_dealt;
        self.healing_dealt += line.healing_dealt;
        self.time_played_secs += line.time_played_secs;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub player: String,
    pub maps_played: u32,
    pub totals: CombatTotals,
    pub top_hero: Option<String>,
}

/// Per-map stat line for the player detail's trend data, newest map first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub map_name: String,
    pub map_type: String,
    pub opponent: String,
    pub result: Option<MapResult>,
    pub hero: Option<String>,
    pub totals: CombatTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetail {
    pub player: String,
    pub career: PlayerSummary,
    pub trend_data: Vec<TrendPoint>,
}

#[derive(Debug, Default)]
struct PlayerAccumulator {
    maps_played: u32,
    totals: CombatTotals,
    hero_time: BTreeMap<String, (f64, u64)>,
}

impl PlayerAccumulator {
    fn add_map_lines(&mut self, lines: &[&PlayerLine]) {
        self.maps_played += 1;
        for line in lines {
            self.totals.add_line(line);
            let entry = self.hero_time.entry(line.hero_name.clone()).or_default();
            entry.0 += line.time_played_secs;
            entry.1 += line.eliminations as u64;
        }
    }

    fn top_hero(&self) -> Option<String> {
        self.hero_time
            .iter()
            .max_by(|a, b| {
                a.1 .0
                    .total_cmp(&b.1 .0)
                    .then(a.1 .1.cmp(&b.1 .1))
                    // Alphabetically earlier name wins an exact tie.
                    .then_with(|| b.0.cmp(a.0))
            })
            .map(|(hero, _)| hero.clone())
    }
}

/// Per canonical-or-raw player, summed combat totals and most played hero.
/// With `ours_only` set (team-scoped request) opponent players are dropped.
pub fn player_view(inputs: &[MapAnalysisInput], ours_only: bool) -> Vec<PlayerSummary> {
    let mut accumulators: BTreeMap<String, PlayerAccumulator> = BTreeMap::new();

    for input in inputs {
        let mut per_player: BTreeMap<&str, Vec<&PlayerLine>> = BTreeMap::new();
        for line in eligible_lines(input, ours_only) {
            per_player.entry(&line.display_name).or_default().push(line);
        }
        for (player, lines) in per_player {
            accumulators
                .entry(player.to_string())
                .or_default()
                .add_map_lines(&lines);
        }
    }

    let mut players: Vec<PlayerSummary> = accumulators
        .into_iter()
        .map(|(player, acc)| PlayerSummary {
            player,
            maps_played: acc.maps_played,
            top_hero: acc.top_hero(),
            totals: acc.totals,
        })
        .collect();

    players.sort_by(|a, b| {
        b.totals
            .eliminations
            .cmp(&a.totals.eliminations)
            .then_with(|| a.player.cmp(&b.player))
    });
    players
}

/// Career summary plus per-map trend for one player, or None when the name
/// never appears in the window (a 404 upstream, distinct from an empty
/// window).
pub fn player_detail(inputs: &[MapAnalysisInput], player: &str) -> Option<PlayerDetail> {
    let mut accumulator = PlayerAccumulator::default();
    let mut trend = Vec::new();

    for input in inputs {
        let lines: Vec<&PlayerLine> = input
            .players
            .iter()
            .filter(|line| line.display_name.eq_ignore_ascii_case(player))
            .collect();
        if lines.is_empty() {
            continue;
        }
        accumulator.add_map_lines(&lines);

        let mut totals = CombatTotals::default();
        for line in &lines {
            totals.add_line(line);
        }
        let hero = lines
            .iter()
            .max_by(|a, b| a.time_played_secs.total_cmp(&b.time_played_secs))
            .map(|line| line.hero_name.clone());
        trend.push(TrendPoint {
            date: input.scrim_date,
            map_name: input.map_name.clone(),
            map_type: input.map_type.as_str().to_string(),
            opponent: input.opponent.clone(),
            result: input.outcome.result(),
            hero,
            totals,
        });
    }

    if accumulator.maps_played == 0 {
        return None;
    }

    // Echo the catalog's spelling back, not the caller's casing.
    let canonical = inputs
        .iter()
        .find_map(|input| {
            input
                .players
                .iter()
                .find(|line| line.display_name.eq_ignore_ascii_case(player))
                .map(|line| line.display_name.clone())
        })
        .unwrap_or_else(|| player.to_string());

    Some(PlayerDetail {
        career: PlayerSummary {
            player: canonical.clone(),
            maps_played: accumulator.maps_played,
            top_hero: accumulator.top_hero(),
            totals: accumulator.totals.clone(),
        },
        player: canonical,
        trend_data: trend,
    })
}

fn eligible_lines<'a>(
    input: &'a MapAnalysisInput,
    ours_only: bool,
) -> impl Iterator<Item = &'a PlayerLine> {
    let our_side = input.outcome.our_side;
    input
        .players
        .iter()
        .filter(move |line| !ours_only || line.is_ours(our_side))
}
