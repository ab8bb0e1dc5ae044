use std::collections::HashMap;

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use serde::Serialize;

use crate::database::{self, WindowedMap};
use crate::domain::{Outcome, Side};
use crate::logparse::event::{EventsByKind, PlayerStat};
use crate::logparse::MapType;
use crate::outcome::{self, SideContext};

use super::range::RangeSelector;

/// One player's final stat line on one hero for one map, joined with the
/// roster resolution. `display_name` is the canonical identity when the
/// operator mapped one, otherwise the literal raw name.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerLine {
    pub raw_name: String,
    pub display_name: String,
    pub team_name: String,
    pub side: Option<Side>,
    pub hero_name: String,
    pub eliminations: u32,
    pub final_blows: u32,
    pub deaths: u32,
    pub damage_dealt: f64,
    pub healing_dealt: f64,
    pub time_played_secs: f64,
}

impl PlayerLine {
    pub fn is_ours(&self, our_side: Side) -> bool {
        self.side == Some(our_side)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub performance: String,
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

/// Everything the pure view functions need to know about one map. Assembled
/// once per request; the views never touch the database.
#[derive(Debug, Clone)]
pub struct MapAnalysisInput {
    pub map_id: i64,
    pub scrim_id: i64,
    pub scrim_date: NaiveDate,
    pub map_name: String,
    pub map_type: MapType,
    pub opponent: String,
    pub outcome: Outcome,
    pub review: Option<ReviewSummary>,
    pub players: Vec<PlayerLine>,
}

/// Loads the window of maps a range selector covers and joins events
/// (reconciled on read), rosters, identities and reviews into pure inputs.
pub fn assemble_window(
    conn: &Connection,
    team_id: Option<i64>,
    range: RangeSelector,
    today: NaiveDate,
) -> Result<Vec<MapAnalysisInput>> {
    let our_team_name = match team_id {
        Some(id) => database::teams::find_by_id(conn, id)?.map(|team| team.name),
        None => None,
    };

    let windowed =
        database::maps::list_window(conn, team_id, range.cutoff(today), range.map_limit())?;

    let identity_names: HashMap<i64, String> = database::identities::list_all(conn)?
        .into_iter()
        .map(|identity| (identity.id, identity.display_name))
        .collect();

    let mut reviews: HashMap<i64, Option<ReviewSummary>> = HashMap::new();
    let mut inputs = Vec::with_capacity(windowed.len());

    for row in windowed {
        let review = reviews
            .entry(row.map.scrim_id)
            .or_insert_with(|| load_review(conn, row.map.scrim_id))
            .clone();
        inputs.push(assemble_map(
            conn,
            row,
            our_team_name.as_deref(),
            &identity_names,
            review,
        )?);
    }

    Ok(inputs)
}

fn load_review(conn: &Connection, scrim_id: i64) -> Option<ReviewSummary> {
    database::reviews::latest_for_scrim(conn, scrim_id)
        .ok()
        .flatten()
        .map(|review| ReviewSummary {
            performance: review.performance,
            notes: review.notes,
            created_at: review.created_at,
        })
}

fn assemble_map(
    conn: &Connection,
    row: WindowedMap,
    our_team_name: Option<&str>,
    identity_names: &HashMap<i64, String>,
    review: Option<ReviewSummary>,
) -> Result<MapAnalysisInput> {
    let events = database::events::load_for_map(conn, row.map.id)?;
    let by_kind = EventsByKind::from_events(&events);

    let sides = SideContext {
        our_team_name,
        opponent_override: row.opponent_override.as_deref(),
    };
    let outcome = outcome::reconcile(&by_kind, row.map.map_type, sides);
    let opponent = outcome::opponent_name(
        by_kind.match_start(),
        outcome.our_side,
        row.opponent_override.as_deref(),
    );

    let roster = database::rosters::list_for_map(conn, row.map.id)?;
    let resolution: HashMap<(String, String), Option<i64>> = roster
        .into_iter()
        .map(|entry| ((entry.team_name, entry.raw_name), entry.identity_id))
        .collect();

    let players = final_stat_lines(&by_kind.player_stat)
        .into_iter()
        .map(|stat| {
            let key = (stat.team_name.clone(), stat.player_name.clone());
            let display_name = resolution
                .get(&key)
                .and_then(|id| id.as_ref())
                .and_then(|id| identity_names.get(id).cloned())
                .unwrap_or_else(|| stat.player_name.clone());
            PlayerLine {
                raw_name: stat.player_name.clone(),
                display_name,
                team_name: stat.team_name.clone(),
                side: side_of_team(&stat.team_name, &row.map.team1_name, &row.map.team2_name),
                hero_name: stat.hero_name.clone(),
                eliminations: stat.eliminations,
                final_blows: stat.final_blows,
                deaths: stat.deaths,
                damage_dealt: stat.damage_dealt,
                healing_dealt: stat.healing_dealt,
                time_played_secs: stat.time_played_secs,
            }
        })
        .collect();

    Ok(MapAnalysisInput {
        map_id: row.map.id,
        scrim_id: row.map.scrim_id,
        scrim_date: row.scrim_date,
        map_name: row.map.map_name,
        map_type: row.map.map_type,
        opponent,
        outcome,
        review,
        players,
    })
}

/// Stat rows are cumulative; the final line for a (team, player, hero) is
/// the last one in file order, not the maximum.
fn final_stat_lines(stats: &[PlayerStat]) -> Vec<PlayerStat> {
    let mut order: Vec<(String, String, String)> = Vec::new();
    let mut latest: HashMap<(String, String, String), PlayerStat> = HashMap::new();

    for stat in stats {
        let key = (
            stat.team_name.clone(),
            stat.player_name.clone(),
            stat.hero_name.clone(),
        );
        if !latest.contains_key(&key) {
            order.push(key.clone());
        }
        latest.insert(key, stat.clone());
    }

    order
        .into_iter()
        .map(|key| latest.remove(&key).expect("key recorded on first sight"))
        .collect()
}

fn side_of_team(team_name: &str, team1_name: &str, team2_name: &str) -> Option<Side> {
    if team_name.eq_ignore_ascii_case(team1_name) {
        Some(Side::Team1)
    } else if team_name.eq_ignore_ascii_case(team2_name) {
        Some(Side::Team2)
    } else {
        None
    }
}
